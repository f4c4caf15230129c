//! Error types for schema introspection and code generation.

use thiserror::Error;

/// Main error type for generator operations.
#[derive(Error, Debug)]
pub enum GenError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine selector did not name a supported database engine
    #[error("Unsupported database engine: {0}")]
    UnsupportedEngine(String),

    /// Connection or authentication failure against a database engine
    #[error("Connection failed ({engine}): {message}")]
    Connection { engine: String, message: String },

    /// Catalog query or row-scan failure, annotated with the operation
    #[error("Query failed while {operation}: {message}")]
    Query { operation: String, message: String },

    /// Operation attempted without an established session
    #[error("database not connected")]
    NotConnected,

    /// Template rendering produced no usable output
    #[error("Template rendering failed: {0}")]
    TemplateRender(String),

    /// Pretty-printing the rendered source failed.
    ///
    /// Recoverable: callers keep the unformatted output and surface this
    /// as a warning.
    #[error("Formatting failed: {0}")]
    Format(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Operation was cancelled (SIGINT, etc.)
    #[error("Operation cancelled")]
    Cancelled,
}

impl GenError {
    /// Create a Connection error for the given engine.
    pub fn connection(engine: impl Into<String>, message: impl std::fmt::Display) -> Self {
        GenError::Connection {
            engine: engine.into(),
            message: message.to_string(),
        }
    }

    /// Create a Query error annotated with the failing operation.
    pub fn query(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        GenError::Query {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_carries_operation() {
        let err = GenError::query("loading columns for users", "timeout");
        assert_eq!(
            err.to_string(),
            "Query failed while loading columns for users: timeout"
        );
    }

    #[test]
    fn test_connection_error_names_engine() {
        let err = GenError::connection("mysql", "access denied");
        assert!(err.to_string().contains("mysql"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_not_connected_message() {
        assert_eq!(GenError::NotConnected.to_string(), "database not connected");
    }
}
