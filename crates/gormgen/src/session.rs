//! Shared session state over one database connection.
//!
//! [`Session`] is the boundary the CLI (or any other shell) talks to. It
//! owns the introspector behind a readers-writer lock: metadata and
//! generation reads share access, while connect/disconnect/schema
//! selection take it exclusively. No read observes a mid-transition
//! session.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::DbConfig;
use crate::core::schema::ColumnMetadata;
use crate::core::traits::Introspect;
use crate::drivers::AnyIntrospector;
use crate::error::{GenError, Result};
use crate::generator::typemap::TypeMapper;
use crate::generator::{BatchResult, Generator};

/// Column information enriched with the resolved Go type, for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub raw_type: String,
    pub go_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl ColumnInfo {
    fn from_metadata(col: ColumnMetadata, mapper: &TypeMapper) -> Self {
        let go_type = mapper.map(&col.raw_type, col.is_nullable).go_type;
        Self {
            name: col.name,
            data_type: col.data_type,
            raw_type: col.raw_type,
            go_type,
            is_nullable: col.is_nullable,
            is_primary_key: col.is_primary_key,
            is_auto_increment: col.is_auto_increment,
            default_value: col.default_value,
            enum_values: col.enum_values,
            comment: col.comment,
        }
    }
}

/// Current connection status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub engine: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub database: String,
}

struct Active {
    introspector: AnyIntrospector,
    config: DbConfig,
}

struct SessionState {
    active: Option<Active>,
    package_name: String,
}

/// A connect/introspect/generate session shared across callers.
pub struct Session {
    state: RwLock<SessionState>,
    cancel: CancellationToken,
}

impl Session {
    /// Create a disconnected session.
    pub fn new() -> Self {
        Self::with_cancellation(CancellationToken::new())
    }

    /// Create a disconnected session whose queries race the given token.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            state: RwLock::new(SessionState {
                active: None,
                package_name: "models".to_string(),
            }),
            cancel,
        }
    }

    /// Override the package name used in generated files.
    pub async fn set_package_name(&self, package_name: &str) {
        if !package_name.is_empty() {
            let mut state = self.state.write().await;
            state.package_name = package_name.to_string();
        }
    }

    /// Connect to a database, tearing down any prior session first.
    ///
    /// On failure the session is left disconnected.
    pub async fn connect(&self, config: DbConfig) -> Result<()> {
        let mut state = self.state.write().await;

        // Release the previous session before establishing a new one.
        if let Some(mut active) = state.active.take() {
            active.introspector.close().await?;
        }

        let mut introspector = AnyIntrospector::new(&config, self.cancel.clone())?;
        introspector.connect().await?;

        info!(
            "Session connected: engine={} database={}",
            introspector.engine(),
            config.database
        );

        state.active = Some(Active {
            introspector,
            config,
        });
        Ok(())
    }

    /// Close the current connection. Idempotent.
    pub async fn disconnect(&self) -> Result<()> {
        let mut state = self.state.write().await;

        if let Some(mut active) = state.active.take() {
            active.introspector.close().await?;
            info!("Session disconnected");
        }

        Ok(())
    }

    /// The current connection status.
    pub async fn status(&self) -> ConnectionStatus {
        let state = self.state.read().await;

        match &state.active {
            Some(active) => ConnectionStatus {
                connected: true,
                engine: active.introspector.engine().to_string(),
                host: active.config.host.clone(),
                database: active.config.database.clone(),
            },
            None => ConnectionStatus {
                connected: false,
                engine: String::new(),
                host: String::new(),
                database: String::new(),
            },
        }
    }

    /// List available schemas (empty for engines without a schema concept).
    pub async fn list_schemas(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;
        active.introspector.schemas().await
    }

    /// Select the schema subsequent operations target.
    pub async fn select_schema(&self, schema: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let active = state.active.as_mut().ok_or(GenError::NotConnected)?;
        active.introspector.set_schema(schema);
        Ok(())
    }

    /// The currently targeted schema or database namespace.
    pub async fn current_schema(&self) -> Result<String> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;
        Ok(active.introspector.current_schema(&active.config))
    }

    /// List base tables in deterministic order.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;
        active.introspector.tables().await
    }

    /// Describe a table's columns, including their resolved Go types.
    pub async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;

        let columns = active.introspector.columns(table).await?;
        let mapper = TypeMapper::new();
        Ok(columns
            .into_iter()
            .map(|col| ColumnInfo::from_metadata(col, &mapper))
            .collect())
    }

    /// Generate and return the model source for a table without writing it.
    pub async fn preview(&self, table: &str) -> Result<String> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;

        let generator = Generator::new(&active.introspector)
            .with_package_name(state.package_name.clone());
        Ok(generator.generate(table).await?.content)
    }

    /// Generate a table's model and write it to the given file path.
    ///
    /// Missing parent directories are created.
    pub async fn write(&self, table: &str, path: &Path) -> Result<PathBuf> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;

        let generator = Generator::new(&active.introspector)
            .with_package_name(state.package_name.clone());
        let source = generator.generate(table).await?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &source.content)?;

        Ok(path.to_path_buf())
    }

    /// Generate models for every table into the given directory.
    ///
    /// Stops at the first per-table failure; the paths written so far are
    /// preserved in the returned [`BatchResult`].
    pub async fn write_all(&self, out_dir: &Path) -> Result<BatchResult> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;

        let generator = Generator::new(&active.introspector)
            .with_package_name(state.package_name.clone());
        generator.generate_all(out_dir).await
    }

    /// Generate models for a selection of tables into the given directory.
    ///
    /// Same first-failure semantics as [`write_all`](Session::write_all).
    pub async fn write_selected(&self, tables: &[String], out_dir: &Path) -> Result<BatchResult> {
        let state = self.state.read().await;
        let active = state.active.as_ref().ok_or(GenError::NotConnected)?;

        let generator = Generator::new(&active.introspector)
            .with_package_name(state.package_name.clone());
        generator.generate_tables(tables, out_dir).await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(engine: &str) -> DbConfig {
        DbConfig {
            engine: engine.to_string(),
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "secret".to_string(),
            database: "app".to_string(),
            schema: "public".to_string(),
            ssl_mode: "disable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disconnected_operations_fail() {
        let session = Session::new();

        assert!(matches!(
            session.list_tables().await,
            Err(GenError::NotConnected)
        ));
        assert!(matches!(
            session.describe_table("users").await,
            Err(GenError::NotConnected)
        ));
        assert!(matches!(
            session.preview("users").await,
            Err(GenError::NotConnected)
        ));
        assert!(matches!(
            session.list_schemas().await,
            Err(GenError::NotConnected)
        ));
        assert!(matches!(
            session.select_schema("public").await,
            Err(GenError::NotConnected)
        ));
        assert!(matches!(
            session.write_all(Path::new("/tmp/out")).await,
            Err(GenError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let session = Session::new();
        assert!(session.disconnect().await.is_ok());
        assert!(session.disconnect().await.is_ok());
    }

    #[tokio::test]
    async fn test_status_when_disconnected() {
        let session = Session::new();
        let status = session.status().await;
        assert!(!status.connected);
        assert!(status.engine.is_empty());
    }

    #[tokio::test]
    async fn test_connect_rejects_unsupported_engine() {
        let session = Session::new();
        let result = session.connect(config("mongodb")).await;
        assert!(matches!(result, Err(GenError::UnsupportedEngine(_))));

        // The failed connect leaves the session disconnected.
        assert!(!session.status().await.connected);
        assert!(matches!(
            session.list_tables().await,
            Err(GenError::NotConnected)
        ));
    }
}
