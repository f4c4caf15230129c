//! Schema metadata types for database tables and columns.
//!
//! These types provide an engine-agnostic representation of catalog metadata
//! shared by both introspector variants and the generator.

use serde::{Deserialize, Serialize};

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,

    /// Normalized data type (e.g., "varchar", "integer").
    pub data_type: String,

    /// Original engine type with size/precision (e.g., "varchar(255)", "int unsigned").
    pub raw_type: String,

    /// Whether the column allows NULL.
    pub is_nullable: bool,

    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,

    /// Whether the column auto-increments.
    pub is_auto_increment: bool,

    /// Default value literal, if any.
    pub default_value: Option<String>,

    /// Enum values for ENUM types (empty otherwise).
    pub enum_values: Vec<String>,

    /// Whether the column is an unsigned integer (MySQL).
    pub is_unsigned: bool,

    /// Maximum character length for string types.
    pub char_max_length: Option<i64>,

    /// Precision for numeric types.
    pub numeric_precision: Option<i64>,

    /// Scale for numeric types.
    pub numeric_scale: Option<i64>,

    /// Column comment, empty if none.
    pub comment: String,

    /// Ordinal position (1-based). Strictly increasing within a table.
    pub ordinal_position: i32,
}

impl ColumnMetadata {
    /// Create a column with the given name and raw type; all flags off.
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        let data_type = base_type(&raw_type);
        Self {
            name: name.into(),
            data_type,
            raw_type,
            is_nullable: true,
            is_primary_key: false,
            is_auto_increment: false,
            default_value: None,
            enum_values: Vec::new(),
            is_unsigned: false,
            char_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
            comment: String::new(),
            ordinal_position: 0,
        }
    }
}

/// Extract the base type from a raw type with size specification.
///
/// e.g., "varchar(255)" -> "varchar", "decimal(10,2)" -> "decimal".
pub fn base_type(raw_type: &str) -> String {
    match raw_type.find('(') {
        Some(idx) => raw_type[..idx].trim().to_string(),
        None => raw_type.trim().to_string(),
    }
}

/// Table metadata.
///
/// Created fresh per introspection call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Schema (PostgreSQL) or database (MySQL) name.
    pub schema: String,

    /// Table name.
    pub name: String,

    /// Columns in ordinal order.
    pub columns: Vec<ColumnMetadata>,

    /// Table comment, empty if none.
    pub comment: String,
}

impl TableMetadata {
    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_strips_size() {
        assert_eq!(base_type("varchar(255)"), "varchar");
        assert_eq!(base_type("decimal(10,2)"), "decimal");
        assert_eq!(base_type("text"), "text");
        assert_eq!(base_type("tinyint(1) unsigned"), "tinyint");
    }

    #[test]
    fn test_full_name() {
        let table = TableMetadata {
            schema: "public".to_string(),
            name: "users".to_string(),
            columns: vec![],
            comment: String::new(),
        };
        assert_eq!(table.full_name(), "public.users");
    }

    #[test]
    fn test_column_new_defaults() {
        let col = ColumnMetadata::new("id", "bigint unsigned");
        assert_eq!(col.data_type, "bigint unsigned");
        assert!(col.is_nullable);
        assert!(!col.is_primary_key);
        assert!(col.enum_values.is_empty());
    }
}
