//! GORM and JSON struct-tag assembly.
//!
//! Tag attribute order is fixed and parsed by downstream tooling:
//! primaryKey, autoIncrement, column, type, default, not null.

use crate::core::schema::ColumnMetadata;

use super::naming::to_field_name;
use super::typemap::{format_enum_comment, TypeMapper};

/// A Go struct field computed from one column.
#[derive(Debug, Clone)]
pub struct StructField {
    /// Exported Go field name.
    pub name: String,

    /// Resolved Go type.
    pub go_type: String,

    /// Complete struct tag text (gorm + json).
    pub tags: String,

    /// Trailing comment, empty if none.
    pub comment: String,

    /// Import path required by the type, if any.
    pub import: Option<&'static str>,
}

/// Builds struct tags from column metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagBuilder;

impl TagBuilder {
    /// Create a new TagBuilder.
    pub fn new() -> Self {
        Self
    }

    /// Build the GORM tag for a column.
    pub fn build_gorm_tag(&self, col: &ColumnMetadata) -> String {
        let mut parts: Vec<String> = Vec::new();

        if col.is_primary_key {
            parts.push("primaryKey".to_string());
        }

        if col.is_auto_increment {
            parts.push("autoIncrement".to_string());
        }

        parts.push(format!("column:{}", col.name));

        // Always carry the raw type for schema-sync tooling.
        parts.push(format!("type:{}", col.raw_type));

        if let Some(default) = &col.default_value {
            let cleaned = self.clean_default_value(default);
            if !cleaned.is_empty() {
                parts.push(format!("default:{}", cleaned));
            }
        }

        // Primary keys are implicitly non-null and do not repeat the marker.
        if !col.is_nullable && !col.is_primary_key {
            parts.push("not null".to_string());
        }

        format!("gorm:\"{}\"", parts.join(";"))
    }

    /// Clean a default value literal for embedding in the tag.
    fn clean_default_value(&self, default_value: &str) -> String {
        // Sequence generators are conveyed by autoIncrement instead.
        if default_value.contains("nextval") {
            return String::new();
        }

        // Automatically-managed timestamp defaults are dropped.
        let lower = default_value.to_lowercase();
        if lower.contains("current_timestamp")
            || lower.contains("now()")
            || lower.contains("current_date")
        {
            return String::new();
        }

        // Strip one layer of parentheses wrapping (PostgreSQL).
        let mut cleaned = default_value;
        if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() >= 2 {
            cleaned = &cleaned[1..cleaned.len() - 1];
        }

        if cleaned.eq_ignore_ascii_case("null") {
            return String::new();
        }

        cleaned.to_string()
    }

    /// Build the JSON tag for a column (wire name unchanged).
    pub fn build_json_tag(&self, col: &ColumnMetadata) -> String {
        format!("json:\"{}\"", col.name)
    }

    /// Build the complete tag text for a column.
    pub fn build_all_tags(&self, col: &ColumnMetadata) -> String {
        format!("{} {}", self.build_gorm_tag(col), self.build_json_tag(col))
    }

    /// Build a complete struct field from column metadata.
    ///
    /// Comment precedence: enum value listing, then unresolved-type note,
    /// then the column's catalog comment.
    pub fn build_struct_field(&self, col: &ColumnMetadata, mapper: &TypeMapper) -> StructField {
        let mapped = mapper.map(&col.raw_type, col.is_nullable);

        let comment = if !col.enum_values.is_empty() {
            format_enum_comment(&col.enum_values)
        } else if let Some(note) = &mapped.note {
            format!("// {}", note)
        } else if !col.comment.is_empty() {
            format!("// {}", col.comment)
        } else {
            String::new()
        };

        StructField {
            name: to_field_name(&col.name),
            go_type: mapped.go_type,
            tags: self.build_all_tags(col),
            comment,
            import: mapped.import,
        }
    }
}
