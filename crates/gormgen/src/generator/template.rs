//! Rendering of generated Go model files.
//!
//! The renderer assembles the file line by line with Go's tab indentation.
//! Output shape is part of the tool's contract: one exported struct per
//! table, tagged fields in column order, and a `TableName()` accessor
//! returning the literal table name.

use crate::error::{GenError, Result};

use super::tags::StructField;

/// Data needed to render one generated file.
#[derive(Debug, Clone)]
pub struct TemplateData<'a> {
    /// Go package name.
    pub package_name: &'a str,

    /// Rendered import block, empty if no imports are needed.
    pub imports: String,

    /// Exported struct name.
    pub struct_name: String,

    /// Source table name, embedded verbatim in `TableName()`.
    pub table_name: &'a str,

    /// Fields in column order.
    pub fields: &'a [StructField],

    /// Whether the file uses time.Time.
    pub has_time: bool,

    /// Whether the file uses datatypes.JSON.
    pub has_json: bool,

    /// Whether the file uses uuid.UUID.
    pub has_uuid: bool,
}

/// Render a generated model file.
pub fn render(data: &TemplateData<'_>) -> Result<String> {
    if data.package_name.is_empty() {
        return Err(GenError::TemplateRender("empty package name".to_string()));
    }
    if data.struct_name.is_empty() {
        return Err(GenError::TemplateRender(format!(
            "table '{}' produced an empty struct name",
            data.table_name
        )));
    }

    let mut out = String::new();

    out.push_str(&format!("package {}\n", data.package_name));

    if !data.imports.is_empty() {
        out.push('\n');
        out.push_str(&data.imports);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "// {} represents the {} table\n",
        data.struct_name, data.table_name
    ));
    out.push_str(&format!("type {} struct {{\n", data.struct_name));

    for field in data.fields {
        out.push_str(&format!("\t{} {} `{}`", field.name, field.go_type, field.tags));
        if !field.comment.is_empty() {
            out.push(' ');
            out.push_str(&field.comment);
        }
        out.push('\n');
    }

    out.push_str("}\n");

    out.push('\n');
    out.push_str("// TableName returns the table name for GORM\n");
    out.push_str(&format!(
        "func ({}) TableName() string {{\n",
        data.struct_name
    ));
    out.push_str(&format!("\treturn \"{}\"\n", data.table_name));
    out.push_str("}\n");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, go_type: &str, tags: &str) -> StructField {
        StructField {
            name: name.to_string(),
            go_type: go_type.to_string(),
            tags: tags.to_string(),
            comment: String::new(),
            import: None,
        }
    }

    #[test]
    fn test_render_without_imports() {
        let fields = vec![field("Name", "string", "gorm:\"column:name\" json:\"name\"")];
        let data = TemplateData {
            package_name: "models",
            imports: String::new(),
            struct_name: "User".to_string(),
            table_name: "users",
            fields: &fields,
            has_time: false,
            has_json: false,
            has_uuid: false,
        };

        let out = render(&data).unwrap();
        assert!(out.starts_with("package models\n\n// User represents the users table\n"));
        assert!(out.contains("type User struct {"));
        assert!(out.contains("func (User) TableName() string {\n\treturn \"users\"\n}"));
    }

    #[test]
    fn test_render_with_imports_and_comment() {
        let mut f = field(
            "CreatedAt",
            "time.Time",
            "gorm:\"column:created_at\" json:\"created_at\"",
        );
        f.comment = "// creation time".to_string();
        let fields = vec![f];

        let data = TemplateData {
            package_name: "models",
            imports: "import (\n\t\"time\"\n)".to_string(),
            struct_name: "Event".to_string(),
            table_name: "events",
            fields: &fields,
            has_time: true,
            has_json: false,
            has_uuid: false,
        };

        let out = render(&data).unwrap();
        assert!(out.contains("package models\n\nimport (\n\t\"time\"\n)\n\n// Event"));
        assert!(out.contains("`gorm:\"column:created_at\" json:\"created_at\"` // creation time"));
    }

    #[test]
    fn test_render_rejects_empty_struct_name() {
        let data = TemplateData {
            package_name: "models",
            imports: String::new(),
            struct_name: String::new(),
            table_name: "???",
            fields: &[],
            has_time: false,
            has_json: false,
            has_uuid: false,
        };

        assert!(matches!(
            render(&data),
            Err(GenError::TemplateRender(_))
        ));
    }
}
