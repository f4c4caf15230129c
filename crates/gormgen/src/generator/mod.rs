//! Struct-file generation from introspected table metadata.
//!
//! [`Generator`] orchestrates one fetch-map-render cycle per table:
//! metadata via an [`Introspect`] implementation, field construction via
//! the type mapper / tag builder / naming helpers, import detection, and
//! template rendering with a formatting post-pass.

pub mod format;
pub mod imports;
pub mod naming;
pub mod tags;
pub mod template;
pub mod typemap;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::traits::Introspect;
use crate::error::{GenError, Result};

use format::format_go_source;
use imports::{detect_required_imports, well_known};
use naming::{to_file_name, to_struct_name};
use tags::{StructField, TagBuilder};
use template::{render, TemplateData};
use typemap::TypeMapper;

/// Default package name for generated files.
const DEFAULT_PACKAGE: &str = "models";

/// One generated model file.
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    /// File name derived from the table name (snake_case + ".go").
    pub file_name: String,

    /// Generated Go source text.
    pub content: String,

    /// Set when pretty-printing failed and `content` is unformatted.
    pub format_warning: Option<String>,
}

/// Outcome of a batch generation run.
///
/// Batch generation stops at the first per-table failure; `written` holds
/// the paths produced before the failure and is meaningful either way.
#[derive(Debug)]
pub struct BatchResult {
    /// Paths written, in table order.
    pub written: Vec<PathBuf>,

    /// The table that failed and its error, if the batch aborted.
    pub failed: Option<(String, GenError)>,
}

impl BatchResult {
    /// Whether every table was generated.
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Generates Go model structs from database tables.
pub struct Generator<'a, I: Introspect + ?Sized> {
    introspector: &'a I,
    type_mapper: TypeMapper,
    tag_builder: TagBuilder,
    package_name: String,
}

impl<'a, I: Introspect + ?Sized> Generator<'a, I> {
    /// Create a new Generator over an introspector.
    pub fn new(introspector: &'a I) -> Self {
        Self {
            introspector,
            type_mapper: TypeMapper::new(),
            tag_builder: TagBuilder::new(),
            package_name: DEFAULT_PACKAGE.to_string(),
        }
    }

    /// Override the emitted package name.
    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        let package_name = package_name.into();
        if !package_name.is_empty() {
            self.package_name = package_name;
        }
        self
    }

    /// Generate the model source for one table.
    pub async fn generate(&self, table_name: &str) -> Result<GeneratedSource> {
        let meta = self.introspector.table_metadata(table_name).await?;

        let fields: Vec<StructField> = meta
            .columns
            .iter()
            .map(|col| self.tag_builder.build_struct_field(col, &self.type_mapper))
            .collect();

        let import_mgr = detect_required_imports(&fields);

        let data = TemplateData {
            package_name: &self.package_name,
            imports: import_mgr.generate_import_block(),
            struct_name: to_struct_name(table_name),
            table_name,
            fields: &fields,
            has_time: import_mgr.has(well_known::TIME),
            has_json: import_mgr.has(well_known::DATATYPES),
            has_uuid: import_mgr.has(well_known::UUID),
        };

        let rendered = render(&data)?;

        // Formatting failure degrades to the unformatted text; the output
        // is never dropped.
        let (content, format_warning) = match format_go_source(&rendered) {
            Ok(formatted) => (formatted, None),
            Err(err) => {
                warn!(
                    "Formatting failed for table {}, returning unformatted source: {}",
                    table_name, err
                );
                (rendered, Some(err.to_string()))
            }
        };

        debug!(
            "Generated {} field(s) for table {}",
            data.fields.len(),
            table_name
        );

        Ok(GeneratedSource {
            file_name: to_file_name(table_name),
            content,
            format_warning,
        })
    }

    /// Generate a table's model and write it under the output directory.
    pub async fn generate_to_file(&self, table_name: &str, out_dir: &Path) -> Result<PathBuf> {
        let source = self.generate(table_name).await?;

        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(&source.file_name);
        std::fs::write(&path, &source.content)?;

        Ok(path)
    }

    /// Generate models for every table, stopping at the first failure.
    ///
    /// An error listing the tables aborts outright; a per-table failure is
    /// returned in [`BatchResult::failed`] alongside the paths already
    /// written. Remaining tables are not attempted.
    pub async fn generate_all(&self, out_dir: &Path) -> Result<BatchResult> {
        let tables = self.introspector.tables().await?;
        self.generate_tables(&tables, out_dir).await
    }

    /// Generate models for the given tables, in order, stopping at the
    /// first failure.
    pub async fn generate_tables(&self, tables: &[String], out_dir: &Path) -> Result<BatchResult> {
        let mut written = Vec::with_capacity(tables.len());
        for table in tables {
            match self.generate_to_file(table, out_dir).await {
                Ok(path) => written.push(path),
                Err(err) => {
                    return Ok(BatchResult {
                        written,
                        failed: Some((table.clone(), err)),
                    });
                }
            }
        }

        info!("Generated {} model file(s)", written.len());
        Ok(BatchResult {
            written,
            failed: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::core::schema::{ColumnMetadata, TableMetadata};

    /// In-memory introspector for generator tests.
    struct FakeIntrospector {
        tables: Vec<TableMetadata>,
        fail_on: Option<String>,
    }

    impl FakeIntrospector {
        fn new(tables: Vec<TableMetadata>) -> Self {
            Self {
                tables,
                fail_on: None,
            }
        }

        fn failing_on(mut self, table: &str) -> Self {
            self.fail_on = Some(table.to_string());
            self
        }
    }

    #[async_trait]
    impl Introspect for FakeIntrospector {
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }

        async fn tables(&self) -> Result<Vec<String>> {
            Ok(self.tables.iter().map(|t| t.name.clone()).collect())
        }

        async fn columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
            Ok(self.table_metadata(table).await?.columns)
        }

        async fn table_metadata(&self, table: &str) -> Result<TableMetadata> {
            if self.fail_on.as_deref() == Some(table) {
                return Err(GenError::query(
                    format!("loading metadata for table {}", table),
                    "simulated failure",
                ));
            }
            self.tables
                .iter()
                .find(|t| t.name == table)
                .cloned()
                .ok_or_else(|| GenError::query("loading table metadata", "no such table"))
        }
    }

    fn users_table() -> TableMetadata {
        let mut id = ColumnMetadata::new("id", "bigint");
        id.is_primary_key = true;
        id.is_auto_increment = true;
        id.is_nullable = false;
        id.ordinal_position = 1;

        let mut email = ColumnMetadata::new("email", "varchar(255)");
        email.is_nullable = false;
        email.ordinal_position = 2;

        let mut created_at = ColumnMetadata::new("created_at", "timestamp");
        created_at.is_nullable = false;
        created_at.ordinal_position = 3;

        TableMetadata {
            schema: "app".to_string(),
            name: "users".to_string(),
            columns: vec![id, email, created_at],
            comment: String::new(),
        }
    }

    fn simple_table(name: &str) -> TableMetadata {
        let mut id = ColumnMetadata::new("id", "int");
        id.is_primary_key = true;
        id.is_nullable = false;
        id.ordinal_position = 1;

        TableMetadata {
            schema: "app".to_string(),
            name: name.to_string(),
            columns: vec![id],
            comment: String::new(),
        }
    }

    #[tokio::test]
    async fn test_generate_users_end_to_end() {
        let introspector = FakeIntrospector::new(vec![users_table()]);
        let generator = Generator::new(&introspector);

        let source = generator.generate("users").await.unwrap();
        assert_eq!(source.file_name, "users.go");
        assert!(source.format_warning.is_none());

        let content = &source.content;
        assert!(content.starts_with("package models\n"));
        assert!(content.contains("type User struct {"));
        assert!(content.contains("func (User) TableName() string {\n\treturn \"users\"\n}"));

        // Exactly the timestamp dependency.
        assert!(content.contains("import (\n\t\"time\"\n)"));
        assert!(!content.contains("gorm.io/datatypes"));
        assert!(!content.contains("github.com/google/uuid"));

        // Fields in column order with the contracted tag shapes.
        let id_pos = content.find("ID").unwrap();
        let email_pos = content.find("Email").unwrap();
        let created_pos = content.find("CreatedAt").unwrap();
        assert!(id_pos < email_pos && email_pos < created_pos);

        assert!(content.contains("`gorm:\"primaryKey;autoIncrement;column:id;type:bigint\" json:\"id\"`"));
        assert!(content.contains("`gorm:\"column:email;type:varchar(255);not null\" json:\"email\"`"));
        assert!(content
            .contains("`gorm:\"column:created_at;type:timestamp;not null\" json:\"created_at\"`"));
    }

    #[tokio::test]
    async fn test_generate_is_deterministic() {
        let introspector = FakeIntrospector::new(vec![users_table()]);
        let generator = Generator::new(&introspector);

        let first = generator.generate("users").await.unwrap();
        let second = generator.generate("users").await.unwrap();
        assert_eq!(first.content, second.content);
    }

    #[tokio::test]
    async fn test_generate_custom_package_name() {
        let introspector = FakeIntrospector::new(vec![simple_table("orders")]);
        let generator = Generator::new(&introspector).with_package_name("entities");

        let source = generator.generate("orders").await.unwrap();
        assert!(source.content.starts_with("package entities\n"));
        assert!(source.content.contains("type Order struct {"));
    }

    #[tokio::test]
    async fn test_generate_to_file_writes_snake_name() {
        let introspector = FakeIntrospector::new(vec![simple_table("order_items")]);
        let generator = Generator::new(&introspector);
        let dir = tempfile::tempdir().unwrap();

        let path = generator
            .generate_to_file("order_items", dir.path())
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "order_items.go");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("type OrderItem struct {"));
    }

    #[tokio::test]
    async fn test_generate_all_aborts_on_first_failure() {
        let introspector = FakeIntrospector::new(vec![
            simple_table("accounts"),
            simple_table("boxes"),
            simple_table("categories"),
        ])
        .failing_on("boxes");
        let generator = Generator::new(&introspector);
        let dir = tempfile::tempdir().unwrap();

        let result = generator.generate_all(dir.path()).await.unwrap();
        assert_eq!(result.written.len(), 1);
        assert!(result.written[0].ends_with("accounts.go"));

        let (failed_table, err) = result.failed.as_ref().unwrap();
        assert_eq!(failed_table, "boxes");
        assert!(matches!(err, GenError::Query { .. }));

        // The third table was never attempted.
        assert!(!dir.path().join("categories.go").exists());
        assert!(!result.is_complete());
    }

    #[tokio::test]
    async fn test_generate_selected_tables_in_given_order() {
        let introspector =
            FakeIntrospector::new(vec![simple_table("accounts"), simple_table("users")]);
        let generator = Generator::new(&introspector);
        let dir = tempfile::tempdir().unwrap();

        let selection = vec!["users".to_string(), "accounts".to_string()];
        let result = generator
            .generate_tables(&selection, dir.path())
            .await
            .unwrap();
        assert!(result.is_complete());
        assert!(result.written[0].ends_with("users.go"));
        assert!(result.written[1].ends_with("accounts.go"));
    }

    #[tokio::test]
    async fn test_generate_all_complete() {
        let introspector =
            FakeIntrospector::new(vec![simple_table("accounts"), simple_table("users")]);
        let generator = Generator::new(&introspector);
        let dir = tempfile::tempdir().unwrap();

        let result = generator.generate_all(dir.path()).await.unwrap();
        assert!(result.is_complete());
        assert_eq!(result.written.len(), 2);
        assert!(dir.path().join("accounts.go").exists());
        assert!(dir.path().join("users.go").exists());
    }
}
