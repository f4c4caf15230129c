//! Import tracking and Go import-block generation.

use std::collections::BTreeSet;

use super::tags::StructField;

/// Well-known import paths used in generated code.
pub mod well_known {
    pub const TIME: &str = "time";
    pub const DATATYPES: &str = "gorm.io/datatypes";
    pub const UUID: &str = "github.com/google/uuid";
}

/// Tracks and deduplicates required imports for one generated file.
///
/// Backed by a sorted set so the rendered block is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ImportManager {
    imports: BTreeSet<String>,
}

impl ImportManager {
    /// Create a new empty ImportManager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import path. Empty paths are ignored.
    pub fn add(&mut self, import_path: &str) {
        if !import_path.is_empty() {
            self.imports.insert(import_path.to_string());
        }
    }

    /// Check if an import path is present.
    pub fn has(&self, import_path: &str) -> bool {
        self.imports.contains(import_path)
    }

    /// Number of tracked imports.
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    /// Whether no imports are tracked.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Render the Go import block.
    ///
    /// Standard-library imports come first, then third-party, each group
    /// sorted, with a blank line between the groups.
    pub fn generate_import_block(&self) -> String {
        if self.imports.is_empty() {
            return String::new();
        }

        let (std_lib, third_party): (Vec<&String>, Vec<&String>) =
            self.imports.iter().partition(|path| is_std_lib(path));

        let mut block = String::from("import (\n");

        for path in &std_lib {
            block.push_str(&format!("\t\"{}\"\n", path));
        }

        if !std_lib.is_empty() && !third_party.is_empty() {
            block.push('\n');
        }

        for path in &third_party {
            block.push_str(&format!("\t\"{}\"\n", path));
        }

        block.push(')');
        block
    }
}

/// Check if an import path belongs to the Go standard library.
///
/// Standard-library paths have no dot in their first segment
/// ("time", "encoding/json"); module paths start with a host name
/// ("gorm.io/datatypes", "github.com/google/uuid").
fn is_std_lib(path: &str) -> bool {
    let first_segment = path.split('/').next().unwrap_or(path);
    !first_segment.contains('.')
}

/// Scan generated fields and collect the imports their types require.
pub fn detect_required_imports(fields: &[StructField]) -> ImportManager {
    let mut imports = ImportManager::new();

    for field in fields {
        match field.go_type.as_str() {
            "time.Time" => imports.add(well_known::TIME),
            "datatypes.JSON" => imports.add(well_known::DATATYPES),
            "uuid.UUID" => imports.add(well_known::UUID),
            _ => {}
        }

        if let Some(path) = field.import {
            imports.add(path);
        }
    }

    imports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(go_type: &str, import: Option<&'static str>) -> StructField {
        StructField {
            name: "F".to_string(),
            go_type: go_type.to_string(),
            tags: String::new(),
            comment: String::new(),
            import,
        }
    }

    #[test]
    fn test_is_std_lib() {
        assert!(is_std_lib("time"));
        assert!(is_std_lib("encoding/json"));
        assert!(!is_std_lib("gorm.io/datatypes"));
        assert!(!is_std_lib("github.com/google/uuid"));
    }

    #[test]
    fn test_empty_manager_renders_nothing() {
        assert_eq!(ImportManager::new().generate_import_block(), "");
    }

    #[test]
    fn test_deduplication() {
        let mut imports = ImportManager::new();
        imports.add("time");
        imports.add("time");
        assert_eq!(imports.len(), 1);
    }

    #[test]
    fn test_std_before_third_party_with_separator() {
        let mut imports = ImportManager::new();
        imports.add("gorm.io/datatypes");
        imports.add("time");

        let block = imports.generate_import_block();
        assert_eq!(block, "import (\n\t\"time\"\n\n\t\"gorm.io/datatypes\"\n)");
    }

    #[test]
    fn test_third_party_sorted() {
        let mut imports = ImportManager::new();
        imports.add("gorm.io/datatypes");
        imports.add("github.com/google/uuid");

        let block = imports.generate_import_block();
        let uuid_pos = block.find("github.com").unwrap();
        let datatypes_pos = block.find("gorm.io").unwrap();
        assert!(uuid_pos < datatypes_pos);
    }

    #[test]
    fn test_detect_imports_from_fields() {
        let fields = vec![
            field("int64", None),
            field("time.Time", Some(well_known::TIME)),
            field("time.Time", Some(well_known::TIME)),
            field("datatypes.JSON", Some(well_known::DATATYPES)),
        ];

        let imports = detect_required_imports(&fields);
        assert_eq!(imports.len(), 2);
        assert!(imports.has(well_known::TIME));
        assert!(imports.has(well_known::DATATYPES));
        assert!(!imports.has(well_known::UUID));
    }
}
