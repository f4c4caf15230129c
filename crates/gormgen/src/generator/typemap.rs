//! Database type to Go type mapping.
//!
//! The mapping table is immutable, built once on first use, and shared
//! process-wide. [`TypeMapper::map`] is a total function over
//! (raw type, nullability): unrecognized types degrade to `interface{}`
//! with a diagnostic note so the generated output stays buildable.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::schema::base_type;

/// A Go type with its import requirement.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapping {
    /// Go type name (e.g., "int64", "time.Time").
    pub go_type: &'static str,
    /// Import path required by the type, if any.
    pub import: Option<&'static str>,
    /// Raw byte sequence types ([]byte) that never take a pointer prefix.
    pub is_slice: bool,
}

const fn plain(go_type: &'static str) -> TypeMapping {
    TypeMapping {
        go_type,
        import: None,
        is_slice: false,
    }
}

const fn imported(go_type: &'static str, import: &'static str) -> TypeMapping {
    TypeMapping {
        go_type,
        import: Some(import),
        is_slice: false,
    }
}

const fn bytes() -> TypeMapping {
    TypeMapping {
        go_type: "[]byte",
        import: None,
        is_slice: true,
    }
}

/// Known type mappings, keyed by normalized type name.
static TYPE_MAP: LazyLock<HashMap<&'static str, TypeMapping>> = LazyLock::new(|| {
    HashMap::from([
        // Integer types
        ("int", plain("int32")),
        ("integer", plain("int32")),
        ("smallint", plain("int16")),
        ("mediumint", plain("int32")),
        ("bigint", plain("int64")),
        ("tinyint", plain("int8")),
        ("serial", plain("int32")),
        ("bigserial", plain("int64")),
        ("smallserial", plain("int16")),
        // Unsigned integer types (MySQL)
        ("int unsigned", plain("uint32")),
        ("integer unsigned", plain("uint32")),
        ("smallint unsigned", plain("uint16")),
        ("mediumint unsigned", plain("uint32")),
        ("bigint unsigned", plain("uint64")),
        ("tinyint unsigned", plain("uint8")),
        // Float/Decimal types
        ("decimal", plain("float64")),
        ("numeric", plain("float64")),
        ("float", plain("float32")),
        ("double", plain("float64")),
        ("double precision", plain("float64")),
        ("real", plain("float32")),
        ("money", plain("float64")),
        // String types
        ("varchar", plain("string")),
        ("char", plain("string")),
        ("character", plain("string")),
        ("character varying", plain("string")),
        ("text", plain("string")),
        ("longtext", plain("string")),
        ("mediumtext", plain("string")),
        ("tinytext", plain("string")),
        ("citext", plain("string")),
        // Date/Time types. A bare time-of-day has no date component, so it
        // maps to string rather than time.Time.
        ("timestamp", imported("time.Time", "time")),
        ("timestamptz", imported("time.Time", "time")),
        ("timestamp with time zone", imported("time.Time", "time")),
        ("timestamp without time zone", imported("time.Time", "time")),
        ("datetime", imported("time.Time", "time")),
        ("date", imported("time.Time", "time")),
        ("time", plain("string")),
        ("time with time zone", plain("string")),
        ("time without time zone", plain("string")),
        ("year", plain("int16")),
        ("interval", plain("string")),
        // Boolean types
        ("bool", plain("bool")),
        ("boolean", plain("bool")),
        ("tinyint(1)", plain("bool")),
        // JSON types
        ("json", imported("datatypes.JSON", "gorm.io/datatypes")),
        ("jsonb", imported("datatypes.JSON", "gorm.io/datatypes")),
        // UUID type
        ("uuid", imported("uuid.UUID", "github.com/google/uuid")),
        // Binary types
        ("bytea", bytes()),
        ("blob", bytes()),
        ("tinyblob", bytes()),
        ("mediumblob", bytes()),
        ("longblob", bytes()),
        ("binary", bytes()),
        ("varbinary", bytes()),
        ("bit", bytes()),
        // ENUM/SET (values are recorded on the column, not in the type)
        ("enum", plain("string")),
        ("set", plain("string")),
        // PostgreSQL specific types
        ("inet", plain("string")),
        ("cidr", plain("string")),
        ("macaddr", plain("string")),
        ("macaddr8", plain("string")),
        ("xml", plain("string")),
        ("point", plain("string")),
        ("line", plain("string")),
        ("lseg", plain("string")),
        ("box", plain("string")),
        ("path", plain("string")),
        ("polygon", plain("string")),
        ("circle", plain("string")),
    ])
});

/// Result of mapping a database type to a Go type.
#[derive(Debug, Clone)]
pub struct MappedType {
    /// Resolved Go type.
    pub go_type: String,
    /// Import path required by the type, if any.
    pub import: Option<&'static str>,
    /// Diagnostic note for unresolved types.
    pub note: Option<String>,
}

/// Converts database column types to Go types.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    /// Create a new TypeMapper.
    pub fn new() -> Self {
        Self
    }

    /// Map a raw database type to a Go type.
    ///
    /// Resolution order: unsigned-qualified lookup, tinyint(1) boolean,
    /// exact match, base-type match, `interface{}` fallback with a note.
    pub fn map(&self, raw_type: &str, nullable: bool) -> MappedType {
        let normalized = raw_type.trim().to_lowercase();
        let base = base_type(&normalized);

        // Unsigned integers (MySQL) take priority over the signed base type.
        if normalized.contains("unsigned") {
            let unsigned_key = format!("{} unsigned", base);
            if let Some(mapping) = TYPE_MAP.get(unsigned_key.as_str()) {
                return resolve(mapping, nullable);
            }
        }

        // tinyint(1) carries boolean semantics in MySQL.
        if normalized.starts_with("tinyint(1)") && !normalized.contains("unsigned") {
            return resolve(&TYPE_MAP["tinyint(1)"], nullable);
        }

        if let Some(mapping) = TYPE_MAP.get(normalized.as_str()) {
            return resolve(mapping, nullable);
        }

        if let Some(mapping) = TYPE_MAP.get(base.as_str()) {
            return resolve(mapping, nullable);
        }

        MappedType {
            go_type: apply_nullable("interface{}", nullable, false),
            import: None,
            note: Some(format!("unknown type: {}", raw_type)),
        }
    }
}

fn resolve(mapping: &TypeMapping, nullable: bool) -> MappedType {
    MappedType {
        go_type: apply_nullable(mapping.go_type, nullable, mapping.is_slice),
        import: mapping.import,
        note: None,
    }
}

/// Nullable columns keep the plain Go type: GORM represents NULL with the
/// zero value, and nullability is conveyed by the tag, not the type.
fn apply_nullable(go_type: &str, _nullable: bool, _is_slice: bool) -> String {
    go_type.to_string()
}

static ENUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"enum\s*\(\s*(.+)\s*\)").expect("enum regex"));
static ENUM_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'").expect("enum value regex"));

/// Extract enum values from a MySQL enum declaration.
///
/// e.g., `enum('active','inactive','pending')` -> `["active", "inactive", "pending"]`.
/// Non-enum input yields an empty vector.
pub fn parse_enum_values(column_type: &str) -> Vec<String> {
    let lowered = column_type.to_lowercase();
    let Some(captures) = ENUM_RE.captures(&lowered) else {
        return Vec::new();
    };

    let values_part = captures.get(1).map_or("", |m| m.as_str());
    ENUM_VALUE_RE
        .captures_iter(values_part)
        .map(|c| c[1].to_string())
        .collect()
}

/// Render a Go comment listing enum values, empty string for no values.
pub fn format_enum_comment(values: &[String]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("// enum({})", quoted.join(","))
}
