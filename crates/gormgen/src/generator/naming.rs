//! Identifier naming conversions for generated Go code.
//!
//! Column names become exported field names (PascalCase with acronym
//! correction), table names become singular struct names, and file names
//! keep the snake_case table name.

/// Short tokens that are upper-cased wholesale in exported identifiers,
/// keyed by their lowercase word form.
const ACRONYMS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("url", "URL"),
    ("api", "API"),
    ("http", "HTTP"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("sql", "SQL"),
    ("uuid", "UUID"),
    ("ip", "IP"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("db", "DB"),
];

/// Irregular plural nouns that suffix rules cannot handle.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("mice", "mouse"),
    ("geese", "goose"),
];

/// Convert a snake_case identifier to PascalCase.
///
/// Whole words matching a known acronym are upper-cased entirely
/// ("user_id" -> "UserID").
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for word in s.split('_') {
        if word.is_empty() {
            continue;
        }

        let lower = word.to_lowercase();
        if let Some((_, upper)) = ACRONYMS.iter().find(|(l, _)| *l == lower) {
            result.push_str(upper);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(&chars.as_str().to_lowercase());
            }
        }
    }

    result
}

/// Convert an identifier to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_ascii_uppercase() {
            let boundary = match chars.get(i.wrapping_sub(1)) {
                Some(prev) if i > 0 => {
                    if prev.is_ascii_lowercase() || prev.is_ascii_digit() {
                        true
                    } else if prev.is_ascii_uppercase() {
                        // Last letter of an acronym run followed by a new word
                        // ("HTTPStatus" -> "http_status").
                        chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase())
                    } else {
                        false
                    }
                }
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Upper-case known acronym tokens at word boundaries.
///
/// A boundary is end-of-string or an immediately following uppercase letter
/// (the start of the next word in PascalCase). Idempotent: the replacements
/// never contain their own patterns.
pub fn correct_acronyms(s: &str) -> String {
    let mut result = s.to_string();
    for (lower, upper) in ACRONYMS {
        let pattern = capitalize(lower);
        result = replace_acronym(&result, &pattern, upper);
    }
    result
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn replace_acronym(s: &str, pattern: &str, replacement: &str) -> String {
    let mut result = s.to_string();
    let mut i = 0;

    while i + pattern.len() <= result.len() {
        if result.as_bytes()[i..].starts_with(pattern.as_bytes()) {
            let end = i + pattern.len();
            let at_boundary =
                end == result.len() || result.as_bytes()[end].is_ascii_uppercase();
            if at_boundary {
                result.replace_range(i..end, replacement);
                i += replacement.len();
                continue;
            }
        }
        i += 1;
    }

    result
}

/// Convert a column name to an exported Go field name.
pub fn to_field_name(column_name: &str) -> String {
    correct_acronyms(&to_pascal_case(column_name))
}

/// Convert a table name to a Go struct name (singular PascalCase).
pub fn to_struct_name(table_name: &str) -> String {
    to_pascal_case(&singularize(table_name))
}

/// Convert a table name to a generated file name (snake_case + ".go").
pub fn to_file_name(table_name: &str) -> String {
    format!("{}.go", to_snake_case(table_name))
}

/// Convert a plural table name to its singular form.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(p, _)| *p == word) {
        return singular.to_string();
    }

    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        if let Some(stem) = word.strip_suffix("ves") {
            return format!("{}f", stem);
        }
        if word.ends_with("oes") {
            return word[..word.len() - 2].to_string();
        }
    }

    if word.len() > 2 {
        if let Some(stem) = word.strip_suffix("es") {
            // Strip the full "es" after sibilant endings (boxes -> box,
            // classes -> class), otherwise only the trailing "s".
            if stem.ends_with('s') || stem.ends_with('x') || stem.ends_with('z') {
                return stem.to_string();
            }
            if stem.ends_with("ch") || stem.ends_with("sh") {
                return stem.to_string();
            }
            return word[..word.len() - 1].to_string();
        }

        // Words ending in "ss" are already singular (class, address).
        if word.ends_with("ss") {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }

    word.to_string()
}
