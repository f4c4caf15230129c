//! Pretty-printing of rendered Go source.
//!
//! A lightweight gofmt-style pass: struct fields are aligned into columns
//! and delimiter balance is validated. Formatting failure is recoverable —
//! callers fall back to the unformatted text and surface the error.

use crate::error::{GenError, Result};

/// Format rendered Go source.
///
/// Returns [`GenError::Format`] if the source fails validation; callers
/// degrade to the unformatted input in that case.
pub fn format_go_source(source: &str) -> Result<String> {
    validate_balance(source)?;

    let mut out: Vec<String> = Vec::new();
    let mut struct_fields: Vec<String> = Vec::new();
    let mut in_struct = false;

    for line in source.lines() {
        if !in_struct && line.starts_with("type ") && line.ends_with("struct {") {
            in_struct = true;
            out.push(line.to_string());
            continue;
        }

        if in_struct {
            if line == "}" {
                out.extend(align_fields(&struct_fields)?);
                struct_fields.clear();
                in_struct = false;
                out.push(line.to_string());
            } else {
                struct_fields.push(line.to_string());
            }
            continue;
        }

        out.push(line.to_string());
    }

    if in_struct {
        return Err(GenError::Format("unterminated struct body".to_string()));
    }

    let mut formatted = out.join("\n");
    if !formatted.ends_with('\n') {
        formatted.push('\n');
    }
    Ok(formatted)
}

/// Align struct field lines into name / type / tag columns.
fn align_fields(lines: &[String]) -> Result<Vec<String>> {
    struct Parsed {
        name: String,
        go_type: String,
        rest: String,
    }

    let mut parsed = Vec::with_capacity(lines.len());
    for line in lines {
        let trimmed = line.trim_start_matches('\t').trim_start();
        let Some((name, go_type, rest)) = split_field(trimmed) else {
            return Err(GenError::Format(format!(
                "malformed struct field line: {:?}",
                line
            )));
        };
        parsed.push(Parsed {
            name: name.to_string(),
            go_type: go_type.to_string(),
            rest: rest.to_string(),
        });
    }

    let name_width = parsed.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let type_width = parsed.iter().map(|p| p.go_type.len()).max().unwrap_or(0);

    Ok(parsed
        .into_iter()
        .map(|p| {
            format!(
                "\t{:<nw$} {:<tw$} {}",
                p.name,
                p.go_type,
                p.rest,
                nw = name_width,
                tw = type_width
            )
            .trim_end()
            .to_string()
        })
        .collect())
}

/// Split a struct field line into (name, type, tag-and-comment).
///
/// Tolerates runs of spaces between the columns so already-aligned input
/// re-formats to the same text.
fn split_field(line: &str) -> Option<(&str, &str, &str)> {
    let name_end = line.find(char::is_whitespace)?;
    let (name, after_name) = line.split_at(name_end);
    let after_name = after_name.trim_start();

    match after_name.find(char::is_whitespace) {
        Some(type_end) => {
            let (go_type, rest) = after_name.split_at(type_end);
            Some((name, go_type, rest.trim_start()))
        }
        None if !after_name.is_empty() => Some((name, after_name, "")),
        None => None,
    }
}

/// Validate delimiter balance outside string and rune literals.
fn validate_balance(source: &str) -> Result<()> {
    let mut depth_brace: i64 = 0;
    let mut depth_paren: i64 = 0;
    let mut depth_bracket: i64 = 0;

    for (lineno, line) in source.lines().enumerate() {
        let mut in_string = false;
        let mut in_raw_string = false;
        let mut escaped = false;

        for c in line.chars() {
            if in_raw_string {
                if c == '`' {
                    in_raw_string = false;
                }
                continue;
            }
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '`' => in_raw_string = true,
                '{' => depth_brace += 1,
                '}' => depth_brace -= 1,
                '(' => depth_paren += 1,
                ')' => depth_paren -= 1,
                '[' => depth_bracket += 1,
                ']' => depth_bracket -= 1,
                _ => {}
            }
            if depth_brace < 0 || depth_paren < 0 || depth_bracket < 0 {
                return Err(GenError::Format(format!(
                    "unbalanced delimiter at line {}",
                    lineno + 1
                )));
            }
        }

        // Strings and raw tag literals never span rendered lines.
        if in_string || in_raw_string {
            return Err(GenError::Format(format!(
                "unterminated literal at line {}",
                lineno + 1
            )));
        }
    }

    if depth_brace != 0 || depth_paren != 0 || depth_bracket != 0 {
        return Err(GenError::Format("unbalanced delimiters".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligns_struct_fields() {
        let src = "package models\n\ntype User struct {\n\tID int64 `gorm:\"column:id\" json:\"id\"`\n\tCreatedAt time.Time `gorm:\"column:created_at\" json:\"created_at\"`\n}\n";
        let formatted = format_go_source(src).unwrap();
        assert!(formatted.contains("\tID        int64     `gorm:\"column:id\" json:\"id\"`"));
        assert!(
            formatted.contains("\tCreatedAt time.Time `gorm:\"column:created_at\" json:\"created_at\"`")
        );
    }

    #[test]
    fn test_preserves_non_struct_lines() {
        let src = "package models\n\nfunc (User) TableName() string {\n\treturn \"users\"\n}\n";
        let formatted = format_go_source(src).unwrap();
        assert_eq!(formatted, src);
    }

    #[test]
    fn test_rejects_unbalanced_braces() {
        let src = "package models\n\ntype User struct {\n";
        assert!(matches!(
            format_go_source(src),
            Err(GenError::Format(_))
        ));
    }

    #[test]
    fn test_rejects_unterminated_tag_literal() {
        let src = "package models\n\nvar x = `oops\n";
        assert!(matches!(
            format_go_source(src),
            Err(GenError::Format(_))
        ));
    }

    #[test]
    fn test_idempotent_on_aligned_output() {
        let src = "package models\n\ntype User struct {\n\tID int64 `json:\"id\"`\n\tName string `json:\"name\"`\n}\n";
        let once = format_go_source(src).unwrap();
        let twice = format_go_source(&once).unwrap();
        assert_eq!(once, twice);
    }
}
