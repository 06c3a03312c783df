//! SQL DDL extraction
//!
//! This module scans a `CREATE TABLE` statement for column definitions and
//! constraints. The column body is isolated by balancing the outer
//! parentheses and split at depth-0 commas, so parenthesized types like
//! `DECIMAL(10,2)` keep their trailing constraints. Constraint lines headed
//! by a structural keyword are skipped as noise.

use crate::parser::schema::{push_field, Field, Validator};
use crate::parser::types::infer_sql_type;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// `CREATE TABLE [IF NOT EXISTS]` with an optionally backtick-quoted name
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?`?(\w+)`?").unwrap()
});

/// `identifier type [constraints...]` within one column definition
static COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^`?(\w+)`?\s+(\w+(?:\([^)]*\))?)(?:\s+(.*))?$").unwrap()
});

static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)DEFAULT\s+['"]?([^'",()\s]+)['"]?"#).unwrap()
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)COMMENT\s+['"]([^'"]+)['"]"#).unwrap());

/// Identifiers that head table-level constraint clauses, not columns
const STRUCTURAL_KEYWORDS: &[&str] =
    &["PRIMARY", "FOREIGN", "KEY", "INDEX", "CONSTRAINT", "UNIQUE"];

/// Default values that mean "no real default"
const NO_DEFAULT_SENTINELS: &[&str] = &["NULL", "CURRENT_TIMESTAMP"];

/// Extract the table name and column fields from DDL text.
pub(crate) fn extract(content: &str) -> (Option<String>, Vec<Field>) {
    let table_caps = match TABLE_RE.captures(content) {
        Some(caps) => caps,
        None => return (None, Vec::new()),
    };
    let table_name = table_caps
        .get(1)
        .map(|m| m.as_str().to_lowercase());

    let body = match column_body(content, table_caps.get(0).map(|m| m.end()).unwrap_or(0)) {
        Some(body) => body,
        None => return (table_name, Vec::new()),
    };

    let mut fields = Vec::new();
    for definition in split_top_level(body) {
        if let Some(field) = parse_column(definition) {
            push_field(&mut fields, field);
        }
    }

    (table_name, fields)
}

/// Isolate the parenthesized column body following the table name.
fn column_body(content: &str, from: usize) -> Option<&str> {
    let open = content[from..].find('(')? + from;
    let mut depth = 0usize;
    for (offset, c) in content[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    // Unterminated body: take everything after the opening paren
    Some(&content[open + 1..])
}

/// Split a column body at commas outside of parentheses.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (offset, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..offset]);
                start = offset + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Parse one column definition; constraint clauses return `None`.
fn parse_column(definition: &str) -> Option<Field> {
    let definition = definition.trim();
    let caps = COLUMN_RE.captures(definition)?;

    let name = caps.get(1).map(|m| m.as_str())?;
    if STRUCTURAL_KEYWORDS.contains(&name.to_uppercase().as_str()) {
        return None;
    }

    let sql_type = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let constraints = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

    // Label falls back to the raw column name, not a title-cased form; the
    // downstream renderer relies on this dialect's convention.
    let label = COMMENT_RE
        .captures(constraints)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| name.to_string());

    let mut field = Field::new(name, label, infer_sql_type(sql_type));

    if constraints.to_uppercase().contains("NOT NULL") {
        field.validators = Some(vec![Validator::data_required()]);
    }

    if let Some(default_value) = DEFAULT_RE
        .captures(constraints)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
    {
        if !NO_DEFAULT_SENTINELS.contains(&default_value.to_uppercase().as_str()) {
            field.default = Some(Value::String(default_value.to_string()));
        }
    }

    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::FieldType;

    const ORDERS_DDL: &str =
        "CREATE TABLE orders (id INT PRIMARY KEY, total DECIMAL(10,2) NOT NULL, note TEXT)";

    #[test]
    fn test_orders_table() {
        let (name, fields) = extract(ORDERS_DDL);
        assert_eq!(name.as_deref(), Some("orders"));

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "total", "note"]);

        assert_eq!(fields[0].field_type, FieldType::Integer);
        assert_eq!(fields[1].field_type, FieldType::Float);
        assert_eq!(fields[2].field_type, FieldType::TextArea);
    }

    #[test]
    fn test_not_null_after_parenthesized_type() {
        let (_, fields) = extract(ORDERS_DDL);
        let total = fields.iter().find(|f| f.name == "total").unwrap();
        assert_eq!(total.validators, Some(vec![Validator::data_required()]));

        let note = fields.iter().find(|f| f.name == "note").unwrap();
        assert!(note.validators.is_none());
    }

    #[test]
    fn test_table_name_variants() {
        let (name, _) = extract("CREATE TABLE IF NOT EXISTS `users` (id INT)");
        assert_eq!(name.as_deref(), Some("users"));

        let (name, _) = extract("create table Events (id INT)");
        assert_eq!(name.as_deref(), Some("events"));
    }

    #[test]
    fn test_constraint_clauses_skipped() {
        let ddl = "CREATE TABLE t (\n  id INT,\n  user_id INT,\n  PRIMARY KEY (id),\n  FOREIGN KEY (user_id) REFERENCES users(id),\n  UNIQUE (user_id),\n  CONSTRAINT ck CHECK (id > 0)\n)";
        let (_, fields) = extract(ddl);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "user_id"]);
    }

    #[test]
    fn test_comment_label_and_raw_fallback() {
        let ddl = "CREATE TABLE t (\n  user_name VARCHAR(50) COMMENT 'Display Name',\n  raw_col INT\n)";
        let (_, fields) = extract(ddl);
        assert_eq!(fields[0].label, "Display Name");
        // Raw name, not "Raw Col"
        assert_eq!(fields[1].label, "raw_col");
    }

    #[test]
    fn test_defaults() {
        let ddl = "CREATE TABLE t (\n  status VARCHAR(20) DEFAULT 'active',\n  count INT DEFAULT 0,\n  created DATETIME DEFAULT CURRENT_TIMESTAMP,\n  extra TEXT DEFAULT NULL\n)";
        let (_, fields) = extract(ddl);
        assert_eq!(fields[0].default, Some(Value::String("active".to_string())));
        assert_eq!(fields[1].default, Some(Value::String("0".to_string())));
        assert!(fields[2].default.is_none());
        assert!(fields[3].default.is_none());
    }

    #[test]
    fn test_backticked_columns() {
        let ddl = "CREATE TABLE `t` (`id` BIGINT NOT NULL, `payload` JSON)";
        let (_, fields) = extract(ddl);
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].field_type, FieldType::Integer);
        assert_eq!(fields[1].field_type, FieldType::Json);
    }

    #[test]
    fn test_no_create_table() {
        let (name, fields) = extract("SELECT * FROM users");
        assert!(name.is_none());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let (name, fields) = extract("CREATE TABLE empty ()");
        assert_eq!(name.as_deref(), Some("empty"));
        assert!(fields.is_empty());
    }
}
