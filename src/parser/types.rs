//! Canonical field types and the type vocabulary
//!
//! This module defines the fixed set of field types emitted by the parser and
//! the ordered vocabulary used to map source-dialect type tokens onto them.
//! The table order is significant: inference scans it front to back and the
//! first matching token wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical field type used by the downstream form renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    /// Integer-valued field
    Integer,
    /// Single-line text field (the default when nothing matches)
    #[default]
    String,
    /// Multi-line text field
    TextArea,
    /// Boolean flag
    Boolean,
    /// Date or timestamp
    DateTime,
    /// Floating point number
    Float,
    /// Structured JSON value
    Json,
    /// Binary / uploaded file
    File,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "Integer",
            FieldType::String => "String",
            FieldType::TextArea => "TextArea",
            FieldType::Boolean => "Boolean",
            FieldType::DateTime => "DateTime",
            FieldType::Float => "Float",
            FieldType::Json => "Json",
            FieldType::File => "File",
        };
        write!(f, "{}", name)
    }
}

/// Ordered type vocabulary: ORM tokens first, SQL tokens second.
///
/// Never mutated after initialization; both inference paths share it.
const TYPE_TOKENS: &[(&str, FieldType)] = &[
    // ORM declarations
    ("Integer", FieldType::Integer),
    ("String", FieldType::String),
    ("Text", FieldType::TextArea),
    ("Boolean", FieldType::Boolean),
    ("DateTime", FieldType::DateTime),
    ("Float", FieldType::Float),
    ("Date", FieldType::DateTime),
    ("Time", FieldType::String),
    ("JSON", FieldType::Json),
    ("BigInteger", FieldType::Integer),
    ("SmallInteger", FieldType::Integer),
    ("Numeric", FieldType::Float),
    ("Decimal", FieldType::Float),
    // SQL column types
    ("INT", FieldType::Integer),
    ("INTEGER", FieldType::Integer),
    ("BIGINT", FieldType::Integer),
    ("SMALLINT", FieldType::Integer),
    ("VARCHAR", FieldType::String),
    ("CHAR", FieldType::String),
    ("TEXT", FieldType::TextArea),
    ("BOOLEAN", FieldType::Boolean),
    ("BOOL", FieldType::Boolean),
    ("DATETIME", FieldType::DateTime),
    ("TIMESTAMP", FieldType::DateTime),
    ("DATE", FieldType::DateTime),
    ("FLOAT", FieldType::Float),
    ("DOUBLE", FieldType::Float),
    ("DECIMAL", FieldType::Float),
    ("BLOB", FieldType::File),
];

/// Infer a canonical type from the raw argument text of an ORM field
/// declaration.
///
/// Scans the vocabulary in table order looking for a substring match; a
/// `JSON`/`Json` substring anywhere in the declaration overrides the scan.
pub fn infer_orm_type(field_def: &str) -> FieldType {
    let mut field_type = FieldType::String;
    for (token, mapped) in TYPE_TOKENS {
        if field_def.contains(token) {
            field_type = *mapped;
            break;
        }
    }
    if field_def.contains("JSON") || field_def.contains("Json") {
        field_type = FieldType::Json;
    }
    field_type
}

/// Infer a canonical type from a SQL column type token.
///
/// The token is uppercased and tested as a prefix (not substring) against the
/// vocabulary, so `DECIMAL(10,2)` matches `DECIMAL` and `VARCHAR(255)`
/// matches `VARCHAR`. Unknown tokens default to `String`.
pub fn infer_sql_type(sql_type: &str) -> FieldType {
    let upper = sql_type.to_uppercase();
    for (token, mapped) in TYPE_TOKENS {
        if upper.starts_with(token) {
            return *mapped;
        }
    }
    FieldType::String
}

/// Map a JSON-Schema `type` keyword onto a canonical type.
pub fn infer_json_type(json_type: &str) -> FieldType {
    match json_type {
        "string" => FieldType::String,
        "integer" => FieldType::Integer,
        "number" => FieldType::Float,
        "boolean" => FieldType::Boolean,
        "object" => FieldType::Json,
        "array" => FieldType::Json,
        _ => FieldType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type_inference() {
        assert_eq!(infer_sql_type("INT"), FieldType::Integer);
        assert_eq!(infer_sql_type("int"), FieldType::Integer);
        assert_eq!(infer_sql_type("VARCHAR(255)"), FieldType::String);
        assert_eq!(infer_sql_type("DECIMAL(10,2)"), FieldType::Float);
        assert_eq!(infer_sql_type("TEXT"), FieldType::TextArea);
        assert_eq!(infer_sql_type("TIMESTAMP"), FieldType::DateTime);
        assert_eq!(infer_sql_type("BLOB"), FieldType::File);
        assert_eq!(infer_sql_type("GEOMETRY"), FieldType::String);
    }

    #[test]
    fn test_sql_prefix_not_substring() {
        // The SQL scan is prefix-only: a token buried mid-string must not match.
        assert_eq!(infer_sql_type("MYINT"), FieldType::String);
    }

    #[test]
    fn test_orm_type_inference() {
        assert_eq!(infer_orm_type("db.Integer, primary_key=True"), FieldType::Integer);
        assert_eq!(infer_orm_type("db.String(80)"), FieldType::String);
        assert_eq!(infer_orm_type("db.Text"), FieldType::TextArea);
        assert_eq!(infer_orm_type("db.DateTime, default=datetime.now"), FieldType::DateTime);
        assert_eq!(infer_orm_type("db.Numeric(10, 2)"), FieldType::Float);
        assert_eq!(infer_orm_type("something_unknown"), FieldType::String);
    }

    #[test]
    fn test_json_override_wins() {
        // JSON columns often carry other matching tokens in the declaration
        assert_eq!(infer_orm_type("db.JSON, nullable=True"), FieldType::Json);
        assert_eq!(infer_orm_type("sa.Text().with_variant(Json, 'x')"), FieldType::Json);
    }

    #[test]
    fn test_json_schema_type_map() {
        assert_eq!(infer_json_type("string"), FieldType::String);
        assert_eq!(infer_json_type("integer"), FieldType::Integer);
        assert_eq!(infer_json_type("number"), FieldType::Float);
        assert_eq!(infer_json_type("boolean"), FieldType::Boolean);
        assert_eq!(infer_json_type("object"), FieldType::Json);
        assert_eq!(infer_json_type("array"), FieldType::Json);
        assert_eq!(infer_json_type("null"), FieldType::String);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&FieldType::TextArea).unwrap(), "\"TextArea\"");
        assert_eq!(serde_json::to_string(&FieldType::DateTime).unwrap(), "\"DateTime\"");
        assert_eq!(serde_json::to_string(&FieldType::Json).unwrap(), "\"Json\"");
    }
}
