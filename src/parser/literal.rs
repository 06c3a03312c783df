//! Literal / JSON schema extraction
//!
//! This module handles inputs that are already structured data: strict JSON
//! documents, JSON Schema `properties` maps, and Python-style `schema = {...}`
//! assignments. The Python-style path strips trailing `#` comments with a
//! quote-aware scan, rewrites one legacy `copy_rule` idiom, and evaluates the
//! remaining text with the restricted data-literal evaluator. Decode failures
//! are recoverable: the extractor reports "no data" and the pipeline falls
//! through to the plain-list dialect. A mapping that carries `name` and
//! `fields` but does not match the document shape is reported as invalid and
//! ends at the empty sentinel instead.

use crate::parser::eval;
use crate::parser::schema::{push_field, Field, Schema};
use crate::parser::types::infer_json_type;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `schema = { ... }` assignment region, greedy to the last closing brace
static SCHEMA_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)schema\s*=\s*(\{.*\})").unwrap());

/// The legacy `"copy_rule": {"开启"}` idiom means "use the default behavior"
/// and must not survive into the parsed structure. The `{}` and `"关闭"`
/// sibling idioms are real values and pass through untouched.
static COPY_RULE_DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""copy_rule":\s*\{\s*["']开启["']\s*\}\s*,?\s*\n?"#).unwrap()
});

/// Result of the literal extraction step
#[derive(Debug)]
pub(crate) enum LiteralOutcome {
    /// The input was a complete schema document; returned unchanged
    Complete(Box<Schema>),
    /// Field records synthesized from a JSON-Schema `properties` map
    Fields {
        name: Option<String>,
        fields: Vec<Field>,
    },
    /// A schema-shaped mapping that did not match the document shape
    Invalid,
    /// Nothing usable was decoded
    NoData,
}

/// Extract schema data from literal/JSON text.
///
/// Strict JSON decoding is attempted first; on failure the text is treated as
/// a Python-style schema assignment and evaluated as a data literal.
pub(crate) fn extract(content: &str) -> LiteralOutcome {
    let data = match serde_json::from_str::<Value>(content) {
        Ok(value) => Some(value),
        Err(_) => evaluate_schema_literal(content),
    };
    match data {
        Some(value) => interpret(value),
        None => LiteralOutcome::NoData,
    }
}

/// Evaluate a Python-style schema assignment as a data literal.
fn evaluate_schema_literal(content: &str) -> Option<Value> {
    let region = SCHEMA_ASSIGN_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(content);

    let cleaned = strip_line_comments(region);
    let cleaned = COPY_RULE_DEFAULT_RE.replace_all(&cleaned, "");

    match eval::evaluate(&cleaned) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, "literal evaluation failed, treating input as no data");
            None
        }
    }
}

/// Strip trailing `#` line comments, leaving `#` characters inside quoted
/// strings untouched.
///
/// Single pass per line with quote tracking: an unescaped quote character
/// toggles the inside-string state and `#` only starts a comment outside of
/// strings. The operation is idempotent.
pub(crate) fn strip_line_comments(text: &str) -> String {
    text.lines()
        .map(strip_one_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_one_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut in_string = false;
    let mut quote_char = '"';

    for (i, &c) in chars.iter().enumerate() {
        if c == '"' || c == '\'' {
            if !in_string {
                in_string = true;
                quote_char = c;
            } else if c == quote_char && (i == 0 || chars[i - 1] != '\\') {
                in_string = false;
            }
            out.push(c);
        } else if c == '#' && !in_string {
            break;
        } else {
            out.push(c);
        }
    }
    out.trim_end().to_string()
}

/// Interpret decoded data as either a complete schema or a JSON-Schema
/// `properties` map.
fn interpret(data: Value) -> LiteralOutcome {
    let Value::Object(map) = data else {
        return LiteralOutcome::NoData;
    };

    if map.contains_key("name") && map.contains_key("fields") {
        // Complete schema document: identity passthrough
        return match serde_json::from_value::<Schema>(Value::Object(map)) {
            Ok(schema) => LiteralOutcome::Complete(Box::new(schema)),
            Err(err) => {
                warn!(error = %err, "schema document did not match the expected shape");
                LiteralOutcome::Invalid
            }
        };
    }

    if let Some(Value::Object(properties)) = map.get("properties") {
        let name = map
            .get("title")
            .and_then(Value::as_str)
            .map(|title| title.to_lowercase());
        let mut fields = Vec::new();
        for (prop_name, prop_def) in properties {
            if prop_name.is_empty() {
                continue;
            }
            let json_type = prop_def
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("string");
            let label = prop_def
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(prop_name.as_str());
            push_field(
                &mut fields,
                Field::new(prop_name.clone(), label, infer_json_type(json_type)),
            );
        }
        debug!(count = fields.len(), "synthesized fields from json-schema properties");
        return LiteralOutcome::Fields { name, fields };
    }

    LiteralOutcome::NoData
}
