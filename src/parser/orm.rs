//! ORM class extraction
//!
//! This module scans ORM-style source for model class definitions and their
//! column/field declarations, producing one intermediate model record per
//! class. A class body is the maximal run of lines up to the next column-0
//! `class` header. Mixin classes and the `Tool` utility class are skipped.

use crate::parser::schema::{push_field, title_label, Field, RenderKw, Validator};
use crate::parser::types::infer_orm_type;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// Class header with a parenthesized base list
static CLASS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^class\s+(\w+)\s*\(([^)]*)\)\s*:").unwrap());

/// Any class header, used only to delimit class bodies
static ANY_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^class\s").unwrap());

/// `__tablename__` directive overriding the model name
static TABLENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"__tablename__\s*=\s*['"](\w+)['"]"#).unwrap());

/// The three interchangeable field-declaration patterns. Argument capture is
/// greedy to the last closing paren on the line so trailing keyword arguments
/// like `nullable=False` stay inside the captured definition.
static FIELD_PATTERN_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?m)^\s*(\w+)\s*=\s*db\.Column\s*\((.*)\)").unwrap(),
        Regex::new(r"(?m)^\s*(\w+)\s*=\s*models\.\w+Field\s*\((.*)\)").unwrap(),
        Regex::new(r"(?m)^\s*(\w+)\s*=\s*Column\s*\((.*)\)").unwrap(),
    ]
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"comment=['"]([^'"]+)['"]"#).unwrap());

static NULLABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"nullable\s*=\s*(False|True)").unwrap());

static DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"default\s*=\s*['"]?([^'",()\s]+)['"]?"#).unwrap());

/// Attribute names that are never data fields
const RESERVED_ATTRIBUTES: &[&str] = &["metadata", "query"];

/// Class names that are never data models
const CLASS_DENYLIST: &[&str] = &["Tool"];

/// Default tokens that mean "no real default"
const NO_DEFAULT_SENTINELS: &[&str] = &["None", "null", "datetime.now", "datetime.utcnow"];

/// One extracted model class
#[derive(Debug)]
pub(crate) struct OrmModel {
    /// Class name as declared (used as the display label)
    pub class_name: String,
    /// Model name: `__tablename__` if present, else lower-cased class name
    pub model_name: String,
    /// Field records in declaration order
    pub fields: Vec<Field>,
}

impl OrmModel {
    /// Detected primary key: a readonly field literally named `id` or
    /// `{model_name}_id`, defaulting to `id`.
    pub fn primary_key(&self) -> String {
        let table_scoped = format!("{}_id", self.model_name);
        for field in &self.fields {
            if field.is_readonly() && (field.name == "id" || field.name == table_scoped) {
                return field.name.clone();
            }
        }
        "id".to_string()
    }
}

/// Extract all model classes from ORM source. Classes without fields and
/// skipped classes are not returned.
pub(crate) fn extract(content: &str) -> Vec<OrmModel> {
    let mut models = Vec::new();

    let headers: Vec<_> = CLASS_HEADER_RE.captures_iter(content).collect();
    for caps in &headers {
        let class_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let bases = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let header_end = caps.get(0).map(|m| m.end()).unwrap_or_default();

        if !bases.contains("db.Model") && !bases.contains("models.Model") {
            continue;
        }
        if class_name.contains("Mixin") || CLASS_DENYLIST.contains(&class_name) {
            debug!(class = class_name, "skipping non-model class");
            continue;
        }

        let body_end = ANY_CLASS_RE
            .find_at(content, header_end)
            .map(|m| m.start())
            .unwrap_or(content.len());
        let body = &content[header_end..body_end];

        let model_name = TABLENAME_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| class_name.to_lowercase());

        let fields = extract_fields(body);
        if fields.is_empty() {
            continue;
        }

        models.push(OrmModel {
            class_name: class_name.to_string(),
            model_name,
            fields,
        });
    }

    models
}

/// Scan one class body for field declarations.
fn extract_fields(body: &str) -> Vec<Field> {
    let mut fields = Vec::new();

    for pattern in FIELD_PATTERN_RES.iter() {
        for caps in pattern.captures_iter(body) {
            let field_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let field_def = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            if field_name.starts_with('_') || RESERVED_ATTRIBUTES.contains(&field_name) {
                continue;
            }

            push_field(&mut fields, build_field(field_name, field_def));
        }
    }

    fields
}

/// Build one field record from its name and raw argument text.
fn build_field(field_name: &str, field_def: &str) -> Field {
    let field_type = infer_orm_type(field_def);

    let label = COMMENT_RE
        .captures(field_def)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| title_label(field_name));

    let is_required = NULLABLE_RE
        .captures(field_def)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str() == "False")
        .unwrap_or(false);

    let is_primary =
        field_def.contains("primary_key=True") || field_def.contains("primary_key = True");

    let mut field = Field::new(field_name, label, field_type);

    // Primary keys are readonly and exempt from the required validator
    if is_required && !is_primary {
        field.validators = Some(vec![Validator::data_required()]);
    }
    if is_primary {
        field.render_kw = Some(RenderKw { readonly: true });
    }

    if let Some(default_value) = DEFAULT_RE
        .captures(field_def)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
    {
        if !NO_DEFAULT_SENTINELS.contains(&default_value) {
            field.default = Some(Value::String(default_value.to_string()));
        }
    }

    field
}
