//! Canonical schema documents
//!
//! This module defines the data structures for the normalized admin-model
//! document produced by the parser: a `Schema` holding an ordered list of
//! `Field` entries plus display configuration. Optional field members are
//! modeled as `Option` and omitted from serialized output when absent, so a
//! serialized document carries exactly the keys the form renderer expects.

use crate::parser::types::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default page size for list views
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sentinel model name used when nothing could be recognized
pub const DEFAULT_MODEL_NAME: &str = "imported_model";

/// A validator attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    /// Validator identifier understood by the form renderer
    pub name: String,
}

impl Validator {
    /// The required-value validator
    pub fn data_required() -> Self {
        Self {
            name: "data_required".to_string(),
        }
    }
}

/// Rendering keywords attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderKw {
    /// Field is rendered read-only (primary keys)
    pub readonly: bool,
}

/// One attribute entry within a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Identifier (letters, digits, underscore)
    pub name: String,
    /// Human-readable text
    #[serde(default)]
    pub label: String,
    /// Canonical field type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Present only when the source marks the field as required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validators: Option<Vec<Validator>>,
    /// Present only when the field is the detected primary key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_kw: Option<RenderKw>,
    /// Literal default value, absent when it equals a no-default sentinel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Field {
    /// Create a field with no optional members
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            validators: None,
            render_kw: None,
            default: None,
        }
    }

    /// Whether the field is rendered read-only
    pub fn is_readonly(&self) -> bool {
        self.render_kw.as_ref().map(|r| r.readonly).unwrap_or(false)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.field_type)?;
        if self.is_readonly() {
            write!(f, " [readonly]")?;
        }
        if self.validators.is_some() {
            write!(f, " [required]")?;
        }
        if let Some(ref default) = self.default {
            write!(f, " default={}", default)?;
        }
        Ok(())
    }
}

/// Containing-menu reference, carried through unchanged by the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parent {
    /// A bare menu name; the empty string means no parent
    Name(String),
    /// A full menu descriptor
    Menu {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl Default for Parent {
    fn default() -> Self {
        Parent::Name(String::new())
    }
}

/// One entry in a schema's action sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action identifier (list, create, edit, delete)
    pub name: String,
    /// Template used to render the action
    pub template: String,
}

impl Action {
    pub fn new(name: &str, template: &str) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
        }
    }
}

/// Derived display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseProps {
    /// Column names shown in list views (first six fields)
    #[serde(default)]
    pub column_list: Vec<String>,
    /// Column names shown in forms
    #[serde(default)]
    pub form_columns: Vec<String>,
    /// List page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for BaseProps {
    fn default() -> Self {
        Self {
            column_list: Vec::new(),
            form_columns: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The canonical normalized model-definition document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Stable identifier (table name, lower-cased class name, or sentinel)
    pub name: String,
    /// Human-readable display name
    #[serde(default)]
    pub label: String,
    /// Name of the identifying field
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Presentation mode tag
    #[serde(default = "default_entry")]
    pub entry: String,
    /// Containing menu, never interpreted by the parser
    #[serde(default)]
    pub parent: Parent,
    /// Ordered action sequence
    #[serde(default)]
    pub action: Vec<Action>,
    /// Ordered field entries (declaration order)
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Derived display configuration
    #[serde(default)]
    pub base_props: BaseProps,
    /// Custom actions, empty unless explicitly present in the input
    #[serde(default)]
    pub custom_actions: Vec<serde_json::Value>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

fn default_entry() -> String {
    "list".to_string()
}

impl Schema {
    /// Get a field by name
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// One-line summary for listings
    pub fn format_summary(&self) -> String {
        format!(
            "{} ({}) pk={} fields={}",
            self.name,
            self.label,
            self.primary_key,
            self.fields.len()
        )
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {} ({})", self.name, self.label)?;
        writeln!(f, "  Primary Key: {}", self.primary_key)?;
        writeln!(f, "  Fields:")?;
        for field in &self.fields {
            writeln!(f, "    {}", field)?;
        }
        Ok(())
    }
}

/// Title-case a name for display: underscores become spaces and each word is
/// capitalized ("bar_baz" -> "Bar Baz").
pub fn title_label(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append a field, overwriting in place when a field with the same name was
/// already declared. Last declaration wins; the original position is kept.
pub(crate) fn push_field(fields: &mut Vec<Field>, field: Field) {
    if let Some(existing) = fields.iter_mut().find(|f| f.name == field.name) {
        *existing = field;
    } else {
        fields.push(field);
    }
}
