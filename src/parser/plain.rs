//! Plain field-list fallback
//!
//! Last-resort extractor, reached only when the selected non-ORM path
//! produced no fields. Each non-blank, non-comment line is a candidate field
//! name; symbols are stripped and lines that reduce to nothing are dropped.

use crate::parser::schema::{push_field, title_label, Field};
use crate::parser::types::FieldType;
use regex::Regex;
use std::sync::LazyLock;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]").unwrap());

/// Produce one `String`-typed field per usable line.
pub(crate) fn extract(content: &str) -> Vec<Field> {
    let mut fields = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let name = NON_WORD_RE.replace_all(line, "").into_owned();
        if name.is_empty() {
            continue;
        }
        let label = title_label(&name);
        push_field(&mut fields, Field::new(name, label, FieldType::String));
    }

    fields
}
