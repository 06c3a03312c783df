//! Model-definition parser
//!
//! This module normalizes heterogeneous textual descriptions of a data model
//! into canonical schema documents. The pipeline is one-directional and
//! synchronous: dialect detection picks an extractor, the extractor yields
//! intermediate field records, and assembly builds the final document. The
//! entry point never fails on malformed input; the worst case is the
//! well-formed empty sentinel schema.

pub mod detect;
pub mod schema;
pub mod types;

mod assemble;
mod eval;
mod literal;
mod orm;
mod plain;
mod sql;

pub use detect::Dialect;
pub use schema::{
    title_label, Action, BaseProps, Field, Parent, RenderKw, Schema, Validator,
    DEFAULT_MODEL_NAME, DEFAULT_PAGE_SIZE,
};
pub use types::{infer_json_type, infer_orm_type, infer_sql_type, FieldType};

use literal::LiteralOutcome;
use serde::Serialize;
use tracing::debug;

/// Parser output: one schema, or several when a single ORM input declares
/// more than one model class. Serializes as either an object or an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    /// Exactly one model was recognized (or the empty sentinel)
    Single(Schema),
    /// A multi-class ORM input produced several models
    Multiple(Vec<Schema>),
}

impl ParseOutcome {
    /// Flatten into a list of schemas
    pub fn into_schemas(self) -> Vec<Schema> {
        match self {
            ParseOutcome::Single(schema) => vec![schema],
            ParseOutcome::Multiple(schemas) => schemas,
        }
    }

    /// The single schema, if this outcome holds exactly one
    pub fn as_single(&self) -> Option<&Schema> {
        match self {
            ParseOutcome::Single(schema) => Some(schema),
            ParseOutcome::Multiple(_) => None,
        }
    }
}

/// Parse a model definition into canonical schema documents.
///
/// `dialect` forces a specific input dialect; `None` requests auto-detection.
/// Malformed or unrecognized input falls through the dialect cascade
/// (ORM, SQL DDL, literal/JSON, plain list) and ends at the empty sentinel
/// schema rather than an error.
pub fn parse_model_definition(content: &str, dialect: Option<Dialect>) -> ParseOutcome {
    let forced = dialect.is_some();
    let selected = dialect.unwrap_or_else(|| Dialect::detect(content));
    debug!(dialect = %selected, forced, "parsing model definition");

    match selected {
        Dialect::OrmClass => {
            let mut schemas: Vec<Schema> = orm::extract(content)
                .into_iter()
                .map(assemble::assemble_orm)
                .collect();
            match schemas.len() {
                0 if forced => ParseOutcome::Single(assemble::sentinel()),
                // An auto-detected ORM miss falls through to the remaining
                // dialects; the plain-list fallback stays out of reach of a
                // forced ORM parse.
                0 => parse_non_orm(content, Dialect::detect_non_orm(content)),
                1 => ParseOutcome::Single(schemas.remove(0)),
                _ => ParseOutcome::Multiple(schemas),
            }
        }
        other => parse_non_orm(content, other),
    }
}

/// Run one of the non-ORM extraction paths, with the plain-list fallback and
/// the empty sentinel closing the cascade.
fn parse_non_orm(content: &str, dialect: Dialect) -> ParseOutcome {
    let (name, mut fields) = match dialect {
        Dialect::SqlDdl => sql::extract(content),
        Dialect::LiteralOrJson => match literal::extract(content) {
            LiteralOutcome::Complete(schema) => return ParseOutcome::Single(*schema),
            LiteralOutcome::Fields { name, fields } => (name, fields),
            // A recognizable schema document with the wrong shape must not
            // degrade into line-by-line field synthesis over the raw JSON
            LiteralOutcome::Invalid => return ParseOutcome::Single(assemble::sentinel()),
            LiteralOutcome::NoData => (None, Vec::new()),
        },
        Dialect::PlainList => (None, plain::extract(content)),
        Dialect::OrmClass => unreachable!("ORM is handled by parse_model_definition"),
    };

    if fields.is_empty() && dialect != Dialect::PlainList {
        fields = plain::extract(content);
    }

    if fields.is_empty() {
        return ParseOutcome::Single(assemble::sentinel());
    }

    let name = name.unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
    ParseOutcome::Single(assemble::assemble(&name, fields))
}
