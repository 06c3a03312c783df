//! Input dialect detection
//!
//! This module classifies raw model-definition text as one of the recognized
//! input dialects. Detection is first-match-wins in a fixed priority order;
//! callers may bypass it entirely by forcing a dialect.

use crate::error::ModelForgeError;
use std::fmt;
use std::str::FromStr;

/// Recognized input text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// ORM class source (SQLAlchemy / Django style)
    OrmClass,
    /// SQL `CREATE TABLE` statement
    SqlDdl,
    /// JSON document, JSON Schema, or a literal schema assignment
    LiteralOrJson,
    /// Bare list of field names, one per line
    PlainList,
}

impl Dialect {
    /// Classify raw content.
    ///
    /// Priority: ORM class markers, then `CREATE TABLE`, then literal/JSON
    /// shape, falling back to the plain field list.
    pub fn detect(content: &str) -> Dialect {
        if looks_like_orm(content) {
            Dialect::OrmClass
        } else if looks_like_sql(content) {
            Dialect::SqlDdl
        } else if looks_like_literal(content) {
            Dialect::LiteralOrJson
        } else {
            Dialect::PlainList
        }
    }

    /// Classify content that already failed the ORM path.
    ///
    /// Used when an auto-detected ORM input yields no model classes and the
    /// pipeline falls through to the remaining dialects.
    pub(crate) fn detect_non_orm(content: &str) -> Dialect {
        if looks_like_sql(content) {
            Dialect::SqlDdl
        } else if looks_like_literal(content) {
            Dialect::LiteralOrJson
        } else {
            Dialect::PlainList
        }
    }

    /// Get the name of this dialect
    pub fn name(&self) -> &str {
        match self {
            Dialect::OrmClass => "python",
            Dialect::SqlDdl => "sql",
            Dialect::LiteralOrJson => "json",
            Dialect::PlainList => "list",
        }
    }
}

/// ORM model marker: a `class` token together with one of the two known
/// base-class markers.
fn looks_like_orm(content: &str) -> bool {
    content.contains("class")
        && (content.contains("db.Model") || content.contains("models.Model"))
}

fn looks_like_sql(content: &str) -> bool {
    content.to_uppercase().contains("CREATE TABLE")
}

/// Literal/JSON shape: the stripped text starts with `{`, or the text carries
/// a `schema = { ... }` assignment.
fn looks_like_literal(content: &str) -> bool {
    content.trim_start().starts_with('{')
        || (content.contains("schema") && content.contains('=') && content.contains('{'))
}

impl FromStr for Dialect {
    type Err = ModelForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "orm" => Ok(Dialect::OrmClass),
            "sql" | "ddl" => Ok(Dialect::SqlDdl),
            "json" | "literal" => Ok(Dialect::LiteralOrJson),
            "list" | "plain" => Ok(Dialect::PlainList),
            _ => Err(ModelForgeError::InvalidInput(format!(
                "Unknown dialect: {}. Supported: python, sql, json, list",
                s
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_orm() {
        let content = "class User(db.Model):\n    id = db.Column(db.Integer)";
        assert_eq!(Dialect::detect(content), Dialect::OrmClass);

        let django = "class User(models.Model):\n    name = models.CharField()";
        assert_eq!(Dialect::detect(django), Dialect::OrmClass);
    }

    #[test]
    fn test_detect_sql() {
        assert_eq!(
            Dialect::detect("create table users (id int)"),
            Dialect::SqlDdl
        );
        assert_eq!(
            Dialect::detect("CREATE TABLE users (id INT)"),
            Dialect::SqlDdl
        );
    }

    #[test]
    fn test_detect_literal() {
        assert_eq!(
            Dialect::detect("  {\"name\": \"x\"}"),
            Dialect::LiteralOrJson
        );
        assert_eq!(
            Dialect::detect("schema = {\n  'name': 'x'\n}"),
            Dialect::LiteralOrJson
        );
    }

    #[test]
    fn test_detect_priority() {
        // An ORM file that also mentions CREATE TABLE in a docstring stays ORM
        let content = "class T(db.Model):\n    '''CREATE TABLE t'''\n    x = db.Column(db.Integer)";
        assert_eq!(Dialect::detect(content), Dialect::OrmClass);
    }

    #[test]
    fn test_detect_plain_list() {
        assert_eq!(Dialect::detect("foo\nbar\n"), Dialect::PlainList);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Dialect::from_str("python").unwrap(), Dialect::OrmClass);
        assert_eq!(Dialect::from_str("SQL").unwrap(), Dialect::SqlDdl);
        assert_eq!(Dialect::from_str("json").unwrap(), Dialect::LiteralOrJson);
        assert!(Dialect::from_str("yaml").is_err());
    }
}
