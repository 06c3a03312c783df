//! Schema assembly
//!
//! This module turns intermediate field records into complete schema
//! documents: the fixed default action set, the derived column subsets and
//! primary-key wiring. Two assembly paths exist on purpose: the ORM path
//! excludes readonly fields from `form_columns`, while the generic path
//! excludes the literal name `id`.

use crate::parser::orm::OrmModel;
use crate::parser::schema::{
    title_label, Action, BaseProps, Field, Parent, Schema, DEFAULT_MODEL_NAME,
};

/// Number of fields shown in list views by default
const COLUMN_LIST_LIMIT: usize = 6;

/// The fixed default action sequence
pub(crate) fn default_actions() -> Vec<Action> {
    vec![
        Action::new("list", "tablebase"),
        Action::new("create", "formbase"),
        Action::new("edit", "editbase"),
        Action::new("delete", "button"),
    ]
}

fn column_list(fields: &[Field]) -> Vec<String> {
    fields
        .iter()
        .take(COLUMN_LIST_LIMIT)
        .map(|f| f.name.clone())
        .collect()
}

/// Assemble a schema from the generic (SQL / literal / plain-list) paths.
///
/// `form_columns` excludes the field literally named `id`, regardless of any
/// readonly flag.
pub(crate) fn assemble(name: &str, fields: Vec<Field>) -> Schema {
    let form_columns = fields
        .iter()
        .filter(|f| f.name != "id")
        .map(|f| f.name.clone())
        .collect();

    Schema {
        name: name.to_string(),
        label: title_label(name),
        primary_key: "id".to_string(),
        entry: "list".to_string(),
        parent: Parent::default(),
        action: default_actions(),
        base_props: BaseProps {
            column_list: column_list(&fields),
            form_columns,
            ..BaseProps::default()
        },
        fields,
        custom_actions: Vec::new(),
    }
}

/// Assemble a schema from one extracted ORM model.
///
/// The label is the class name as declared and `form_columns` excludes
/// readonly fields rather than the literal `id`.
pub(crate) fn assemble_orm(model: OrmModel) -> Schema {
    let primary_key = model.primary_key();
    let form_columns = model
        .fields
        .iter()
        .filter(|f| !f.is_readonly())
        .map(|f| f.name.clone())
        .collect();

    Schema {
        name: model.model_name,
        label: model.class_name,
        primary_key,
        entry: "list".to_string(),
        parent: Parent::default(),
        action: default_actions(),
        base_props: BaseProps {
            column_list: column_list(&model.fields),
            form_columns,
            ..BaseProps::default()
        },
        fields: model.fields,
        custom_actions: Vec::new(),
    }
}

/// Well-formed empty schema returned when the whole pipeline produced
/// nothing.
pub(crate) fn sentinel() -> Schema {
    Schema {
        name: DEFAULT_MODEL_NAME.to_string(),
        label: title_label(DEFAULT_MODEL_NAME),
        primary_key: "id".to_string(),
        entry: "list".to_string(),
        parent: Parent::default(),
        action: default_actions(),
        fields: Vec::new(),
        base_props: BaseProps::default(),
        custom_actions: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::RenderKw;
    use crate::parser::types::FieldType;

    fn field(name: &str) -> Field {
        Field::new(name, title_label(name), FieldType::String)
    }

    #[test]
    fn test_generic_assembly() {
        let fields = vec![field("id"), field("title"), field("body")];
        let schema = assemble("posts", fields);

        assert_eq!(schema.name, "posts");
        assert_eq!(schema.label, "Posts");
        assert_eq!(schema.primary_key, "id");
        assert_eq!(schema.base_props.column_list, vec!["id", "title", "body"]);
        // Literal-name exclusion, even without a readonly flag
        assert_eq!(schema.base_props.form_columns, vec!["title", "body"]);
        assert_eq!(schema.base_props.page_size, 20);
    }

    #[test]
    fn test_column_list_caps_at_six() {
        let fields: Vec<Field> = (0..9).map(|i| field(&format!("f{}", i))).collect();
        let schema = assemble("wide", fields);
        assert_eq!(schema.base_props.column_list.len(), 6);
        assert_eq!(schema.base_props.form_columns.len(), 9);
    }

    #[test]
    fn test_default_actions() {
        let actions = default_actions();
        let pairs: Vec<_> = actions
            .iter()
            .map(|a| (a.name.as_str(), a.template.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("list", "tablebase"),
                ("create", "formbase"),
                ("edit", "editbase"),
                ("delete", "button"),
            ]
        );
    }

    #[test]
    fn test_orm_assembly_excludes_readonly() {
        let mut pk = Field::new("id", "Id", FieldType::Integer);
        pk.render_kw = Some(RenderKw { readonly: true });
        let model = OrmModel {
            class_name: "User".to_string(),
            model_name: "users".to_string(),
            fields: vec![pk, field("email")],
        };
        let schema = assemble_orm(model);
        assert_eq!(schema.label, "User");
        assert_eq!(schema.primary_key, "id");
        assert_eq!(schema.base_props.form_columns, vec!["email"]);
        assert_eq!(schema.base_props.column_list, vec!["id", "email"]);
    }

    #[test]
    fn test_sentinel_is_well_formed() {
        let schema = sentinel();
        assert_eq!(schema.name, "imported_model");
        assert_eq!(schema.label, "Imported Model");
        assert!(schema.fields.is_empty());
        assert!(schema.base_props.column_list.is_empty());
        assert!(schema.base_props.form_columns.is_empty());
        assert_eq!(schema.action.len(), 4);
    }
}
