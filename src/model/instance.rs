//! Model instances and the recursive build/flatten routines.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::{FieldDef, FieldKind, ModelSchema};
use super::tree::Tree;

/// Errors raised when a tree does not conform to a schema.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A related-model field received something other than an object or model.
    #[error("Expected an object for '{path}' ({model}), found {found}")]
    ExpectedObject {
        /// Dotted path of the offending value.
        path: String,
        /// Name of the schema being built.
        model: &'static str,
        /// Kind of the value that was found.
        found: &'static str,
    },

    /// An array-of-models field received something that is not a collection.
    #[error("Expected a list for '{path}', found {found}")]
    ExpectedCollection {
        /// Dotted path of the offending value.
        path: String,
        /// Kind of the value that was found.
        found: &'static str,
    },

    /// A pre-built model of another type was supplied.
    #[error("Expected a {expected} model for '{path}', found a {found} model")]
    SchemaMismatch {
        /// Dotted path of the offending value.
        path: String,
        /// Expected schema name.
        expected: &'static str,
        /// Supplied schema name.
        found: &'static str,
    },

    /// The field is not declared in the schema.
    #[error("Field '{field}' is not declared on {model}")]
    UnknownField {
        /// Name of the schema.
        model: &'static str,
        /// The undeclared field name.
        field: String,
    },

    /// Conversion between a model and a typed value failed.
    #[error("Failed to convert model: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The current value of a declared field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Raw JSON value of a scalar field.
    Scalar(Value),
    /// A single related model.
    Model(Box<Model>),
    /// A dense sequence of related models.
    Models(Vec<Model>),
}

/// An instance of a [`ModelSchema`].
///
/// Fields that were never assigned are *empty*: they are omitted from
/// outgoing request bodies and flatten to `null` otherwise.
///
/// # Example
///
/// ```rust
/// use bol_retailer::model::{FieldDef, Model, ModelSchema};
/// use serde_json::json;
///
/// static LINK: ModelSchema = ModelSchema::new(
///     "Link",
///     &[FieldDef::scalar("rel"), FieldDef::scalar("href")],
/// );
///
/// let link = Model::from_tree(&LINK, json!({"rel": "self", "unknown": 1}));
/// assert_eq!(link.scalar("rel"), Some(&json!("self")));
/// assert_eq!(link.to_tree(true), json!({"rel": "self"}));
/// assert_eq!(link.to_tree(false), json!({"rel": "self", "href": null}));
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    schema: &'static ModelSchema,
    values: HashMap<&'static str, FieldValue>,
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_as(other.schema) && self.values == other.values
    }
}

impl Model {
    /// Creates an instance with every field empty.
    #[must_use]
    pub fn new(schema: &'static ModelSchema) -> Self {
        Self {
            schema,
            values: HashMap::new(),
        }
    }

    /// Builds an instance from a tree.
    ///
    /// Declared keys are converted according to their [`FieldKind`]; unknown
    /// keys are ignored and declared keys missing from the tree (or `null`)
    /// stay empty. A pre-built instance of the same schema is returned as-is.
    ///
    /// # Panics
    ///
    /// The tree must conform to the schema: related-model fields must hold
    /// objects or pre-built models of the related type, array fields must hold
    /// collections. Use [`try_from_tree`](Self::try_from_tree) for input that
    /// is not under the caller's control.
    #[must_use]
    pub fn from_tree(schema: &'static ModelSchema, tree: impl Into<Tree>) -> Self {
        match Self::try_from_tree(schema, tree) {
            Ok(model) => model,
            Err(err) => panic!("tree does not conform to the {} schema: {err}", schema.name()),
        }
    }

    /// Builds an instance from a tree, reporting non-conforming input.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] describing the first non-conforming value.
    pub fn try_from_tree(
        schema: &'static ModelSchema,
        tree: impl Into<Tree>,
    ) -> Result<Self, ModelError> {
        build_single(schema, tree.into(), schema.name())
    }

    /// Serializes a typed value and builds an instance from the result.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serde`] if `value` cannot be serialized, or any
    /// conformance error of [`try_from_tree`](Self::try_from_tree).
    pub fn from_typed<T: Serialize>(
        schema: &'static ModelSchema,
        value: &T,
    ) -> Result<Self, ModelError> {
        Self::try_from_tree(schema, serde_json::to_value(value)?)
    }

    /// Flattens the instance and deserializes it into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serde`] if the flattened tree does not match `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, ModelError> {
        Ok(serde_json::from_value(self.to_tree(false))?)
    }

    /// Fills declared fields from a tree, leaving fields absent from it untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] describing the first non-conforming value.
    /// Fields converted before the error remain assigned.
    pub fn try_fill(&mut self, tree: impl Into<Tree>) -> Result<(), ModelError> {
        let path = self.schema.name();
        self.fill_at(tree.into(), path)
    }

    /// Returns the schema of this instance.
    #[must_use]
    pub const fn schema(&self) -> &'static ModelSchema {
        self.schema
    }

    /// Returns the value of a field, or `None` if it is empty or undeclared.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Returns the raw value of a scalar field.
    #[must_use]
    pub fn scalar(&self, field: &str) -> Option<&Value> {
        match self.values.get(field) {
            Some(FieldValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the string value of a scalar field.
    #[must_use]
    pub fn str(&self, field: &str) -> Option<&str> {
        self.scalar(field).and_then(Value::as_str)
    }

    /// Returns the related model held by a single-related field.
    #[must_use]
    pub fn model(&self, field: &str) -> Option<&Self> {
        match self.values.get(field) {
            Some(FieldValue::Model(model)) => Some(model),
            _ => None,
        }
    }

    /// Returns the related models held by an array-related field.
    #[must_use]
    pub fn models(&self, field: &str) -> Option<&[Self]> {
        match self.values.get(field) {
            Some(FieldValue::Models(models)) => Some(models),
            _ => None,
        }
    }

    /// Returns `true` if the field has no value.
    #[must_use]
    pub fn is_empty_field(&self, field: &str) -> bool {
        !self.values.contains_key(field)
    }

    /// Assigns a declared field, converting the tree according to its kind.
    ///
    /// Assigning `null` empties the field.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownField`] if the field is not declared, or a
    /// conformance error if the value does not match the field kind.
    pub fn set(&mut self, field: &str, value: impl Into<Tree>) -> Result<(), ModelError> {
        let def = self
            .schema
            .field(field)
            .ok_or_else(|| ModelError::UnknownField {
                model: self.schema.name(),
                field: field.to_string(),
            })?;

        let value = value.into();
        if value.is_null() {
            self.values.remove(def.name());
            return Ok(());
        }

        let path = format!("{}.{}", self.schema.name(), def.name());
        let converted = convert_field(def, value, &path)?;
        self.values.insert(def.name(), converted);
        Ok(())
    }

    /// Empties a field.
    pub fn unset(&mut self, field: &str) {
        self.values.remove(field);
    }

    /// Flattens the instance into JSON, recursively.
    ///
    /// With `omit_nulls` set, empty fields are left out instead of being
    /// emitted as `null`; for a partial update, an absent key and a `null`
    /// key mean different things to the server.
    #[must_use]
    pub fn to_tree(&self, omit_nulls: bool) -> Value {
        let mut data = Map::new();

        for def in self.schema.fields() {
            let value = match self.values.get(def.name()) {
                None if omit_nulls => continue,
                None => Value::Null,
                Some(FieldValue::Scalar(value)) => value.clone(),
                Some(FieldValue::Model(model)) => model.to_tree(omit_nulls),
                Some(FieldValue::Models(models)) => Value::Array(
                    models
                        .iter()
                        .map(|model| model.to_tree(omit_nulls))
                        .collect(),
                ),
            };
            data.insert(def.name().to_string(), value);
        }

        Value::Object(data)
    }

    fn fill_at(&mut self, tree: Tree, path: &str) -> Result<(), ModelError> {
        let found = tree.kind_name();
        let mut entries = tree.into_entries().ok_or_else(|| ModelError::ExpectedObject {
            path: path.to_string(),
            model: self.schema.name(),
            found,
        })?;

        for def in self.schema.fields() {
            let Some(index) = entries.iter().position(|(key, _)| key == def.name()) else {
                continue;
            };
            let (_, value) = entries.swap_remove(index);
            if value.is_null() {
                continue;
            }

            let field_path = format!("{path}.{}", def.name());
            let converted = convert_field(def, value, &field_path)?;
            self.values.insert(def.name(), converted);
        }

        Ok(())
    }
}

fn convert_field(def: &FieldDef, value: Tree, path: &str) -> Result<FieldValue, ModelError> {
    match def.kind() {
        FieldKind::Scalar => Ok(FieldValue::Scalar(value.into_value())),
        FieldKind::Single(related) => {
            build_single(related(), value, path).map(|model| FieldValue::Model(Box::new(model)))
        }
        FieldKind::ArrayOf(related) => {
            let found = value.kind_name();
            let elements = value
                .into_elements()
                .ok_or_else(|| ModelError::ExpectedCollection {
                    path: path.to_string(),
                    found,
                })?;

            elements
                .into_iter()
                .enumerate()
                .map(|(index, element)| {
                    build_single(related(), element, &format!("{path}[{index}]"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Models)
        }
    }
}

fn build_single(
    schema: &'static ModelSchema,
    tree: Tree,
    path: &str,
) -> Result<Model, ModelError> {
    if let Tree::Model(model) = tree {
        if model.schema.same_as(schema) {
            return Ok(model);
        }
        return Err(ModelError::SchemaMismatch {
            path: path.to_string(),
            expected: schema.name(),
            found: model.schema.name(),
        });
    }

    let mut model = Model::new(schema);
    model.fill_at(tree, path)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn item() -> &'static ModelSchema {
        &ITEM
    }

    fn category() -> &'static ModelSchema {
        &CATEGORY
    }

    static ITEM: ModelSchema = ModelSchema::new(
        "Item",
        &[FieldDef::scalar("foo"), FieldDef::scalar("tags")],
    );

    static CONTAINER: ModelSchema = ModelSchema::new(
        "Container",
        &[
            FieldDef::scalar("name"),
            FieldDef::model("relation", item),
            FieldDef::array("relations", item),
        ],
    );

    static CATEGORY: ModelSchema = ModelSchema::new(
        "Category",
        &[
            FieldDef::scalar("categoryName"),
            FieldDef::model("parent", category),
            FieldDef::array("subcategories", category),
        ],
    );

    #[test]
    fn test_scalar_is_set_from_tree() {
        let model = Model::from_tree(&ITEM, json!({"foo": "bar"}));
        assert_eq!(model.str("foo"), Some("bar"));
    }

    #[test]
    fn test_scalar_copies_raw_structured_values() {
        let model = Model::from_tree(&ITEM, json!({"tags": ["a", {"b": 1}]}));
        assert_eq!(model.scalar("tags"), Some(&json!(["a", {"b": 1}])));
    }

    #[test]
    fn test_undeclared_keys_are_ignored() {
        let model = Model::from_tree(&ITEM, json!({"undefinedScalar": "bar"}));
        assert!(model.get("undefinedScalar").is_none());
        assert_eq!(model.to_tree(true), json!({}));
    }

    #[test]
    fn test_absent_fields_are_left_untouched_when_filling() {
        let mut model = Model::from_tree(&ITEM, json!({"foo": "kept"}));
        model.try_fill(json!({"tags": [1], "other": true})).unwrap();

        assert_eq!(model.str("foo"), Some("kept"));
        assert_eq!(model.scalar("tags"), Some(&json!([1])));
    }

    #[test]
    fn test_null_values_leave_fields_empty() {
        let mut model = Model::from_tree(&ITEM, json!({"foo": "kept"}));
        model.try_fill(json!({"foo": null})).unwrap();
        assert_eq!(model.str("foo"), Some("kept"));
    }

    #[test]
    fn test_related_model_is_created_from_tree() {
        let model = Model::from_tree(&CONTAINER, json!({"relation": {"foo": "bar"}}));
        let relation = model.model("relation").unwrap();

        assert!(relation.schema().same_as(&ITEM));
        assert_eq!(relation.str("foo"), Some("bar"));
    }

    #[test]
    fn test_related_model_array_is_created_from_tree() {
        let model = Model::from_tree(
            &CONTAINER,
            json!({"relations": [{"foo": "bar"}, {"foo": "bar2"}]}),
        );
        let relations = model.models("relations").unwrap();

        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].str("foo"), Some("bar"));
        assert_eq!(relations[1].str("foo"), Some("bar2"));
    }

    #[test]
    fn test_keyed_related_model_array_becomes_dense_sequence() {
        let model = Model::from_tree(
            &CONTAINER,
            json!({"relations": {"a": {"foo": "first"}, "2": {"foo": "second"}}}),
        );
        let relations = model.models("relations").unwrap();

        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].str("foo"), Some("first"));
        assert_eq!(relations[1].str("foo"), Some("second"));
        assert_eq!(
            model.to_tree(true),
            json!({"relations": [{"foo": "first"}, {"foo": "second"}]})
        );
    }

    #[test]
    fn test_prebuilt_models_pass_through_unchanged() {
        let item = Model::from_tree(&ITEM, json!({"foo": "prebuilt"}));
        let tree = Tree::object([
            ("relation", Tree::from(item.clone())),
            ("relations", Tree::from(vec![item.clone(), item.clone()])),
        ]);

        let model = Model::from_tree(&CONTAINER, tree);
        assert_eq!(model.model("relation"), Some(&item));
        assert_eq!(
            model.models("relations").unwrap(),
            &[item.clone(), item.clone()]
        );

        let again = Model::from_tree(&ITEM, item.clone());
        assert_eq!(again, item);
    }

    #[test]
    fn test_prebuilt_model_of_other_schema_is_rejected() {
        let container = Model::new(&CONTAINER);
        let tree = Tree::object([("relation", Tree::from(container))]);

        let err = Model::try_from_tree(&CONTAINER, tree).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch {
                expected: "Item",
                found: "Container",
                ..
            }
        ));
    }

    #[test]
    fn test_non_conforming_related_value_is_reported() {
        let err = Model::try_from_tree(&CONTAINER, json!({"relation": "oops"})).unwrap_err();
        match err {
            ModelError::ExpectedObject { path, found, .. } => {
                assert_eq!(path, "Container.relation");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = Model::try_from_tree(&CONTAINER, json!({"relations": 5})).unwrap_err();
        assert!(matches!(err, ModelError::ExpectedCollection { found: "number", .. }));

        let err =
            Model::try_from_tree(&CONTAINER, json!({"relations": [{"foo": 1}, 2]})).unwrap_err();
        assert!(err.to_string().contains("Container.relations[1]"));
    }

    #[test]
    #[should_panic(expected = "does not conform")]
    fn test_from_tree_panics_on_contract_violation() {
        let _ = Model::from_tree(&CONTAINER, json!({"relation": 42}));
    }

    #[test]
    fn test_null_field_is_omitted_or_present_depending_on_flag() {
        let model = Model::new(&ITEM);
        assert_eq!(model.to_tree(true), json!({}));
        assert_eq!(model.to_tree(false), json!({"foo": null, "tags": null}));
    }

    #[test]
    fn test_nested_flatten_respects_omit_nulls() {
        let model = Model::from_tree(&CONTAINER, json!({"relation": {"foo": "bar"}}));
        assert_eq!(model.to_tree(true), json!({"relation": {"foo": "bar"}}));
        assert_eq!(
            model.to_tree(false),
            json!({
                "name": null,
                "relation": {"foo": "bar", "tags": null},
                "relations": null
            })
        );
    }

    #[test]
    fn test_self_referential_graph_round_trips() {
        let tree = json!({
            "categoryName": "Books",
            "parent": {"categoryName": "Media"},
            "subcategories": [
                {"categoryName": "Novels", "subcategories": [{"categoryName": "Thrillers"}]},
                {"categoryName": "Comics"}
            ]
        });

        let model = Model::from_tree(&CATEGORY, tree.clone());
        assert_eq!(model.to_tree(true), tree);

        let nested = &model.models("subcategories").unwrap()[0].models("subcategories").unwrap()[0];
        assert_eq!(nested.str("categoryName"), Some("Thrillers"));
    }

    #[test]
    fn test_set_converts_and_validates() {
        let mut model = Model::new(&CONTAINER);
        model.set("relation", json!({"foo": "bar"})).unwrap();
        model.set("name", json!("box")).unwrap();

        assert_eq!(model.model("relation").unwrap().str("foo"), Some("bar"));
        assert_eq!(model.str("name"), Some("box"));

        model.set("name", json!(null)).unwrap();
        assert!(model.is_empty_field("name"));

        assert!(matches!(
            model.set("missing", json!(1)),
            Err(ModelError::UnknownField { .. })
        ));
        assert!(model.set("relations", json!("nope")).is_err());
    }

    #[test]
    fn test_typed_bridge() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct Item {
            foo: Option<String>,
            tags: Option<Vec<String>>,
        }

        let typed = Item {
            foo: Some("bar".to_string()),
            tags: None,
        };
        let model = Model::from_typed(&ITEM, &typed).unwrap();
        assert!(model.is_empty_field("tags"));

        let back: Item = model.to_typed().unwrap();
        assert_eq!(back, typed);
    }
}
