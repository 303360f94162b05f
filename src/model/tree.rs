//! Input trees for model construction.

use serde_json::Value;

use super::instance::Model;

/// A JSON-compatible tree that may embed already-built [`Model`]s.
///
/// Plain JSON converts with `From<Value>`. Callers assembling a request body
/// from existing models can mix them in through [`Tree::Model`] and
/// [`Tree::Array`]; the engine passes such values through unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use bol_retailer::model::{Model, Tree};
/// use serde_json::json;
///
/// let item = Model::from_tree(&ORDER_ITEM, json!({"ean": "0000007740404"}));
/// let tree = Tree::object([
///     ("orderId", Tree::from(json!("1043946570"))),
///     ("orderItems", Tree::from(vec![item])),
/// ]);
/// let order = Model::from_tree(&ORDER, tree);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Tree {
    /// Raw JSON.
    Value(Value),
    /// Ordered key/value entries.
    Object(Vec<(String, Tree)>),
    /// Ordered elements.
    Array(Vec<Tree>),
    /// An already-built model.
    Model(Model),
}

impl Tree {
    /// Builds an object node from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Returns `true` for a JSON `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// A short description of the node, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Value(Value::Null) => "null",
            Self::Value(Value::Bool(_)) => "boolean",
            Self::Value(Value::Number(_)) => "number",
            Self::Value(Value::String(_)) => "string",
            Self::Value(Value::Array(_)) | Self::Array(_) => "array",
            Self::Value(Value::Object(_)) | Self::Object(_) => "object",
            Self::Model(_) => "model",
        }
    }

    /// Converts the tree into plain JSON, flattening embedded models with nulls kept.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_value()))
                    .collect(),
            ),
            Self::Array(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
            Self::Model(model) => model.to_tree(false),
        }
    }

    /// Splits an object node into its entries; `None` for any other node.
    pub(crate) fn into_entries(self) -> Option<Vec<(String, Self)>> {
        match self {
            Self::Object(entries) => Some(entries),
            Self::Value(Value::Object(map)) => Some(
                map.into_iter()
                    .map(|(key, value)| (key, Self::Value(value)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Splits a collection node into its elements in source order.
    ///
    /// Objects count as collections: their keys are discarded, so
    /// `{"a": x, "2": y}` yields `[x, y]`.
    pub(crate) fn into_elements(self) -> Option<Vec<Self>> {
        match self {
            Self::Array(items) => Some(items),
            Self::Value(Value::Array(items)) => Some(items.into_iter().map(Self::Value).collect()),
            Self::Object(_) | Self::Value(Value::Object(_)) => self
                .into_entries()
                .map(|entries| entries.into_iter().map(|(_, value)| value).collect()),
            _ => None,
        }
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Model> for Tree {
    fn from(model: Model) -> Self {
        Self::Model(model)
    }
}

impl From<Vec<Model>> for Tree {
    fn from(models: Vec<Model>) -> Self {
        Self::Array(models.into_iter().map(Self::Model).collect())
    }
}

impl From<Vec<Self>> for Tree {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(items)
    }
}
