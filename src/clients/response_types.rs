//! Per-status response-type directories.
//!
//! Every request declares, per HTTP status code, what the body of a
//! successful (or tolerated) response looks like. A status code missing from
//! the directory is an error.
//!
//! # Example
//!
//! ```rust
//! use bol_retailer::clients::ResponseTypes;
//! use bol_retailer::model::{FieldDef, ModelSchema};
//!
//! static ORDER: ModelSchema = ModelSchema::new("Order", &[FieldDef::scalar("orderId")]);
//!
//! let types = ResponseTypes::new().model(200, &ORDER).no_content(404);
//! assert!(types.get(200).is_some());
//! assert!(types.get(500).is_none());
//! ```

use std::collections::HashMap;

use crate::model::{Model, ModelSchema};

/// Expected shape of a response body.
#[derive(Clone, Copy, Debug)]
pub enum ResponseType {
    /// Decode the body as JSON into a model of the given schema.
    Model(&'static ModelSchema),
    /// Return the body verbatim.
    Text,
    /// Ignore the body and return nothing.
    NoContent,
}

/// A mapping from HTTP status code to expected [`ResponseType`].
#[derive(Clone, Debug, Default)]
pub struct ResponseTypes {
    types: HashMap<u16, ResponseType>,
}

impl ResponseTypes {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a status whose body decodes into `schema`.
    #[must_use]
    pub fn model(mut self, status: u16, schema: &'static ModelSchema) -> Self {
        self.types.insert(status, ResponseType::Model(schema));
        self
    }

    /// Declares a status whose body is returned verbatim.
    #[must_use]
    pub fn text(mut self, status: u16) -> Self {
        self.types.insert(status, ResponseType::Text);
        self
    }

    /// Declares a status without a meaningful body.
    #[must_use]
    pub fn no_content(mut self, status: u16) -> Self {
        self.types.insert(status, ResponseType::NoContent);
        self
    }

    /// Looks up the expected type for a status code.
    #[must_use]
    pub fn get(&self, status: u16) -> Option<ResponseType> {
        self.types.get(&status).copied()
    }
}

/// A decoded response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseValue {
    /// A decoded model.
    Model(Model),
    /// The raw body.
    Text(String),
    /// No content.
    Empty,
}

impl ResponseValue {
    /// Returns the model, if the response decoded into one.
    #[must_use]
    pub fn into_model(self) -> Option<Model> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Returns the raw body, if the response was declared as text.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for [`ResponseValue::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
