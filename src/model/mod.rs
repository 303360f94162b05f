//! Schema-driven models for Retailer API payloads.
//!
//! A model type is described by a static [`ModelSchema`]. A [`Model`] holds
//! the values of one instance and converts to and from JSON trees:
//!
//! - [`Model::from_tree`] / [`Model::try_from_tree`] build an instance,
//!   recursively constructing related models and ignoring unknown keys.
//! - [`Model::to_tree`] flattens an instance back into JSON, optionally
//!   omitting empty fields.

mod instance;
mod schema;
mod tree;

pub use instance::{FieldValue, Model, ModelError};
pub use schema::{FieldDef, FieldKind, ModelSchema, SchemaRef};
pub use tree::Tree;
