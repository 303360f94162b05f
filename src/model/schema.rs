//! Static field-definition tables for models.
//!
//! Every model type is described by one [`ModelSchema`]: an ordered list of
//! [`FieldDef`]s, each tagged with a [`FieldKind`]. Related types are referenced
//! through [`SchemaRef`] function pointers so schemas can point at each other,
//! or at themselves, from `static` items.
//!
//! # Example
//!
//! ```rust
//! use bol_retailer::model::{FieldDef, ModelSchema};
//!
//! fn category() -> &'static ModelSchema {
//!     &CATEGORY
//! }
//!
//! static CATEGORY: ModelSchema = ModelSchema::new(
//!     "Category",
//!     &[
//!         FieldDef::scalar("categoryName"),
//!         FieldDef::array("subcategories", category),
//!     ],
//! );
//!
//! assert_eq!(CATEGORY.fields().len(), 2);
//! assert!(CATEGORY.field("subcategories").is_some());
//! ```

use std::fmt;

/// Resolves the schema of a related model type.
pub type SchemaRef = fn() -> &'static ModelSchema;

/// How a declared field is (de)serialized.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// A raw JSON value, copied as-is.
    Scalar,
    /// A single nested model of the referenced type.
    Single(SchemaRef),
    /// A dense, ordered sequence of nested models of the referenced type.
    ArrayOf(SchemaRef),
}

impl FieldKind {
    /// Returns the schema of the related type, if any.
    #[must_use]
    pub fn related(&self) -> Option<&'static ModelSchema> {
        match self {
            Self::Scalar => None,
            Self::Single(schema) | Self::ArrayOf(schema) => Some(schema()),
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Single(schema) => write!(f, "Single({})", schema().name()),
            Self::ArrayOf(schema) => write!(f, "ArrayOf({})", schema().name()),
        }
    }
}

/// One entry of a field-definition table.
#[derive(Clone, Copy, Debug)]
pub struct FieldDef {
    name: &'static str,
    kind: FieldKind,
}

impl FieldDef {
    /// Declares a scalar field.
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
        }
    }

    /// Declares a field holding one related model.
    #[must_use]
    pub const fn model(name: &'static str, schema: SchemaRef) -> Self {
        Self {
            name,
            kind: FieldKind::Single(schema),
        }
    }

    /// Declares a field holding a sequence of related models.
    #[must_use]
    pub const fn array(name: &'static str, schema: SchemaRef) -> Self {
        Self {
            name,
            kind: FieldKind::ArrayOf(schema),
        }
    }

    /// Returns the field name as it appears in JSON.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// The field-definition table of one model type.
#[derive(Debug)]
pub struct ModelSchema {
    name: &'static str,
    fields: &'static [FieldDef],
}

impl ModelSchema {
    /// Creates a schema; intended for `static` declarations.
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { name, fields }
    }

    /// Returns the model type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared fields in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// Returns `true` if both references point at the same schema.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> &'static ModelSchema {
        &LINK
    }

    fn node() -> &'static ModelSchema {
        &NODE
    }

    static LINK: ModelSchema = ModelSchema::new(
        "Link",
        &[
            FieldDef::scalar("rel"),
            FieldDef::scalar("href"),
            FieldDef::scalar("method"),
        ],
    );

    static NODE: ModelSchema = ModelSchema::new(
        "Node",
        &[
            FieldDef::scalar("id"),
            FieldDef::model("parent", node),
            FieldDef::array("links", link),
        ],
    );

    #[test]
    fn test_field_lookup_by_name() {
        assert_eq!(LINK.field("href").map(FieldDef::name), Some("href"));
        assert!(LINK.field("unknown").is_none());
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let names: Vec<_> = LINK.fields().iter().map(FieldDef::name).collect();
        assert_eq!(names, vec!["rel", "href", "method"]);
    }

    #[test]
    fn test_self_referential_schema_resolves() {
        let parent = NODE.field("parent").unwrap();
        let related = parent.kind().related().unwrap();
        assert!(related.same_as(&NODE));
        assert_eq!(format!("{:?}", parent.kind()), "Single(Node)");
    }

    #[test]
    fn test_related_type_for_each_kind() {
        assert!(NODE.field("id").unwrap().kind().related().is_none());
        let links = NODE.field("links").unwrap().kind();
        assert!(links.related().unwrap().same_as(&LINK));
        assert!(matches!(links, FieldKind::ArrayOf(_)));
    }

    #[test]
    fn test_distinct_schemas_are_not_the_same() {
        assert!(!LINK.same_as(&NODE));
        assert!(LINK.same_as(link()));
    }
}
