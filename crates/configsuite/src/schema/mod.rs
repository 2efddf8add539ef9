//! Schema nodes
//!
//! A [`SchemaNode`] is the immutable tree the validator walks. It can be
//! built two ways:
//!
//! - from a declarative description (a YAML mapping using the meta-keys
//!   `Type`, `Content`, `Required` and `Description`), see
//!   [`SchemaNode::from_description`];
//! - in code, with the constructors and the [`NamedDictBuilder`].
//!
//! Both paths check the schema itself once, up front, and fail with a
//! [`SchemaError`](crate::SchemaError). The modifiers take `self` by value,
//! so a node cannot change once it has been handed to a suite.

mod helpers;
mod parser;

use indexmap::IndexMap;

use crate::error::{SchemaError, SchemaPath, SchemaResult};
use crate::types::TypeKind;
use crate::validators::ElementValidator;

pub use helpers::is_valid_field_name;

/// Reserved keys of a schema description node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Type,
    Content,
    Required,
    Description,
}

impl MetaKey {
    pub const ALL: [MetaKey; 4] = [
        MetaKey::Type,
        MetaKey::Content,
        MetaKey::Required,
        MetaKey::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaKey::Type => "Type",
            MetaKey::Content => "Content",
            MetaKey::Required => "Required",
            MetaKey::Description => "Description",
        }
    }

    pub fn from_name(name: &str) -> Option<MetaKey> {
        MetaKey::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Child schema content of a node
#[derive(Debug, Clone)]
pub enum Content {
    /// Scalar kinds have no content
    None,
    /// NamedDict fields, in declaration order
    Fields(IndexMap<String, SchemaNode>),
    /// Element schema of a List, value schema of a Dict
    Element(Box<SchemaNode>),
}

impl Content {
    /// Number of direct children (fields, or the single element schema)
    pub fn len(&self) -> usize {
        match self {
            Content::None => 0,
            Content::Fields(fields) => fields.len(),
            Content::Element(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
    kind: TypeKind,
    required: bool,
    description: Option<String>,
    content: Content,
    validators: Vec<ElementValidator>,
}

impl SchemaNode {
    fn scalar(kind: TypeKind) -> Self {
        Self {
            kind,
            required: true,
            description: None,
            content: Content::None,
            validators: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::scalar(TypeKind::String)
    }

    pub fn number() -> Self {
        Self::scalar(TypeKind::Number)
    }

    pub fn integer() -> Self {
        Self::scalar(TypeKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::scalar(TypeKind::Bool)
    }

    /// List whose elements all follow `element`
    pub fn list(element: SchemaNode) -> Self {
        Self {
            content: Content::Element(Box::new(element)),
            ..Self::scalar(TypeKind::List)
        }
    }

    /// Dict with string keys whose values all follow `value`
    pub fn dict(value: SchemaNode) -> Self {
        Self {
            content: Content::Element(Box::new(value)),
            ..Self::scalar(TypeKind::Dict)
        }
    }

    /// Start a NamedDict; fields are checked when the builder is built
    pub fn named_dict() -> NamedDictBuilder {
        NamedDictBuilder::default()
    }

    /// Mark this node as optional in its parent NamedDict
    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a value-level check; validators run in attachment order
    pub fn with_validator(mut self, validator: ElementValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn validators(&self) -> &[ElementValidator] {
        &self.validators
    }

    /// Declared fields of a NamedDict
    pub fn fields(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match &self.content {
            Content::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// Schema of a single declared NamedDict field
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.fields().and_then(|fields| fields.get(name))
    }

    /// Element schema of a List or value schema of a Dict
    pub fn element(&self) -> Option<&SchemaNode> {
        match &self.content {
            Content::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Collects NamedDict fields in declaration order
#[derive(Debug, Default)]
pub struct NamedDictBuilder {
    fields: Vec<(String, SchemaNode)>,
}

impl NamedDictBuilder {
    pub fn field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.fields.push((name.into(), node));
        self
    }

    /// Check field names and produce the node
    pub fn build(self) -> SchemaResult<SchemaNode> {
        build_named_dict(self.fields, &SchemaPath::new())
    }
}

pub(crate) fn build_named_dict(
    declared: Vec<(String, SchemaNode)>,
    path: &SchemaPath,
) -> SchemaResult<SchemaNode> {
    let mut fields = IndexMap::with_capacity(declared.len());
    for (name, node) in declared {
        if !is_valid_field_name(&name) {
            return Err(SchemaError::InvalidFieldName {
                name,
                path: path.clone(),
            });
        }
        if fields.contains_key(&name) {
            return Err(SchemaError::DuplicateField {
                name,
                path: path.clone(),
            });
        }
        fields.insert(name, node);
    }

    Ok(SchemaNode {
        content: Content::Fields(fields),
        ..SchemaNode::scalar(TypeKind::NamedDict)
    })
}
