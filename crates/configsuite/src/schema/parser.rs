// Building schema nodes from declarative descriptions

use tracing::debug;
use yaml_rust2::Yaml;

use super::helpers::{get_meta, get_meta_bool, get_meta_string};
use super::{MetaKey, SchemaNode, build_named_dict};
use crate::error::{SchemaError, SchemaPath, SchemaResult};
use crate::types::{TypeKind, raw_type_name, render_scalar};

impl SchemaNode {
    /// Build a schema from a description.
    ///
    /// Format:
    /// ```yaml
    /// Type: NamedDict
    /// Content:
    ///   name:
    ///     Type: String
    ///   weight:
    ///     Type: Number
    ///     Required: false
    ///     Description: Weight in kilograms
    ///   tags:
    ///     Type: List
    ///     Content:
    ///       Type: String
    /// ```
    ///
    /// `Required` defaults to `true`. Any key other than the four meta-keys
    /// is rejected.
    pub fn from_description(description: &Yaml) -> SchemaResult<SchemaNode> {
        let node = parse_node(description, &SchemaPath::new())?;
        debug!(kind = %node.kind(), "built schema from description");
        Ok(node)
    }
}

fn parse_node(description: &Yaml, path: &SchemaPath) -> SchemaResult<SchemaNode> {
    let entries = match description {
        Yaml::Hash(entries) => entries,
        other => {
            return Err(SchemaError::InvalidStructure {
                message: format!(
                    "schema node must be a mapping, got {}",
                    raw_type_name(other)
                ),
                path: path.clone(),
            });
        }
    };

    for key in entries.keys() {
        let known = key.as_str().and_then(MetaKey::from_name).is_some();
        if !known {
            return Err(SchemaError::UnknownMetaKey {
                key: render_scalar(key),
                path: path.clone(),
            });
        }
    }

    let type_name = get_meta_string(entries, MetaKey::Type, path)?
        .ok_or_else(|| SchemaError::MissingType { path: path.clone() })?;
    let kind = TypeKind::from_name(&type_name).ok_or_else(|| SchemaError::UnknownType {
        name: type_name.clone(),
        path: path.clone(),
    })?;
    let required = get_meta_bool(entries, MetaKey::Required, path)?.unwrap_or(true);
    let description = get_meta_string(entries, MetaKey::Description, path)?;

    let content_path = path.child(MetaKey::Content.as_str());
    let content = get_meta(entries, MetaKey::Content);

    let node = match (kind, content) {
        (TypeKind::NamedDict, Some(fields)) => parse_fields(fields, &content_path)?,
        (TypeKind::List, Some(element)) => SchemaNode::list(parse_node(element, &content_path)?),
        (TypeKind::Dict, Some(value)) => SchemaNode::dict(parse_node(value, &content_path)?),
        (TypeKind::NamedDict | TypeKind::List | TypeKind::Dict, None) => {
            return Err(SchemaError::MissingContent {
                kind: kind.name().to_string(),
                path: path.clone(),
            });
        }
        (TypeKind::String | TypeKind::Number | TypeKind::Integer | TypeKind::Bool, Some(_)) => {
            return Err(SchemaError::UnexpectedContent {
                kind: kind.name().to_string(),
                path: path.clone(),
            });
        }
        (TypeKind::String, None) => SchemaNode::string(),
        (TypeKind::Number, None) => SchemaNode::number(),
        (TypeKind::Integer, None) => SchemaNode::integer(),
        (TypeKind::Bool, None) => SchemaNode::boolean(),
    };

    let node = node.required(required);
    Ok(match description {
        Some(text) => node.with_description(text),
        None => node,
    })
}

fn parse_fields(fields: &Yaml, path: &SchemaPath) -> SchemaResult<SchemaNode> {
    let entries = match fields {
        Yaml::Hash(entries) => entries,
        other => {
            return Err(SchemaError::InvalidStructure {
                message: format!(
                    "NamedDict 'Content' must map field names to schemas, got {}",
                    raw_type_name(other)
                ),
                path: path.clone(),
            });
        }
    };

    let mut declared = Vec::with_capacity(entries.len());
    for (key, child) in entries {
        let name = match key {
            Yaml::String(name) => name.clone(),
            other => {
                return Err(SchemaError::InvalidFieldName {
                    name: render_scalar(other),
                    path: path.clone(),
                });
            }
        };
        let node = parse_node(child, &path.child(name.as_str()))?;
        declared.push((name, node));
    }

    build_named_dict(declared, path)
}
