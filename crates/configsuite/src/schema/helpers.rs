//! Helper functions for reading schema descriptions
//!
//! Small extractors over a description node (a `Yaml::Hash`) that turn a
//! wrongly typed meta-value into a [`SchemaError`] at the node's path.

use crate::error::{SchemaError, SchemaPath, SchemaResult};
use crate::schema::MetaKey;
use crate::types::raw_type_name;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::Hash;

const RESERVED_SCALARS: [&str; 7] = ["null", "true", "True", "TRUE", "false", "False", "FALSE"];

/// Whether `name` can be used as a NamedDict field name.
///
/// Field names are identifiers: a letter or `_`, then letters, digits or
/// `_`. Words a YAML loader reads as `null` or a boolean are excluded, since
/// a raw key spelled that way never arrives as a string.
pub fn is_valid_field_name(name: &str) -> bool {
    if RESERVED_SCALARS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Look up a meta-key in a description node
pub(super) fn get_meta<'a>(node: &'a Hash, key: MetaKey) -> Option<&'a Yaml> {
    node.get(&Yaml::String(key.as_str().to_string()))
}

/// Get a string meta-value
pub(super) fn get_meta_string(
    node: &Hash,
    key: MetaKey,
    path: &SchemaPath,
) -> SchemaResult<Option<String>> {
    match get_meta(node, key) {
        None => Ok(None),
        Some(Yaml::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SchemaError::InvalidStructure {
            message: format!(
                "'{}' must be a string, got {}",
                key.as_str(),
                raw_type_name(other)
            ),
            path: path.clone(),
        }),
    }
}

/// Get a boolean meta-value
pub(super) fn get_meta_bool(
    node: &Hash,
    key: MetaKey,
    path: &SchemaPath,
) -> SchemaResult<Option<bool>> {
    match get_meta(node, key) {
        None => Ok(None),
        Some(Yaml::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(SchemaError::InvalidStructure {
            message: format!(
                "'{}' must be a boolean, got {}",
                key.as_str(),
                raw_type_name(other)
            ),
            path: path.clone(),
        }),
    }
}
