// Configuration validation engine

use tracing::trace;
use yaml_rust2::Yaml;

use crate::error::{KeyPath, ValidationError, ValidationErrorKind};
use crate::schema::{Content, SchemaNode};
use crate::types::{TypeKind, raw_type_name, render_scalar};

/// Validate a raw configuration against a schema.
///
/// Never stops at the first problem: every violation in the tree is
/// returned, in traversal order (parents before children, NamedDict fields
/// in declaration order, sequence elements and Dict entries in their raw
/// order). An empty vector means the configuration is valid.
pub fn validate(value: &Yaml, schema: &SchemaNode) -> Vec<ValidationError> {
    let mut context = ValidationContext::new();
    validate_generic(value, schema, &mut context);
    context.into_errors()
}

/// Validation context tracks state during validation
pub struct ValidationContext {
    /// Current key path (e.g. ["current_job", "company_name"])
    key_path: KeyPath,
    /// Collected validation errors
    errors: Vec<ValidationError>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self {
            key_path: KeyPath::new(),
            errors: Vec::new(),
        }
    }

    /// Record an error at the current path
    pub fn add_error(&mut self, kind: ValidationErrorKind) {
        let error = ValidationError::new(kind, self.key_path.clone());
        trace!(path = %error.key_path, code = error.error_code(), "{}", error.message());
        self.errors.push(error);
    }

    /// Execute a function with a key segment appended to the path
    pub fn with_key<F, R>(&mut self, key: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.key_path.push_key(key);
        let result = f(self);
        self.key_path.pop();
        result
    }

    /// Execute a function with an index segment appended to the path
    pub fn with_index<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.key_path.push_index(index);
        let result = f(self);
        self.key_path.pop();
        result
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Main validation dispatcher
fn validate_generic(value: &Yaml, schema: &SchemaNode, context: &mut ValidationContext) {
    let kind = schema.kind();
    if !kind.matches(value) {
        // Wrong shape: nothing below this point can be checked meaningfully
        context.add_error(ValidationErrorKind::TypeMismatch {
            expected: kind.expected().to_string(),
            got: raw_type_name(value).to_string(),
        });
        return;
    }

    for validator in schema.validators() {
        if let Err(message) = validator.check(value) {
            context.add_error(ValidationErrorKind::InvalidValue {
                validator: validator.name().to_string(),
                message,
            });
        }
    }

    match (kind, schema.content(), value) {
        (TypeKind::NamedDict, Content::Fields(fields), Yaml::Hash(entries)) => {
            validate_named_dict(entries, fields, context)
        }
        (TypeKind::List, Content::Element(element), Yaml::Array(items)) => {
            validate_list(items, element, context)
        }
        (TypeKind::Dict, Content::Element(element), Yaml::Hash(entries)) => {
            validate_dict(entries, element, context)
        }
        // Scalars are accepted as-is once they match
        _ => {}
    }
}

/// Validate a mapping with a fixed set of declared fields
fn validate_named_dict(
    entries: &yaml_rust2::yaml::Hash,
    fields: &indexmap::IndexMap<String, SchemaNode>,
    context: &mut ValidationContext,
) {
    for key in entries.keys() {
        let declared = key.as_str().is_some_and(|name| fields.contains_key(name));
        if !declared {
            context.add_error(ValidationErrorKind::UnknownKey {
                key: render_scalar(key),
            });
        }
    }

    for (name, field) in fields {
        match entries.get(&Yaml::String(name.clone())) {
            Some(child) => context.with_key(name, |ctx| validate_generic(child, field, ctx)),
            None if field.is_required() => {
                context.add_error(ValidationErrorKind::MissingKey { key: name.clone() })
            }
            // Optional and absent: its own children are never checked
            None => {}
        }
    }
}

/// Validate each element of a sequence
fn validate_list(items: &[Yaml], element: &SchemaNode, context: &mut ValidationContext) {
    for (i, item) in items.iter().enumerate() {
        context.with_index(i, |ctx| validate_generic(item, element, ctx));
    }
}

/// Validate each value of a string-keyed mapping
fn validate_dict(
    entries: &yaml_rust2::yaml::Hash,
    element: &SchemaNode,
    context: &mut ValidationContext,
) {
    for (key, value) in entries {
        match key {
            Yaml::String(key) => context.with_key(key, |ctx| validate_generic(value, element, ctx)),
            other => context.add_error(ValidationErrorKind::InvalidKey {
                key: render_scalar(other),
            }),
        }
    }
}
