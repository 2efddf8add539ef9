//! Element validators
//!
//! Value-level checks that can be attached to a schema node with
//! [`SchemaNode::with_validator`](crate::SchemaNode::with_validator). A
//! validator only runs once the value has the node's type, so the checks
//! here can assume the shape they care about and let anything else pass.
//! Failures are reported as `InvalidValue` errors.

use crate::error::{SchemaError, SchemaResult};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use yaml_rust2::Yaml;

type CheckFn = dyn Fn(&Yaml) -> Result<(), String> + Send + Sync;

/// A named check over a raw value
#[derive(Clone)]
pub struct ElementValidator {
    name: String,
    check: Arc<CheckFn>,
}

impl ElementValidator {
    /// Wrap a closure returning `Err(message)` when the value is rejected
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Yaml) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Yaml) -> Result<(), String> {
        (self.check)(value)
    }
}

impl fmt::Debug for ElementValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn as_number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Integer(n) => Some(*n as f64),
        Yaml::Real(_) => value.as_f64(),
        _ => None,
    }
}

/// Number must be at least `min`
pub fn minimum(min: f64) -> ElementValidator {
    ElementValidator::new("minimum", move |value| match as_number(value) {
        Some(num) if num < min => Err(format!("Number {} is less than minimum {}", num, min)),
        _ => Ok(()),
    })
}

/// Number must be at most `max`
pub fn maximum(max: f64) -> ElementValidator {
    ElementValidator::new("maximum", move |value| match as_number(value) {
        Some(num) if num > max => Err(format!("Number {} is greater than maximum {}", num, max)),
        _ => Ok(()),
    })
}

/// String, sequence or mapping must not be empty
pub fn non_empty() -> ElementValidator {
    ElementValidator::new("non_empty", |value| {
        let empty = match value {
            Yaml::String(s) => s.is_empty(),
            Yaml::Array(items) => items.is_empty(),
            Yaml::Hash(entries) => entries.is_empty(),
            _ => false,
        };
        if empty {
            Err("Value must not be empty".to_string())
        } else {
            Ok(())
        }
    })
}

/// String must match a regular expression.
///
/// A pattern that does not compile is a schema error, reported when the
/// schema is built rather than when a value is checked.
pub fn pattern(pattern: &str) -> SchemaResult<ElementValidator> {
    let re = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let pattern = pattern.to_string();
    Ok(ElementValidator::new("pattern", move |value| match value {
        Yaml::String(s) if !re.is_match(s) => Err(format!(
            "String '{}' does not match pattern '{}'",
            s, pattern
        )),
        _ => Ok(()),
    }))
}

/// String must be one of a fixed set of values
pub fn one_of(allowed: &[&str]) -> ElementValidator {
    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    ElementValidator::new("one_of", move |value| match value {
        Yaml::String(s) if !allowed.contains(s) => Err(format!(
            "Value must be one of: {}, got '{}'",
            allowed.join(", "),
            s
        )),
        _ => Ok(()),
    })
}
