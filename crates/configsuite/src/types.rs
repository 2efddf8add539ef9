//! Type descriptors
//!
//! The closed set of kinds a schema node can have. Each kind knows whether a
//! raw value has the right gross shape and, for scalars, how to turn it into
//! its native snapshot representation. Container kinds only check the shape;
//! their elements are checked by the validator using the node's content.

use crate::snapshot::Snapshot;
use std::fmt;
use yaml_rust2::Yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Text
    String,
    /// Integer or floating point number (never a boolean)
    Number,
    /// Whole number only
    Integer,
    /// `true` / `false`
    Bool,
    /// Mapping with a fixed set of named, typed fields
    NamedDict,
    /// Sequence of elements sharing one schema
    List,
    /// Mapping from string keys to values sharing one schema
    Dict,
}

impl TypeKind {
    /// Name used for this kind in schema descriptions
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::String => "String",
            TypeKind::Number => "Number",
            TypeKind::Integer => "Integer",
            TypeKind::Bool => "Bool",
            TypeKind::NamedDict => "NamedDict",
            TypeKind::List => "List",
            TypeKind::Dict => "Dict",
        }
    }

    /// Parse a kind from its description name
    pub fn from_name(name: &str) -> Option<TypeKind> {
        match name {
            "String" => Some(TypeKind::String),
            "Number" => Some(TypeKind::Number),
            "Integer" => Some(TypeKind::Integer),
            "Bool" | "Boolean" => Some(TypeKind::Bool),
            "NamedDict" => Some(TypeKind::NamedDict),
            "List" => Some(TypeKind::List),
            "Dict" => Some(TypeKind::Dict),
            _ => None,
        }
    }

    /// Whether this kind has child schema content
    pub fn is_container(&self) -> bool {
        matches!(self, TypeKind::NamedDict | TypeKind::List | TypeKind::Dict)
    }

    /// What a matching raw value looks like, for error messages
    pub fn expected(&self) -> &'static str {
        match self {
            TypeKind::String => "string",
            TypeKind::Number => "number",
            TypeKind::Integer => "integer",
            TypeKind::Bool => "boolean",
            TypeKind::NamedDict | TypeKind::Dict => "mapping",
            TypeKind::List => "sequence",
        }
    }

    /// Check the gross shape of a raw value.
    ///
    /// No coercion across types: `"5"` is not a Number and `true` is
    /// neither a Number nor an Integer. Numbers must be finite, so `.nan`
    /// and `.inf` are rejected.
    pub fn matches(&self, value: &Yaml) -> bool {
        match self {
            TypeKind::String => matches!(value, Yaml::String(_)),
            TypeKind::Number => match value {
                Yaml::Integer(_) => true,
                Yaml::Real(_) => value.as_f64().is_some_and(f64::is_finite),
                _ => false,
            },
            TypeKind::Integer => matches!(value, Yaml::Integer(_)),
            TypeKind::Bool => matches!(value, Yaml::Boolean(_)),
            TypeKind::NamedDict | TypeKind::Dict => matches!(value, Yaml::Hash(_)),
            TypeKind::List => matches!(value, Yaml::Array(_)),
        }
    }

    /// Convert a matching scalar into its native snapshot value.
    ///
    /// Returns `None` for container kinds (the snapshot builder recurses
    /// through their content) and for values that do not match.
    pub fn coerce(&self, value: &Yaml) -> Option<Snapshot> {
        match (self, value) {
            (TypeKind::String, Yaml::String(s)) => Some(Snapshot::String(s.clone())),
            (TypeKind::Number, Yaml::Integer(n)) => Some(Snapshot::Number(*n as f64)),
            (TypeKind::Number, Yaml::Real(_)) => value
                .as_f64()
                .filter(|n| n.is_finite())
                .map(Snapshot::Number),
            (TypeKind::Integer, Yaml::Integer(n)) => Some(Snapshot::Integer(*n)),
            (TypeKind::Bool, Yaml::Boolean(b)) => Some(Snapshot::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Get a human-readable type name for a raw value
pub fn raw_type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::BadValue => "invalid value",
        Yaml::Boolean(_) => "boolean",
        Yaml::Integer(_) => "integer",
        Yaml::Real(text) => real_type_name(text),
        Yaml::String(_) => "string",
        Yaml::Array(_) => "sequence",
        Yaml::Hash(_) => "mapping",
        Yaml::Alias(_) => "alias",
    }
}

// The loader turns integer literals outside i64 into reals
fn real_type_name(text: &str) -> &'static str {
    if !text.contains(['.', 'e', 'E']) {
        "integer out of range"
    } else if text.parse::<f64>().is_ok_and(f64::is_finite) {
        "float"
    } else {
        "non-finite float"
    }
}

/// Render a raw scalar for messages (e.g. a non-string mapping key)
pub(crate) fn render_scalar(value: &Yaml) -> String {
    match value {
        Yaml::String(s) => s.clone(),
        Yaml::Integer(n) => n.to_string(),
        Yaml::Real(r) => r.clone(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => format!("<{}>", raw_type_name(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for kind in [
            TypeKind::String,
            TypeKind::Number,
            TypeKind::Integer,
            TypeKind::Bool,
            TypeKind::NamedDict,
            TypeKind::List,
            TypeKind::Dict,
        ] {
            assert_eq!(TypeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TypeKind::from_name("Boolean"), Some(TypeKind::Bool));
        assert_eq!(TypeKind::from_name("string"), None);
    }

    #[test]
    fn test_string_matches() {
        assert!(TypeKind::String.matches(&Yaml::String("hello".to_string())));
        assert!(!TypeKind::String.matches(&Yaml::Integer(42)));
        assert!(!TypeKind::String.matches(&Yaml::Null));
    }

    #[test]
    fn test_number_matches_integer_and_real() {
        assert!(TypeKind::Number.matches(&Yaml::Integer(100)));
        assert!(TypeKind::Number.matches(&Yaml::Real("3.14".to_string())));
        assert!(!TypeKind::Number.matches(&Yaml::String("100".to_string())));
    }

    #[test]
    fn test_booleans_are_not_numbers() {
        assert!(!TypeKind::Number.matches(&Yaml::Boolean(true)));
        assert!(!TypeKind::Integer.matches(&Yaml::Boolean(false)));
        assert!(TypeKind::Bool.matches(&Yaml::Boolean(false)));
    }

    #[test]
    fn test_integer_rejects_real() {
        assert!(TypeKind::Integer.matches(&Yaml::Integer(-3)));
        assert!(!TypeKind::Integer.matches(&Yaml::Real("1.5".to_string())));
    }

    #[test]
    fn test_container_shapes() {
        let hash = Yaml::Hash(yaml_rust2::yaml::Hash::new());
        let array = Yaml::Array(vec![]);

        assert!(TypeKind::NamedDict.matches(&hash));
        assert!(TypeKind::Dict.matches(&hash));
        assert!(!TypeKind::List.matches(&hash));
        assert!(TypeKind::List.matches(&array));
        assert!(!TypeKind::NamedDict.matches(&array));
    }

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(
            TypeKind::Number.coerce(&Yaml::Integer(100)),
            Some(Snapshot::Number(100.0))
        );
        assert_eq!(
            TypeKind::Number.coerce(&Yaml::Real("2.5".to_string())),
            Some(Snapshot::Number(2.5))
        );
        assert_eq!(
            TypeKind::Integer.coerce(&Yaml::Integer(7)),
            Some(Snapshot::Integer(7))
        );
        assert_eq!(
            TypeKind::String.coerce(&Yaml::String("x".to_string())),
            Some(Snapshot::String("x".to_string()))
        );
        assert_eq!(TypeKind::String.coerce(&Yaml::Integer(1)), None);
        assert_eq!(TypeKind::List.coerce(&Yaml::Array(vec![])), None);
    }

    #[test]
    fn test_raw_type_name() {
        assert_eq!(raw_type_name(&Yaml::Null), "null");
        assert_eq!(raw_type_name(&Yaml::Boolean(true)), "boolean");
        assert_eq!(raw_type_name(&Yaml::Real("1.0".to_string())), "float");
        assert_eq!(raw_type_name(&Yaml::Array(vec![])), "sequence");
    }

    #[test]
    fn test_non_finite_reals_are_not_numbers() {
        for text in [".nan", ".inf", "-.Inf", "1e400"] {
            let value = Yaml::Real(text.to_string());
            assert!(!TypeKind::Number.matches(&value), "{} matched", text);
            assert_eq!(TypeKind::Number.coerce(&value), None);
            assert_eq!(raw_type_name(&value), "non-finite float");
        }
    }

    #[test]
    fn test_oversized_integer_literal() {
        let value = Yaml::Real("99999999999999999999".to_string());
        assert!(!TypeKind::Integer.matches(&value));
        assert_eq!(raw_type_name(&value), "integer out of range");
        assert_eq!(raw_type_name(&Yaml::Real("2.5e3".to_string())), "float");
    }
}
