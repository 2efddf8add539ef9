// Error types for schema construction, validation and snapshot access

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while building a schema.
///
/// These signal a broken program (a malformed schema description), not bad
/// user input, so they are returned from schema construction and never mixed
/// with [`ValidationError`]s.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A key other than `Type`, `Content`, `Required` or `Description`
    #[error("Unknown meta-key '{key}' at {path}")]
    UnknownMetaKey { key: String, path: SchemaPath },

    /// Node description without a `Type`
    #[error("Missing 'Type' at {path}")]
    MissingType { path: SchemaPath },

    /// `Type` names no known kind
    #[error("Unknown type '{name}' at {path}")]
    UnknownType { name: String, path: SchemaPath },

    /// Container kind without `Content`
    #[error("{kind} requires 'Content' at {path}")]
    MissingContent { kind: String, path: SchemaPath },

    /// Scalar kind with `Content`
    #[error("{kind} does not take 'Content' at {path}")]
    UnexpectedContent { kind: String, path: SchemaPath },

    /// Field name that is not an identifier
    #[error("Invalid field name '{name}' at {path}")]
    InvalidFieldName { name: String, path: SchemaPath },

    /// Field declared twice in the same NamedDict
    #[error("Duplicate field '{name}' at {path}")]
    DuplicateField { name: String, path: SchemaPath },

    /// Element validator pattern that does not compile
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Any other shape problem in the description
    #[error("Invalid schema structure at {path}: {message}")]
    InvalidStructure { message: String, path: SchemaPath },
}

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// Value present but of the wrong shape or type
    TypeMismatch { expected: String, got: String },

    /// Required key absent from a NamedDict
    MissingKey { key: String },

    /// Key not declared by a NamedDict
    UnknownKey { key: String },

    /// Value rejected by an element validator
    InvalidValue { validator: String, message: String },

    /// Non-string key in a Dict
    InvalidKey { key: String },
}

impl ValidationErrorKind {
    /// Get the error code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingKey { .. } => "CS-1-10",
            ValidationErrorKind::TypeMismatch { .. } => "CS-1-11",
            ValidationErrorKind::InvalidValue { .. } => "CS-1-12",
            ValidationErrorKind::InvalidKey { .. } => "CS-1-13",
            ValidationErrorKind::UnknownKey { .. } => "CS-1-18",
        }
    }

    /// Format a human-readable message from this error kind
    pub fn message(&self) -> String {
        match self {
            ValidationErrorKind::TypeMismatch { expected, got } => {
                format!("Expected {}, got {}", expected, got)
            }
            ValidationErrorKind::MissingKey { key } => {
                format!("Missing required key '{}'", key)
            }
            ValidationErrorKind::UnknownKey { key } => format!("Unknown key '{}'", key),
            ValidationErrorKind::InvalidValue { validator, message } => {
                format!("Value rejected by '{}': {}", validator, message)
            }
            ValidationErrorKind::InvalidKey { key } => {
                format!("Dict keys must be strings, got {}", key)
            }
        }
    }
}

/// A single violation found while validating a raw configuration.
///
/// `key_path` locates the value the error is about. For `UnknownKey` and
/// `MissingKey` that is the enclosing NamedDict; the offending key itself is
/// carried in the kind.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub key_path: KeyPath,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error at {}: {}", self.key_path, self.message())
    }
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, key_path: KeyPath) -> Self {
        Self { kind, key_path }
    }

    /// Get the human-readable message for this error
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }
}

/// Returned when a snapshot is requested from an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration is invalid ({error_count} validation errors); no snapshot available")]
pub struct InvalidConfigError {
    pub error_count: usize,
}

/// Errors from typed snapshot access
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    /// The NamedDict does not declare this field
    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    /// The value cannot be converted to the requested type
    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// serde conversion into a user type failed
    #[error("Failed to deserialize snapshot: {0}")]
    Deserialize(String),
}

/// Location inside a raw configuration (e.g. `current_job.company_name`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Create the empty (root) path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "(root)")
        } else {
            for (i, segment) in self.segments.iter().enumerate() {
                if i > 0 {
                    write!(f, ".")?;
                }
                write!(f, "{}", segment)?;
            }
            Ok(())
        }
    }
}

/// A segment in a key path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location inside a schema description (e.g. `Content > current_job`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Return a copy of this path extended by one segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.segments.join(" > "))
        }
    }
}
