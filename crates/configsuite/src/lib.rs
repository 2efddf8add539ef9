// Declarative configuration validation
//
// A schema describes the expected shape of a nested configuration
// (NamedDicts of typed fields, Lists, Dicts and scalar leaves). Validating a
// raw configuration collects every violation with its key path in a single
// pass; a configuration without violations gets an immutable, typed
// snapshot.

pub mod docs;
pub mod error;
pub mod schema;
pub mod snapshot;
pub mod suite;
pub mod types;
pub mod validator;
pub mod validators;

pub use docs::describe;
pub use error::{
    InvalidConfigError, KeyPath, PathSegment, SchemaError, SchemaPath, SchemaResult,
    SnapshotError, ValidationError, ValidationErrorKind,
};
pub use schema::{Content, MetaKey, NamedDictBuilder, SchemaNode};
pub use snapshot::{FromSnapshot, NamedSnapshot, Snapshot};
pub use suite::{ConfigSuite, ValidationOutcome};
pub use types::TypeKind;
pub use validator::{ValidationContext, validate};
pub use validators::ElementValidator;

// Raw configurations are yaml-rust2 values
pub use yaml_rust2::Yaml;
