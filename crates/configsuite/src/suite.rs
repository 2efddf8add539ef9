//! The [`ConfigSuite`] facade: one schema, one raw configuration, validated
//! once at construction.

use tracing::debug;
use yaml_rust2::Yaml;

use crate::error::{InvalidConfigError, SchemaResult, ValidationError};
use crate::schema::SchemaNode;
use crate::snapshot::Snapshot;
use crate::validator::validate;

/// Outcome of validating a configuration: the complete error list, or the
/// snapshot. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Invalid(Vec<ValidationError>),
    Valid(Snapshot),
}

/// A validated configuration.
///
/// Immutable after construction, so it can be shared between threads
/// freely.
///
/// ```
/// use configsuite::{ConfigSuite, SchemaNode};
/// use yaml_rust2::YamlLoader;
///
/// let schema = SchemaNode::named_dict()
///     .field("name", SchemaNode::string())
///     .field("weight", SchemaNode::number().optional())
///     .build()
///     .unwrap();
/// let raw = YamlLoader::load_from_str("name: Atle Jonny").unwrap().remove(0);
///
/// let suite = ConfigSuite::new(raw, schema);
/// assert!(suite.valid());
///
/// let snapshot = suite.snapshot().unwrap().as_named_dict().unwrap();
/// assert_eq!(snapshot.value::<String>("name").unwrap(), "Atle Jonny");
/// assert!(snapshot.get("weight").unwrap().is_absent());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSuite {
    raw: Yaml,
    schema: SchemaNode,
    outcome: ValidationOutcome,
}

impl ConfigSuite {
    pub fn new(raw: Yaml, schema: SchemaNode) -> Self {
        let errors = validate(&raw, &schema);
        debug!(
            errors = errors.len(),
            kind = %schema.kind(),
            "validated configuration"
        );
        let outcome = if errors.is_empty() {
            ValidationOutcome::Valid(Snapshot::build(&raw, &schema))
        } else {
            ValidationOutcome::Invalid(errors)
        };

        Self {
            raw,
            schema,
            outcome,
        }
    }

    /// Build the schema from a description, then validate `raw` against it.
    ///
    /// A malformed description is returned as a `SchemaError`; problems with
    /// `raw` are never errors here, they end up in [`errors`](Self::errors).
    pub fn from_description(raw: Yaml, description: &Yaml) -> SchemaResult<Self> {
        let schema = SchemaNode::from_description(description)?;
        Ok(Self::new(raw, schema))
    }

    pub fn valid(&self) -> bool {
        matches!(self.outcome, ValidationOutcome::Valid(_))
    }

    /// Every violation, in traversal order. Empty iff the config is valid.
    pub fn errors(&self) -> &[ValidationError] {
        match &self.outcome {
            ValidationOutcome::Invalid(errors) => errors,
            ValidationOutcome::Valid(_) => &[],
        }
    }

    /// The typed view of a valid configuration.
    ///
    /// An invalid configuration has no snapshot; asking for one is an error
    /// rather than a partial view.
    pub fn snapshot(&self) -> Result<&Snapshot, InvalidConfigError> {
        match &self.outcome {
            ValidationOutcome::Valid(snapshot) => Ok(snapshot),
            ValidationOutcome::Invalid(errors) => Err(InvalidConfigError {
                error_count: errors.len(),
            }),
        }
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    pub fn raw(&self) -> &Yaml {
        &self.raw
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }
}
