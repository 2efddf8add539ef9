//! Snapshots
//!
//! A [`Snapshot`] is the read-only view over a configuration that passed
//! validation. It mirrors the schema: NamedDicts become [`NamedSnapshot`]s
//! with one entry per declared field, Lists and Dicts keep their order, and
//! scalars are converted to native values. Optional fields missing from the
//! raw configuration are [`Snapshot::Absent`], which is distinct from every
//! real value (`0`, `false`, `""`, an empty list).
//!
//! Typed access goes through [`FromSnapshot`] or, for user structs, through
//! serde with [`Snapshot::deserialize`].

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use yaml_rust2::Yaml;

use crate::error::SnapshotError;
use crate::schema::{Content, SchemaNode};

#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Optional field not present in the configuration
    Absent,
    String(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    List(Vec<Snapshot>),
    Dict(IndexMap<String, Snapshot>),
    NamedDict(NamedSnapshot),
}

/// Declared fields of a validated NamedDict, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedSnapshot {
    fields: IndexMap<String, Snapshot>,
}

impl Snapshot {
    /// Build the snapshot of a raw value that has already passed validation
    /// against `schema`.
    pub(crate) fn build(raw: &Yaml, schema: &SchemaNode) -> Snapshot {
        match schema.content() {
            Content::Fields(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, child)| {
                        let value = raw
                            .as_hash()
                            .and_then(|entries| entries.get(&Yaml::String(name.clone())))
                            .map_or(Snapshot::Absent, |value| Snapshot::build(value, child));
                        (name.clone(), value)
                    })
                    .collect();
                Snapshot::NamedDict(NamedSnapshot { fields })
            }
            Content::Element(element) => match raw {
                Yaml::Array(items) => Snapshot::List(
                    items
                        .iter()
                        .map(|item| Snapshot::build(item, element))
                        .collect(),
                ),
                Yaml::Hash(entries) => Snapshot::Dict(
                    entries
                        .iter()
                        .filter_map(|(key, value)| {
                            key.as_str()
                                .map(|key| (key.to_string(), Snapshot::build(value, element)))
                        })
                        .collect(),
                ),
                _ => Snapshot::Absent,
            },
            Content::None => schema.kind().coerce(raw).unwrap_or(Snapshot::Absent),
        }
    }

    /// Name of this variant, for conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Snapshot::Absent => "absent",
            Snapshot::String(_) => "string",
            Snapshot::Number(_) => "number",
            Snapshot::Integer(_) => "integer",
            Snapshot::Bool(_) => "boolean",
            Snapshot::List(_) => "list",
            Snapshot::Dict(_) => "dict",
            Snapshot::NamedDict(_) => "named dict",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Snapshot::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Snapshot::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of a Number or Integer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Snapshot::Number(n) => Some(*n),
            Snapshot::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Snapshot::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Snapshot::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Snapshot]> {
        match self {
            Snapshot::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, Snapshot>> {
        match self {
            Snapshot::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_named_dict(&self) -> Option<&NamedSnapshot> {
        match self {
            Snapshot::NamedDict(named) => Some(named),
            _ => None,
        }
    }

    /// Convert to a native Rust value
    pub fn extract<T: FromSnapshot>(&self) -> Result<T, SnapshotError> {
        T::from_snapshot(self)
    }

    /// Convert to JSON. Absent NamedDict fields are left out; a bare
    /// `Absent` becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Snapshot::Absent => Value::Null,
            Snapshot::String(s) => Value::String(s.clone()),
            Snapshot::Number(n) => {
                serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number)
            }
            Snapshot::Integer(n) => Value::Number((*n).into()),
            Snapshot::Bool(b) => Value::Bool(*b),
            Snapshot::List(items) => Value::Array(items.iter().map(Snapshot::to_json).collect()),
            Snapshot::Dict(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Snapshot::NamedDict(named) => Value::Object(
                named
                    .iter()
                    .filter(|(_, value)| !value.is_absent())
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Deserialize into a user type through serde
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, SnapshotError> {
        serde_json::from_value(self.to_json()).map_err(|e| SnapshotError::Deserialize(e.to_string()))
    }
}

impl NamedSnapshot {
    /// Look up a field. `None` means the schema does not declare `name`;
    /// `Some(&Snapshot::Absent)` means it is declared but was not given.
    pub fn get(&self, name: &str) -> Option<&Snapshot> {
        self.fields.get(name)
    }

    /// Like [`get`](Self::get) but undeclared names are an error
    pub fn field(&self, name: &str) -> Result<&Snapshot, SnapshotError> {
        self.fields
            .get(name)
            .ok_or_else(|| SnapshotError::UnknownField {
                field: name.to_string(),
            })
    }

    /// Typed field access, e.g. `job.value::<Option<String>>("position")`
    pub fn value<T: FromSnapshot>(&self, name: &str) -> Result<T, SnapshotError> {
        T::from_snapshot(self.field(name)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Snapshot)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Conversion from a snapshot value into a native type
pub trait FromSnapshot: Sized {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError>;
}

fn mismatch(expected: &'static str, found: &Snapshot) -> SnapshotError {
    SnapshotError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

impl FromSnapshot for Snapshot {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        Ok(snapshot.clone())
    }
}

impl FromSnapshot for String {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", snapshot))
    }
}

impl FromSnapshot for f64 {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot.as_f64().ok_or_else(|| mismatch("number", snapshot))
    }
}

impl FromSnapshot for i64 {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot.as_i64().ok_or_else(|| mismatch("integer", snapshot))
    }
}

impl FromSnapshot for bool {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot.as_bool().ok_or_else(|| mismatch("boolean", snapshot))
    }
}

impl FromSnapshot for NamedSnapshot {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot
            .as_named_dict()
            .cloned()
            .ok_or_else(|| mismatch("named dict", snapshot))
    }
}

impl<T: FromSnapshot> FromSnapshot for Option<T> {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        match snapshot {
            Snapshot::Absent => Ok(None),
            other => T::from_snapshot(other).map(Some),
        }
    }
}

impl<T: FromSnapshot> FromSnapshot for Vec<T> {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot
            .as_list()
            .ok_or_else(|| mismatch("list", snapshot))?
            .iter()
            .map(T::from_snapshot)
            .collect()
    }
}

impl<T: FromSnapshot> FromSnapshot for IndexMap<String, T> {
    fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        snapshot
            .as_dict()
            .ok_or_else(|| mismatch("dict", snapshot))?
            .iter()
            .map(|(key, value)| Ok((key.clone(), T::from_snapshot(value)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use yaml_rust2::YamlLoader;

    fn raw(src: &str) -> Yaml {
        YamlLoader::load_from_str(src).unwrap().remove(0)
    }

    fn job_schema() -> SchemaNode {
        SchemaNode::named_dict()
            .field("company_name", SchemaNode::string())
            .field("position", SchemaNode::string().optional())
            .field("years", SchemaNode::integer().optional())
            .field("remote", SchemaNode::boolean().optional())
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_named_dict() {
        let snapshot = Snapshot::build(
            &raw("company_name: Super Traktor\nyears: 3\nremote: false"),
            &job_schema(),
        );
        let job = snapshot.as_named_dict().unwrap();

        assert_eq!(job.len(), 4);
        assert_eq!(
            job.names().collect::<Vec<_>>(),
            vec!["company_name", "position", "years", "remote"]
        );
        assert_eq!(job.get("company_name").unwrap().as_str(), Some("Super Traktor"));
        assert_eq!(job.get("years").unwrap().as_i64(), Some(3));
        assert!(job.get("position").unwrap().is_absent());
        assert!(job.get("salary").is_none());
    }

    #[test]
    fn test_absent_is_distinct_from_false() {
        let snapshot = Snapshot::build(&raw("company_name: X\nremote: false"), &job_schema());
        let job = snapshot.as_named_dict().unwrap();

        assert_eq!(job.value::<Option<bool>>("remote").unwrap(), Some(false));
        assert_eq!(job.value::<Option<i64>>("years").unwrap(), None);
        assert_ne!(job.get("remote"), job.get("years"));
    }

    #[test]
    fn test_typed_field_access() {
        let snapshot = Snapshot::build(&raw("company_name: X\nposition: CTO"), &job_schema());
        let job = snapshot.as_named_dict().unwrap();

        assert_eq!(job.value::<String>("position").unwrap(), "CTO");
        assert_eq!(
            job.value::<i64>("company_name"),
            Err(SnapshotError::TypeMismatch {
                expected: "integer",
                found: "string",
            })
        );
        assert_eq!(
            job.value::<String>("salary"),
            Err(SnapshotError::UnknownField {
                field: "salary".to_string()
            })
        );
        assert!(matches!(
            job.value::<String>("years"),
            Err(SnapshotError::TypeMismatch { found: "absent", .. })
        ));
    }

    #[test]
    fn test_list_and_dict() {
        let schema = SchemaNode::named_dict()
            .field("tags", SchemaNode::list(SchemaNode::string()))
            .field("scores", SchemaNode::dict(SchemaNode::number()))
            .build()
            .unwrap();
        let snapshot = Snapshot::build(
            &raw("tags: [a, b]\nscores:\n  math: 9.5\n  art: 7"),
            &schema,
        );
        let root = snapshot.as_named_dict().unwrap();

        assert_eq!(root.value::<Vec<String>>("tags").unwrap(), vec!["a", "b"]);
        let scores = root.value::<IndexMap<String, f64>>("scores").unwrap();
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["math", "art"]);
        assert_eq!(scores["art"], 7.0);
    }

    #[test]
    fn test_to_json_omits_absent_fields() {
        let snapshot = Snapshot::build(&raw("company_name: X\nyears: 2"), &job_schema());
        assert_eq!(
            snapshot.to_json(),
            serde_json::json!({ "company_name": "X", "years": 2 })
        );
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Job {
            company_name: String,
            position: Option<String>,
            years: Option<i64>,
        }

        let snapshot = Snapshot::build(&raw("company_name: X\nyears: 2"), &job_schema());
        let job: Job = snapshot.deserialize().unwrap();
        assert_eq!(
            job,
            Job {
                company_name: "X".to_string(),
                position: None,
                years: Some(2),
            }
        );
    }
}
