//! Read-back of converted values for comparison.

use rclr_core::{MemoryEngine, SexpData, SexpKind, SexpPtr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A snapshot of a value tree inside a [`MemoryEngine`].
///
/// Captures:
/// - The value's type tag
/// - Its payload (list elements recursively)
/// - Its attributes (recursively, sorted by name)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SexpSnapshot {
    /// Type tag of the value.
    pub kind: SexpKind,

    /// Payload.
    pub values: SnapshotValues,

    /// Attributes: name -> value snapshot.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, SexpSnapshot>,
}

/// Payload of a snapshotted value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SnapshotValues {
    Logical(Vec<bool>),
    Integer(Vec<i32>),
    Real(Vec<f64>),
    Character(Vec<String>),
    List(Vec<SexpSnapshot>),
}

impl SnapshotValues {
    pub fn len(&self) -> usize {
        match self {
            SnapshotValues::Logical(v) => v.len(),
            SnapshotValues::Integer(v) => v.len(),
            SnapshotValues::Real(v) => v.len(),
            SnapshotValues::Character(v) => v.len(),
            SnapshotValues::List(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl SexpSnapshot {
    /// Capture the value at `ptr` and everything it references.
    pub fn capture(engine: &MemoryEngine, ptr: SexpPtr) -> Result<Self, SnapshotError> {
        let object = engine.get(ptr).ok_or(SnapshotError::Dangling(ptr))?;

        let values = match object.data() {
            SexpData::Logical(v) => SnapshotValues::Logical(v.clone()),
            SexpData::Integer(v) => SnapshotValues::Integer(v.clone()),
            SexpData::Real(v) => SnapshotValues::Real(v.clone()),
            SexpData::Character(v) => SnapshotValues::Character(v.clone()),
            SexpData::List(children) => SnapshotValues::List(
                children
                    .iter()
                    .map(|child| Self::capture(engine, *child))
                    .collect::<Result<_, _>>()?,
            ),
        };

        let mut attributes = BTreeMap::new();
        for (name, attr) in object.attributes() {
            attributes.insert(name.clone(), Self::capture(engine, *attr)?);
        }

        Ok(Self {
            kind: object.kind(),
            values,
            attributes,
        })
    }

    fn plain(kind: SexpKind, values: SnapshotValues) -> Self {
        Self {
            kind,
            values,
            attributes: BTreeMap::new(),
        }
    }

    pub fn numeric(values: &[f64]) -> Self {
        Self::plain(SexpKind::Numeric, SnapshotValues::Real(values.to_vec()))
    }

    pub fn integer(values: &[i32]) -> Self {
        Self::plain(SexpKind::Integer, SnapshotValues::Integer(values.to_vec()))
    }

    pub fn character(values: &[&str]) -> Self {
        Self::plain(SexpKind::Character, SnapshotValues::Character(strings(values)))
    }

    pub fn logical(values: &[bool]) -> Self {
        Self::plain(SexpKind::Logical, SnapshotValues::Logical(values.to_vec()))
    }

    pub fn list(elements: Vec<SexpSnapshot>) -> Self {
        Self::plain(SexpKind::List, SnapshotValues::List(elements))
    }

    /// Numeric matrix from column-major `values`.
    pub fn numeric_matrix(nrow: i32, ncol: i32, values: &[f64]) -> Self {
        Self::plain(SexpKind::NumericMatrix, SnapshotValues::Real(values.to_vec()))
            .with_attribute("dim", Self::integer(&[nrow, ncol]))
    }

    /// Integer matrix from column-major `values`.
    pub fn integer_matrix(nrow: i32, ncol: i32, values: &[i32]) -> Self {
        Self::plain(SexpKind::IntegerMatrix, SnapshotValues::Integer(values.to_vec()))
            .with_attribute("dim", Self::integer(&[nrow, ncol]))
    }

    /// Character matrix from column-major `values`.
    pub fn character_matrix(nrow: i32, ncol: i32, values: &[&str]) -> Self {
        Self::plain(SexpKind::CharacterMatrix, SnapshotValues::Character(strings(values)))
            .with_attribute("dim", Self::integer(&[nrow, ncol]))
    }

    pub fn with_attribute(mut self, name: &str, value: SexpSnapshot) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn with_names(self, names: &[&str]) -> Self {
        self.with_attribute("names", Self::character(names))
    }

    pub fn with_class(self, classes: &[&str]) -> Self {
        self.with_attribute("class", Self::character(classes))
    }

    /// `POSIXct` decoration as produced for timestamps.
    pub fn posixct(seconds: &[f64]) -> Self {
        Self::numeric(seconds)
            .with_class(&["POSIXct", "POSIXt"])
            .with_attribute("tzone", Self::character(&["UTC"]))
    }

    /// `difftime` decoration as produced for durations.
    pub fn difftime(seconds: &[f64]) -> Self {
        Self::numeric(seconds)
            .with_class(&["difftime"])
            .with_attribute("units", Self::character(&["secs"]))
    }

    /// Get an attribute snapshot by name.
    pub fn attribute(&self, name: &str) -> Option<&SexpSnapshot> {
        self.attributes.get(name)
    }

    /// Get the `names` attribute as strings.
    pub fn names(&self) -> Option<&[String]> {
        match &self.attribute("names")?.values {
            SnapshotValues::Character(v) => Some(v),
            _ => None,
        }
    }

    /// Number of elements in the payload.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pretty JSON, for failure reports.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

/// Error type for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The handle does not refer to a live value.
    #[error("dangling handle {0}")]
    Dangling(SexpPtr),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rclr_core::{Converter, Engine, HostValue};

    #[test]
    fn test_capture_vector() {
        let mut engine = MemoryEngine::new();
        let sexp = engine.numeric_vector(&[1.0, 2.0]).unwrap();

        let snapshot = SexpSnapshot::capture(&engine, sexp.ptr()).unwrap();
        assert_eq!(snapshot, SexpSnapshot::numeric(&[1.0, 2.0]));
        assert!(snapshot.attributes.is_empty());
    }

    #[test]
    fn test_capture_named_list() {
        let mut conv = Converter::new(MemoryEngine::new());
        let ptr = conv
            .convert_to_r(HostValue::List(vec![HostValue::from(1), HostValue::from("x")]))
            .unwrap()
            .foreign_ptr()
            .unwrap();

        let snapshot = SexpSnapshot::capture(conv.engine(), ptr).unwrap();
        assert_eq!(snapshot.kind, SexpKind::List);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot,
            SexpSnapshot::list(vec![SexpSnapshot::integer(&[1]), SexpSnapshot::character(&["x"])])
        );
    }

    #[test]
    fn test_dangling_handle() {
        let mut engine = MemoryEngine::new();
        let sexp = engine.integer_vector(&[1]).unwrap();
        engine.collect_garbage();

        let err = SexpSnapshot::capture(&engine, sexp.ptr()).unwrap_err();
        assert!(matches!(err, SnapshotError::Dangling(p) if p == sexp.ptr()));
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&SexpSnapshot::difftime(&[90.0]).to_json()).unwrap();
        assert_eq!(json["kind"], "numeric");
        assert_eq!(json["values"]["type"], "real");
        assert_eq!(json["values"]["data"][0], 90.0);
        assert_eq!(json["attributes"]["units"]["values"]["data"][0], "secs");
    }
}
