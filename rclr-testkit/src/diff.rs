//! Snapshot diffing utilities.

use std::collections::BTreeSet;

use rclr_core::SexpKind;

use crate::snapshot::{SexpSnapshot, SnapshotValues};

/// Difference between two value snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDiff {
    /// List of mismatches found.
    pub mismatches: Vec<Mismatch>,
}

/// A mismatch between expected and actual state.
///
/// `path` locates the value inside the tree: `$` is the root, `$[[2]]` its second
/// list element, `$@names` its `names` attribute.
#[derive(Debug, Clone)]
pub enum Mismatch {
    /// Type tags differ.
    KindMismatch {
        path: String,
        expected: SexpKind,
        actual: SexpKind,
    },

    /// Payload lengths differ.
    LengthMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },

    /// Same length, different payload.
    ValueMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Attribute expected but not found.
    MissingAttribute { path: String, name: String },

    /// Attribute found but not expected.
    ExtraAttribute { path: String, name: String },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::KindMismatch { path, expected, actual } => {
                write!(f, "Kind mismatch at {}: expected {:?}, got {:?}", path, expected, actual)
            }
            Mismatch::LengthMismatch { path, expected, actual } => {
                write!(f, "Length mismatch at {}: expected {}, got {}", path, expected, actual)
            }
            Mismatch::ValueMismatch { path, expected, actual } => {
                write!(f, "Values differ at {}: expected {}, got {}", path, expected, actual)
            }
            Mismatch::MissingAttribute { path, name } => {
                write!(f, "Missing attribute {} at {}", name, path)
            }
            Mismatch::ExtraAttribute { path, name } => {
                write!(f, "Unexpected attribute {} at {}", name, path)
            }
        }
    }
}

impl SnapshotDiff {
    /// Compare two snapshots.
    pub fn compare(expected: &SexpSnapshot, actual: &SexpSnapshot) -> Self {
        let mut mismatches = Vec::new();
        compare_at("$", expected, actual, &mut mismatches);
        Self { mismatches }
    }

    /// Check if there are no mismatches.
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Get the number of mismatches.
    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    /// Format the diff as a human-readable report.
    pub fn report(&self) -> String {
        if self.is_empty() {
            return "No differences found.".to_string();
        }

        let mut lines = vec![format!("Found {} differences:", self.mismatches.len())];
        for m in &self.mismatches {
            lines.push(format!("  - {}", m));
        }
        lines.join("\n")
    }
}

fn compare_at(path: &str, expected: &SexpSnapshot, actual: &SexpSnapshot, out: &mut Vec<Mismatch>) {
    if expected.kind != actual.kind {
        out.push(Mismatch::KindMismatch {
            path: path.to_string(),
            expected: expected.kind,
            actual: actual.kind,
        });
    }

    compare_values(path, &expected.values, &actual.values, out);

    // Compare attributes
    let expected_names: BTreeSet<_> = expected.attributes.keys().collect();
    let actual_names: BTreeSet<_> = actual.attributes.keys().collect();

    for name in expected_names.difference(&actual_names) {
        out.push(Mismatch::MissingAttribute {
            path: path.to_string(),
            name: (*name).clone(),
        });
    }
    for name in actual_names.difference(&expected_names) {
        out.push(Mismatch::ExtraAttribute {
            path: path.to_string(),
            name: (*name).clone(),
        });
    }
    for name in expected_names.intersection(&actual_names) {
        compare_at(
            &format!("{path}@{name}"),
            &expected.attributes[*name],
            &actual.attributes[*name],
            out,
        );
    }
}

fn compare_values(
    path: &str,
    expected: &SnapshotValues,
    actual: &SnapshotValues,
    out: &mut Vec<Mismatch>,
) {
    if expected.len() != actual.len() {
        out.push(Mismatch::LengthMismatch {
            path: path.to_string(),
            expected: expected.len(),
            actual: actual.len(),
        });
        return;
    }

    match (expected, actual) {
        (SnapshotValues::List(exp), SnapshotValues::List(act)) => {
            for (i, (e, a)) in exp.iter().zip(act).enumerate() {
                compare_at(&format!("{path}[[{}]]", i + 1), e, a, out);
            }
        }
        (exp, act) if exp != act => out.push(Mismatch::ValueMismatch {
            path: path.to_string(),
            expected: render(exp),
            actual: render(act),
        }),
        _ => {}
    }
}

fn render(values: &SnapshotValues) -> String {
    match values {
        SnapshotValues::Logical(v) => format!("{v:?}"),
        SnapshotValues::Integer(v) => format!("{v:?}"),
        SnapshotValues::Real(v) => format!("{v:?}"),
        SnapshotValues::Character(v) => format!("{v:?}"),
        SnapshotValues::List(v) => format!("list of {}", v.len()),
    }
}
