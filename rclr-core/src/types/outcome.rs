//! Conversion outcome types.

use crate::types::sexp::{Sexp, SexpPtr};
use crate::types::value::HostValue;

/// Outcome of dispatching one value through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A converter produced a handle.
    Converted(Sexp),
    /// A converter exists but a feature flag switched it off.
    Declined,
    /// No converter is registered for the exact type.
    NoConverter,
}

impl Outcome {
    pub fn converted(self) -> Option<Sexp> {
        match self {
            Outcome::Converted(sexp) => Some(sexp),
            Outcome::Declined | Outcome::NoConverter => None,
        }
    }
}

/// Result of a top-level [`Converter::convert_to_r`](crate::Converter::convert_to_r) call.
///
/// Callers tell "converted" from "returned unchanged" by matching on this.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// The input was null; nothing to do.
    Null,
    /// Pointer to hand to the interpreter.
    Foreign(SexpPtr),
    /// No known conversion; the original value, untouched.
    Unchanged(HostValue),
}

impl Conversion {
    pub fn is_foreign(&self) -> bool {
        matches!(self, Conversion::Foreign(_))
    }

    pub fn foreign_ptr(&self) -> Option<SexpPtr> {
        match self {
            Conversion::Foreign(ptr) => Some(*ptr),
            Conversion::Null | Conversion::Unchanged(_) => None,
        }
    }

    pub fn into_unchanged(self) -> Option<HostValue> {
        match self {
            Conversion::Unchanged(value) => Some(value),
            Conversion::Null | Conversion::Foreign(_) => None,
        }
    }
}
