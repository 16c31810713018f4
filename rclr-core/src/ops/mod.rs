//! The converters, one module per value shape, and the registry that maps exact
//! host types to them.

use crate::types::{ConvertError, HostValue};

pub mod collection;
pub mod list;
pub mod matrix;
pub mod registry;
pub mod scalar;
pub mod vector;

/// A converter was handed a value of a shape it was not registered for.
pub(crate) fn mismatch(value: &HostValue) -> ConvertError {
    ConvertError::unsupported(value.type_name())
}
