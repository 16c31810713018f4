//! Scalar converters. R has no scalars, so each produces a length-one vector.

use std::slice;

use crate::converter::Converter;
use crate::engine::Engine;
use crate::ops::{mismatch, vector};
use crate::types::{HostValue, Result, Scalar, Sexp};

pub fn convert_double<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Double(x)) => vector::numeric(conv, slice::from_ref(x)),
        other => Err(mismatch(other)),
    }
}

pub fn convert_single<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Single(x)) => vector::single(conv, slice::from_ref(x)),
        other => Err(mismatch(other)),
    }
}

pub fn convert_integer<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Integer(x)) => vector::integer(conv, slice::from_ref(x)),
        other => Err(mismatch(other)),
    }
}

pub fn convert_character<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Character(s)) => vector::character(conv, slice::from_ref(s)),
        other => Err(mismatch(other)),
    }
}

/// Not in the standard registry; see [`Registry::standard`](crate::Registry::standard).
pub fn convert_logical<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Logical(b)) => vector::logical(conv, slice::from_ref(b)),
        other => Err(mismatch(other)),
    }
}

pub fn convert_timestamp<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Timestamp(ts)) => vector::timestamps(conv, slice::from_ref(ts)),
        other => Err(mismatch(other)),
    }
}

pub fn convert_duration<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Scalar(Scalar::Duration(d)) => vector::durations(conv, slice::from_ref(d)),
        other => Err(mismatch(other)),
    }
}
