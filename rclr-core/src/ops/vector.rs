//! One-dimensional array converters.
//!
//! Every converter here (and in [`scalar`](super::scalar), which builds length-one
//! vectors through the same functions) declines when `convert_vectors` is off. The
//! timestamp and duration converters additionally decline when
//! `convert_value_types` is off.

use jiff::{SignedDuration, Timestamp};

use crate::converter::Converter;
use crate::engine::Engine;
use crate::helpers::{attrs, reshape, time};
use crate::ops::mismatch;
use crate::types::{HostValue, Result, Sexp, Vector};

pub(crate) fn numeric<E: Engine>(conv: &mut Converter<E>, values: &[f64]) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() {
        return Ok(None);
    }
    conv.engine_mut().numeric_vector(values).map(Some)
}

pub(crate) fn integer<E: Engine>(conv: &mut Converter<E>, values: &[i32]) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() {
        return Ok(None);
    }
    conv.engine_mut().integer_vector(values).map(Some)
}

pub(crate) fn character<E: Engine>(
    conv: &mut Converter<E>,
    values: &[String],
) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() {
        return Ok(None);
    }
    conv.engine_mut().character_vector(values).map(Some)
}

pub(crate) fn logical<E: Engine>(conv: &mut Converter<E>, values: &[bool]) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() {
        return Ok(None);
    }
    conv.engine_mut().logical_vector(values).map(Some)
}

/// Single precision is never sent as is: widen, then go through the double path.
pub(crate) fn single<E: Engine>(conv: &mut Converter<E>, values: &[f32]) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() {
        return Ok(None);
    }
    numeric(conv, &reshape::widen(values))
}

/// `POSIXct` in UTC: `class = c("POSIXct", "POSIXt")`, `tzone = "UTC"`.
pub(crate) fn timestamps<E: Engine>(
    conv: &mut Converter<E>,
    values: &[Timestamp],
) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() || !conv.convert_value_types() {
        return Ok(None);
    }
    let seconds: Vec<f64> = values.iter().copied().map(time::posixct_seconds).collect();
    let Some(sexp) = numeric(conv, &seconds)? else {
        return Ok(None);
    };
    attrs::set_class(conv.engine_mut(), sexp, &["POSIXct", "POSIXt"])?;
    attrs::set_tzone(conv.engine_mut(), sexp, "UTC")?;
    Ok(Some(sexp))
}

/// `difftime` in seconds: `class = "difftime"`, `units = "secs"`.
pub(crate) fn durations<E: Engine>(
    conv: &mut Converter<E>,
    values: &[SignedDuration],
) -> Result<Option<Sexp>> {
    if !conv.convert_vectors() || !conv.convert_value_types() {
        return Ok(None);
    }
    let seconds: Vec<f64> = values.iter().copied().map(time::difftime_seconds).collect();
    let Some(sexp) = numeric(conv, &seconds)? else {
        return Ok(None);
    };
    attrs::set_class(conv.engine_mut(), sexp, &["difftime"])?;
    attrs::set_units(conv.engine_mut(), sexp, "secs")?;
    Ok(Some(sexp))
}

pub fn convert_double<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Double(v)) => numeric(conv, v),
        other => Err(mismatch(other)),
    }
}

pub fn convert_single<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Single(v)) => single(conv, v),
        other => Err(mismatch(other)),
    }
}

pub fn convert_integer<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Integer(v)) => integer(conv, v),
        other => Err(mismatch(other)),
    }
}

pub fn convert_character<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Character(v)) => character(conv, v),
        other => Err(mismatch(other)),
    }
}

/// Not in the standard registry; see [`Registry::standard`](crate::Registry::standard).
pub fn convert_logical<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Logical(v)) => logical(conv, v),
        other => Err(mismatch(other)),
    }
}

pub fn convert_timestamp<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Timestamp(v)) => timestamps(conv, v),
        other => Err(mismatch(other)),
    }
}

pub fn convert_duration<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Vector(Vector::Duration(v)) => durations(conv, v),
        other => Err(mismatch(other)),
    }
}
