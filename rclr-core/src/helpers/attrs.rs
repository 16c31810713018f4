//! Attribute decoration.
//!
//! Any attribute name is accepted; nothing checks it against R's reserved names.

use crate::engine::Engine;
use crate::types::{Result, Sexp};

pub const CLASS: &str = "class";
pub const NAMES: &str = "names";
pub const UNITS: &str = "units";
pub const TZONE: &str = "tzone";

/// Build a character vector from `values` and attach it to `sexp` as `name`.
pub fn set_attribute<E, S>(engine: &mut E, sexp: Sexp, name: &str, values: &[S]) -> Result<()>
where
    E: Engine + ?Sized,
    S: AsRef<str>,
{
    let values: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
    let attr = engine.character_vector(&values)?;
    engine.set_attribute(sexp, name, attr)
}

pub fn set_class<E: Engine + ?Sized>(engine: &mut E, sexp: Sexp, classes: &[&str]) -> Result<()> {
    set_attribute(engine, sexp, CLASS, classes)
}

pub fn set_names<E, S>(engine: &mut E, sexp: Sexp, names: &[S]) -> Result<()>
where
    E: Engine + ?Sized,
    S: AsRef<str>,
{
    set_attribute(engine, sexp, NAMES, names)
}

pub fn set_units<E: Engine + ?Sized>(engine: &mut E, sexp: Sexp, units: &str) -> Result<()> {
    set_attribute(engine, sexp, UNITS, &[units])
}

pub fn set_tzone<E: Engine + ?Sized>(engine: &mut E, sexp: Sexp, tzone: &str) -> Result<()> {
    set_attribute(engine, sexp, TZONE, &[tzone])
}
