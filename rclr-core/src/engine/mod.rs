//! The binding to the R interpreter.
//!
//! Converters never touch interpreter memory directly; they ask an [`Engine`] to
//! build vectors, matrices and lists and to attach attributes. The binding is
//! trusted: it does not re-validate shapes the converters already checked.
//!
//! R supports one live interpreter per process. Engines are therefore created
//! once and injected into a [`Converter`](crate::Converter); see
//! [`Session`](crate::Session) for the process-wide guard.

use crate::types::{Matrix, Result, Sexp};

pub mod memory;

pub trait Engine {
    /// `REALSXP` of the given values.
    fn numeric_vector(&mut self, values: &[f64]) -> Result<Sexp>;

    /// `INTSXP` of the given values.
    fn integer_vector(&mut self, values: &[i32]) -> Result<Sexp>;

    /// `STRSXP` of the given values.
    fn character_vector(&mut self, values: &[String]) -> Result<Sexp>;

    /// `LGLSXP` of the given values.
    fn logical_vector(&mut self, values: &[bool]) -> Result<Sexp>;

    /// Numeric matrix with a `dim` attribute. Storage is column-major.
    fn numeric_matrix(&mut self, matrix: &Matrix<f64>) -> Result<Sexp>;

    /// Integer matrix with a `dim` attribute. Storage is column-major.
    fn integer_matrix(&mut self, matrix: &Matrix<i32>) -> Result<Sexp>;

    /// Character matrix with a `dim` attribute. Storage is column-major.
    fn character_matrix(&mut self, matrix: &Matrix<String>) -> Result<Sexp>;

    /// `VECSXP` holding the given elements in order.
    fn generic_vector(&mut self, elements: &[Sexp]) -> Result<Sexp>;

    /// `as.list()`: one element per value, `names` carried over. Elements of a
    /// classed vector keep its class and the attributes that go with it.
    fn coerce_to_list(&mut self, sexp: Sexp) -> Result<Sexp>;

    /// Attach `value` to `target` under `name`, replacing any previous value.
    fn set_attribute(&mut self, target: Sexp, name: &str, value: Sexp) -> Result<()>;

    /// Protect `sexp` from collection until a matching [`release`](Engine::release).
    /// Calls nest.
    fn preserve(&mut self, sexp: Sexp);

    /// Undo one [`preserve`](Engine::preserve).
    fn release(&mut self, sexp: Sexp);
}
