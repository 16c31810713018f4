//! Rectangular and jagged matrix converters.
//!
//! Matrices are not gated by the feature flags. A jagged array whose rows all
//! have the same length is promoted to a matrix; a ragged one degrades to a list
//! of vectors, each converted through the strict path.

use crate::converter::Converter;
use crate::engine::Engine;
use crate::helpers::reshape;
use crate::ops::{list, mismatch};
use crate::types::{HostValue, Jagged, Matrix, MatrixValue, Result, Sexp, Vector};

fn numeric<E: Engine>(conv: &mut Converter<E>, matrix: &Matrix<f64>) -> Result<Option<Sexp>> {
    conv.engine_mut().numeric_matrix(matrix).map(Some)
}

fn integer<E: Engine>(conv: &mut Converter<E>, matrix: &Matrix<i32>) -> Result<Option<Sexp>> {
    conv.engine_mut().integer_matrix(matrix).map(Some)
}

fn character<E: Engine>(conv: &mut Converter<E>, matrix: &Matrix<String>) -> Result<Option<Sexp>> {
    conv.engine_mut().character_matrix(matrix).map(Some)
}

/// Matrix if rectangular, list of row vectors otherwise.
fn jagged<E, T>(
    conv: &mut Converter<E>,
    rows: &[Vec<T>],
    rect: fn(&mut Converter<E>, &Matrix<T>) -> Result<Option<Sexp>>,
    row: fn(Vec<T>) -> Vector,
) -> Result<Option<Sexp>>
where
    E: Engine,
    T: Clone,
{
    match reshape::to_rect(rows) {
        Some(matrix) => rect(conv, &matrix),
        None => {
            log::debug!("jagged array with {} ragged rows becomes a list", rows.len());
            let items = rows.iter().map(|r| HostValue::Vector(row(r.clone())));
            list::convert_all(conv, items).map(Some)
        }
    }
}

pub fn convert_double<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Matrix(MatrixValue::Double(m)) => numeric(conv, m),
        other => Err(mismatch(other)),
    }
}

pub fn convert_single<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Matrix(MatrixValue::Single(m)) => numeric(conv, &reshape::widen_matrix(m)),
        other => Err(mismatch(other)),
    }
}

pub fn convert_integer<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Matrix(MatrixValue::Integer(m)) => integer(conv, m),
        other => Err(mismatch(other)),
    }
}

pub fn convert_character<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Matrix(MatrixValue::Character(m)) => character(conv, m),
        other => Err(mismatch(other)),
    }
}

pub fn convert_jagged_double<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Jagged(Jagged::Double(rows)) => jagged(conv, rows, numeric, Vector::Double),
        other => Err(mismatch(other)),
    }
}

/// Widened before the rectangularity test, so ragged rows become double vectors.
pub fn convert_jagged_single<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Jagged(Jagged::Single(rows)) => {
            jagged(conv, &reshape::widen_rows(rows), numeric, Vector::Double)
        }
        other => Err(mismatch(other)),
    }
}

pub fn convert_jagged_integer<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Jagged(Jagged::Integer(rows)) => jagged(conv, rows, integer, Vector::Integer),
        other => Err(mismatch(other)),
    }
}

pub fn convert_jagged_character<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    match value {
        HostValue::Jagged(Jagged::Character(rows)) => {
            jagged(conv, rows, character, Vector::Character)
        }
        other => Err(mismatch(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SexpKind;
    use crate::MemoryEngine;

    fn converter() -> Converter<MemoryEngine> {
        Converter::new(MemoryEngine::new())
    }

    #[test]
    fn jagged_rectangular_equals_prebuilt_matrix() {
        let mut conv = converter();
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let prebuilt = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        let a = convert_jagged_double(&mut conv, &HostValue::from(rows))
            .unwrap()
            .unwrap();
        let b = convert_double(&mut conv, &HostValue::from(prebuilt))
            .unwrap()
            .unwrap();

        let engine = conv.engine();
        assert_eq!(a.kind(), SexpKind::NumericMatrix);
        assert_eq!(engine.dim(a.ptr()), Some((2, 3)));
        assert_eq!(engine.as_real(a.ptr()).unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(engine.dim(a.ptr()), engine.dim(b.ptr()));
        assert_eq!(engine.as_real(a.ptr()), engine.as_real(b.ptr()));
    }

    #[test]
    fn ragged_integers_become_a_list() {
        let mut conv = converter();
        let value = HostValue::from(vec![vec![1, 2], vec![3]]);
        let sexp = convert_jagged_integer(&mut conv, &value).unwrap().unwrap();
        assert_eq!(sexp.kind(), SexpKind::List);

        let engine = conv.engine();
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(engine.as_integer(elements[0]).unwrap(), &[1, 2]);
        assert_eq!(engine.as_integer(elements[1]).unwrap(), &[3]);
    }

    #[test]
    fn single_matrix_is_widened() {
        let mut conv = converter();
        let m = Matrix::new(1, 2, vec![0.5f32, 0.1]).unwrap();
        let sexp = convert_single(&mut conv, &HostValue::from(m)).unwrap().unwrap();
        assert_eq!(sexp.kind(), SexpKind::NumericMatrix);
        assert_eq!(
            conv.engine().as_real(sexp.ptr()).unwrap(),
            &[0.5, f64::from(0.1f32)]
        );
    }

    #[test]
    fn ragged_singles_become_double_vectors() {
        let mut conv = converter();
        let value = HostValue::from(vec![vec![1.5f32], vec![2.5, 3.5]]);
        let sexp = convert_jagged_single(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.as_real(elements[1]).unwrap(), &[2.5, 3.5]);
    }

    #[test]
    fn character_matrices() {
        let mut conv = converter();
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        let sexp = convert_jagged_character(&mut conv, &HostValue::from(rows))
            .unwrap()
            .unwrap();
        assert_eq!(sexp.kind(), SexpKind::CharacterMatrix);
        assert_eq!(conv.engine().as_character(sexp.ptr()).unwrap(), &["a", "c", "b", "d"]);
    }

    #[test]
    fn empty_jagged_is_an_empty_matrix() {
        let mut conv = converter();
        let sexp = convert_jagged_double(&mut conv, &HostValue::from(Vec::<Vec<f64>>::new()))
            .unwrap()
            .unwrap();
        assert_eq!(conv.engine().dim(sexp.ptr()), Some((0, 0)));
    }

    #[test]
    fn matrices_ignore_the_vectors_flag() {
        let mut conv = converter();
        conv.set_convert_vectors(false);
        let value = HostValue::from(vec![vec![1, 2], vec![3, 4]]);
        assert!(convert_jagged_integer(&mut conv, &value).unwrap().is_some());
    }

    #[test]
    fn ragged_rows_fail_when_vectors_are_off() {
        let mut conv = converter();
        conv.set_convert_vectors(false);
        let value = HostValue::from(vec![vec![1, 2], vec![3]]);
        let err = convert_jagged_integer(&mut conv, &value).unwrap_err();
        assert_eq!(err.error_type(), "unsupported_type");
    }
}
