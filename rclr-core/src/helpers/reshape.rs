//! Jagged-to-rectangular reshaping and precision widening.

use crate::types::Matrix;

/// True when every row has the same length. Zero rows count as rectangular.
pub fn is_rectangular<T>(rows: &[Vec<T>]) -> bool {
    match rows.first() {
        None => true,
        Some(first) => rows.iter().all(|r| r.len() == first.len()),
    }
}

/// Copy a jagged array into a matrix. `None` if the rows are ragged.
pub fn to_rect<T: Clone>(rows: &[Vec<T>]) -> Option<Matrix<T>> {
    if !is_rectangular(rows) {
        return None;
    }
    let ncol = rows.first().map_or(0, Vec::len);
    let data = rows.iter().flatten().cloned().collect();
    Matrix::new(rows.len(), ncol, data)
}

pub fn widen(values: &[f32]) -> Vec<f64> {
    values.iter().copied().map(f64::from).collect()
}

pub fn widen_rows(rows: &[Vec<f32>]) -> Vec<Vec<f64>> {
    rows.iter().map(|r| widen(r)).collect()
}

pub fn widen_matrix(matrix: &Matrix<f32>) -> Matrix<f64> {
    matrix.map(|x| f64::from(*x))
}
