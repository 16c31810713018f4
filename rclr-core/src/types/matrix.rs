//! Rectangular two-dimensional host arrays.

/// A rectangular host matrix, stored row-major.
///
/// This is the host-side shape of a true 2-D array. R stores matrices
/// column-major; [`Matrix::to_column_major`] produces the interpreter layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Build a matrix from row-major data. Returns `None` if `data.len() != nrow * ncol`.
    pub fn new(nrow: usize, ncol: usize, data: Vec<T>) -> Option<Self> {
        if nrow.checked_mul(ncol)? != data.len() {
            return None;
        }
        Some(Self { nrow, ncol, data })
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.nrow || col >= self.ncol {
            return None;
        }
        self.data.get(row * self.ncol + col)
    }

    /// Row-major view of the elements.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.nrow {
            return None;
        }
        let start = row * self.ncol;
        Some(&self.data[start..start + self.ncol])
    }

    /// Element-wise conversion, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            nrow: self.nrow,
            ncol: self.ncol,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Matrix<T> {
    /// Copy the elements out in R's column-major order.
    pub fn to_column_major(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        for col in 0..self.ncol {
            for row in 0..self.nrow {
                out.push(self.data[row * self.ncol + col].clone());
            }
        }
        out
    }
}
