//! Square `f64` matrix shared by every pipeline stage.
//!
//! Storage is packed with the first index outermost, so `(x, y)` lives at
//! `x * size + y` and iterating `data` visits cells x-outer, y-inner.

use std::ops::Index;

/// A dense `size x size` matrix of real values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix by evaluating `f(x, y)` for every cell
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(size * size);
        for x in 0..size {
            for y in 0..size {
                data.push(f(x, y));
            }
        }
        Self { size, data }
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cells in x-outer, y-inner order
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Copy of the top-left `size x size` corner.
    ///
    /// Callers must ensure `size <= self.size()`.
    pub(crate) fn top_left(&self, size: usize) -> Self {
        Self::from_fn(size, |x, y| self[(x, y)])
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (x, y): (usize, usize)) -> &f64 {
        &self.data[x * self.size + y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_is_x_outer() {
        let matrix = Matrix::from_fn(2, |x, y| (x * 10 + y) as f64);
        assert_eq!(matrix.values(), &[0.0, 1.0, 10.0, 11.0]);
        assert_eq!(matrix[(1, 0)], 10.0);
    }

    #[test]
    fn top_left_truncates() {
        let matrix = Matrix::from_fn(4, |x, y| (x * 4 + y) as f64);
        let corner = matrix.top_left(2);

        assert_eq!(corner.size(), 2);
        assert_eq!(corner.values(), &[0.0, 1.0, 4.0, 5.0]);
    }
}
