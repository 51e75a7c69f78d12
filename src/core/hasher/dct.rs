//! Two-dimensional DCT-II.
//!
//! ```text
//! C[x][y] = a(x) * a(y) * sum_i sum_j g[i][j] * cos((2i+1) x pi / 2N) * cos((2j+1) y pi / 2N)
//! a(0) = 1/sqrt(N),  a(k) = sqrt(2/N) otherwise
//! ```
//!
//! Two evaluations are provided. [`dct_2d_direct`] is the reference O(N^4)
//! double sum. [`dct_2d_separable`] runs the 1D transform over rows and then
//! columns with a precomputed cosine table, which is O(N^3) and agrees with
//! the direct sum up to floating-point rounding.

use super::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which DCT evaluation strategy a hasher uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DctMethod {
    /// Reference O(N^4) direct summation
    #[default]
    Direct,
    /// Row/column O(N^3) evaluation with a cosine table
    Separable,
}

impl DctMethod {
    /// Transform `grid` with this method
    pub fn transform(&self, grid: &Matrix) -> Matrix {
        match self {
            DctMethod::Direct => dct_2d_direct(grid),
            DctMethod::Separable => dct_2d_separable(grid),
        }
    }
}

impl std::fmt::Display for DctMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DctMethod::Direct => write!(f, "direct"),
            DctMethod::Separable => write!(f, "separable"),
        }
    }
}

/// Per-axis normalisation factors for an axis of length `n`.
///
/// Index 0 is used when that axis's frequency is zero, index 1 otherwise.
#[derive(Debug, Clone, Copy)]
struct AxisScale([f64; 2]);

impl AxisScale {
    fn new(n: usize) -> Self {
        let n = n as f64;
        Self([1.0 / n.sqrt(), (2.0 / n).sqrt()])
    }

    fn factor(&self, k: usize) -> f64 {
        if k == 0 {
            self.0[0]
        } else {
            self.0[1]
        }
    }
}

#[inline]
fn basis(sample: usize, frequency: usize, n: usize) -> f64 {
    (((2 * sample + 1) * frequency) as f64 * PI / (2 * n) as f64).cos()
}

/// Direct evaluation of the 2D DCT-II, one double sum per coefficient
pub fn dct_2d_direct(grid: &Matrix) -> Matrix {
    let n = grid.size();
    let scale = AxisScale::new(n);

    Matrix::from_fn(n, |x, y| {
        let mut sum = 0.0;
        for i in 0..n {
            for j in 0..n {
                sum += grid[(i, j)] * basis(i, x, n) * basis(j, y, n);
            }
        }
        sum * (scale.factor(x) * scale.factor(y))
    })
}

/// `table[k * n + i] = cos((2i+1) k pi / 2N)`
fn cosine_table(n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n * n);
    for k in 0..n {
        for i in 0..n {
            table.push(basis(i, k, n));
        }
    }
    table
}

/// Separable evaluation of the 2D DCT-II: transform along `y`, then along `x`
pub fn dct_2d_separable(grid: &Matrix) -> Matrix {
    let n = grid.size();
    let scale = AxisScale::new(n);
    let table = cosine_table(n);

    // partial[i][y] = sum_j g[i][j] * cos((2j+1) y pi / 2N)
    let partial = Matrix::from_fn(n, |i, y| {
        let row = &table[y * n..(y + 1) * n];
        (0..n).map(|j| grid[(i, j)] * row[j]).sum()
    });

    Matrix::from_fn(n, |x, y| {
        let row = &table[x * n..(x + 1) * n];
        let sum: f64 = (0..n).map(|i| partial[(i, y)] * row[i]).sum();
        sum * (scale.factor(x) * scale.factor(y))
    })
}
