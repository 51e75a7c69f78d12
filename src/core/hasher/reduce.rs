//! Coefficient reduction and binarisation.
//!
//! The top-left `M x M` corner of the coefficient matrix holds the low
//! frequencies. Each of its cells becomes one bit: `1` if the cell is
//! strictly greater than the mean of the corner, where the mean leaves out
//! the DC term `(0, 0)`.

use super::hash::PerceptualHash;
use super::matrix::Matrix;
use crate::error::HashError;

/// Relative band around the mean, scaled by `|DC|`, inside which a cell is a tie.
///
/// Coefficients that are zero in exact arithmetic come out of the transform
/// as rounding noise many orders of magnitude below this band. Ties map to `0`.
///
/// This differs from a plain `cell > mean` only for matrices whose AC terms
/// are all near zero (uniform or near-uniform images). There a plain
/// comparison binarises rounding noise, so hashes of such images will not
/// match implementations that use one.
pub const TIE_TOLERANCE: f64 = 1e-12;

/// Keep rows and columns `[0, size)` of `coefficients`
pub fn reduce(coefficients: &Matrix, size: usize) -> Result<Matrix, HashError> {
    if size > coefficients.size() {
        return Err(HashError::InvalidReduction {
            reduced: size as u32,
            grid: coefficients.size() as u32,
        });
    }

    Ok(coefficients.top_left(size))
}

/// Mean of every cell except `(0, 0)`.
///
/// Requires at least two cells.
pub fn mean_excluding_dc(reduced: &Matrix) -> f64 {
    let cells = reduced.values();
    debug_assert!(cells.len() > 1);

    let total: f64 = cells.iter().skip(1).sum();
    total / (cells.len() - 1) as f64
}

/// Binarise `reduced` against its DC-excluded mean, x-outer, y-inner
pub fn build_hash(reduced: &Matrix) -> PerceptualHash {
    let mean = mean_excluding_dc(reduced);
    let tolerance = TIE_TOLERANCE * reduced[(0, 0)].abs();

    tracing::trace!(mean, tolerance, "binarising reduced coefficients");

    PerceptualHash::from_bits(reduced.values().iter().map(|&cell| cell - mean > tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_takes_top_left() {
        let coefficients = Matrix::from_fn(32, |x, y| (x * 100 + y) as f64);
        let reduced = reduce(&coefficients, 8).unwrap();

        assert_eq!(reduced.size(), 8);
        assert_eq!(reduced[(7, 7)], 707.0);
        assert_eq!(reduced[(0, 3)], 3.0);
    }

    #[test]
    fn reduce_to_same_size_is_identity() {
        let coefficients = Matrix::from_fn(4, |x, y| (x + y) as f64);
        assert_eq!(reduce(&coefficients, 4).unwrap(), coefficients);
    }

    #[test]
    fn reduce_rejects_larger_target() {
        let coefficients = Matrix::from_fn(8, |_, _| 0.0);
        let result = reduce(&coefficients, 9);

        assert!(matches!(
            result,
            Err(HashError::InvalidReduction { reduced: 9, grid: 8 })
        ));
    }

    #[test]
    fn mean_excludes_dc_term() {
        let reduced = Matrix::from_fn(8, |x, y| if x == 0 && y == 0 { 9000.0 } else { 2.5 });
        assert_eq!(mean_excluding_dc(&reduced), 2.5);
    }

    #[test]
    fn mean_of_two_by_two() {
        let reduced = Matrix::from_fn(2, |x, y| (x * 2 + y) as f64);
        // (1 + 2 + 3) / 3
        assert_eq!(mean_excluding_dc(&reduced), 2.0);
    }

    #[test]
    fn bits_follow_strict_greater_than() {
        // values 0..16, DC excluded mean = (1 + ... + 15) / 15 = 8
        let reduced = Matrix::from_fn(4, |x, y| (x * 4 + y) as f64);
        let hash = build_hash(&reduced);

        assert_eq!(hash.to_string(), "0000000001111111");
    }

    #[test]
    fn equal_to_mean_maps_to_zero() {
        let reduced = Matrix::from_fn(2, |_, _| 5.0);
        assert_eq!(build_hash(&reduced).to_string(), "0000");
    }

    #[test]
    fn rounding_noise_is_a_tie() {
        let reduced = Matrix::from_fn(3, |x, y| match (x, y) {
            (0, 0) => 1.0e6,
            (1, 1) => 3.0e-10,
            _ => -2.0e-10,
        });
        // only the DC term clears the band
        assert_eq!(build_hash(&reduced).to_string(), "100000000");
    }

    #[test]
    fn tolerance_only_affects_near_zero_ac_terms() {
        let reduced = Matrix::from_fn(8, |x, y| ((x * 7 + y * 13) % 11) as f64 - 5.0 + 0.25);
        let mean = mean_excluding_dc(&reduced);
        let plain: String = reduced
            .values()
            .iter()
            .map(|&cell| if cell > mean { '1' } else { '0' })
            .collect();

        assert_eq!(build_hash(&reduced).to_string(), plain);
    }

    #[test]
    fn first_bit_is_dc() {
        let reduced = Matrix::from_fn(2, |x, y| if x == 0 && y == 0 { 100.0 } else { 1.0 });
        assert_eq!(build_hash(&reduced).to_string(), "1000");
    }
}
