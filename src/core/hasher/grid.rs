//! Sample grid extraction.
//!
//! Reads an already scaled, single-channel image into the `N x N` matrix
//! the DCT consumes. Nothing here resamples or converts colour: an image
//! that is not exactly `N x N` is rejected.

use super::matrix::Matrix;
use crate::error::HashError;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use serde::{Deserialize, Serialize};

/// A single-channel pixel source addressable by integer coordinates
pub trait SampleSource {
    /// `(width, height)` of the source
    fn dimensions(&self) -> (u32, u32);

    /// Intensity of the pixel at column `x`, row `y`
    fn intensity(&self, x: u32, y: u32) -> f64;
}

/// 8-bit samples are widened to 16 bits (`v * 0x101`) so that 8-bit and
/// 16-bit sources land on the same intensity scale.
impl SampleSource for GrayImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn intensity(&self, x: u32, y: u32) -> f64 {
        f64::from(widen(self.get_pixel(x, y)[0]))
    }
}

impl SampleSource for ImageBuffer<Luma<u16>, Vec<u16>> {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn intensity(&self, x: u32, y: u32) -> f64 {
        f64::from(self.get_pixel(x, y)[0])
    }
}

fn widen(value: u8) -> u16 {
    u16::from(value) * 0x101
}

/// Which channel of a colour image supplies the intensity.
///
/// The choice changes hash values (not hash quality), so it must be used
/// uniformly across every hash that will be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleChannel {
    /// Luminance as computed by the `image` crate. For gray input this is the pixel itself.
    #[default]
    Luma,
    /// The blue channel of the RGBA pixel.
    Blue,
}

impl SampleChannel {
    /// Collapse `image` to one channel under this policy
    pub fn extract(&self, image: &DynamicImage) -> GrayImage {
        match self {
            SampleChannel::Luma => match image.as_luma8() {
                Some(gray) => gray.clone(),
                None => image.to_luma8(),
            },
            SampleChannel::Blue => {
                let rgba = image.to_rgba8();
                GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                    Luma([rgba.get_pixel(x, y)[2]])
                })
            }
        }
    }
}

impl std::fmt::Display for SampleChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleChannel::Luma => write!(f, "luma"),
            SampleChannel::Blue => write!(f, "blue"),
        }
    }
}

/// The `N x N` intensity matrix of one image.
///
/// Cell `(x, y)` holds the pixel at column `x`, row `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    matrix: Matrix,
}

impl SampleGrid {
    /// Read `source` into a grid, requiring it to be exactly `size x size`
    pub fn extract<S>(source: &S, size: u32) -> Result<Self, HashError>
    where
        S: SampleSource + ?Sized,
    {
        let (width, height) = source.dimensions();
        if width != size || height != size {
            return Err(HashError::DimensionMismatch {
                expected: size,
                width,
                height,
            });
        }

        let matrix = Matrix::from_fn(size as usize, |x, y| {
            source.intensity(x as u32, y as u32)
        });

        Ok(Self { matrix })
    }

    /// Build a grid directly from intensities, `f(x, y)` per cell
    pub fn from_fn<F>(size: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self {
            matrix: Matrix::from_fn(size, f),
        }
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// The underlying matrix
    pub fn as_matrix(&self) -> &Matrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn extract_reads_column_major_coordinates() {
        // Pixel (x=1, y=0) is the only bright one
        let image = GrayImage::from_fn(2, 2, |x, y| Luma([if x == 1 && y == 0 { 1 } else { 0 }]));
        let grid = SampleGrid::extract(&image, 2).unwrap();

        assert_eq!(grid.as_matrix()[(1, 0)], 257.0);
        assert_eq!(grid.as_matrix()[(0, 1)], 0.0);
    }

    #[test]
    fn extract_widens_eight_bit_samples() {
        let image = GrayImage::from_pixel(4, 4, Luma([255]));
        let grid = SampleGrid::extract(&image, 4).unwrap();

        assert!(grid.as_matrix().values().iter().all(|&v| v == 65535.0));
    }

    #[test]
    fn extract_reads_sixteen_bit_samples_as_is() {
        let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(4, 4, Luma([1234]));
        let grid = SampleGrid::extract(&image, 4).unwrap();

        assert_eq!(grid.as_matrix()[(3, 3)], 1234.0);
    }

    #[test]
    fn extract_rejects_wrong_size() {
        let image = GrayImage::new(16, 16);
        let result = SampleGrid::extract(&image, 32);

        assert!(matches!(
            result,
            Err(HashError::DimensionMismatch { expected: 32, width: 16, height: 16 })
        ));
    }

    #[test]
    fn extract_rejects_non_square() {
        let image = GrayImage::new(32, 31);
        assert!(SampleGrid::extract(&image, 32).is_err());
    }

    #[test]
    fn blue_channel_policy_reads_blue() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
        let gray = SampleChannel::Blue.extract(&image);

        assert_eq!(gray.get_pixel(0, 0)[0], 30);
    }

    #[test]
    fn luma_policy_keeps_gray_input() {
        let source = GrayImage::from_fn(3, 3, |x, y| Luma([(x * 3 + y) as u8]));
        let gray = SampleChannel::Luma.extract(&DynamicImage::ImageLuma8(source.clone()));

        assert_eq!(gray, source);
    }
}
