//! Caller-supplied scaling.
//!
//! Hash values depend on the resampling algorithm, so scaling is a policy the
//! caller injects rather than something the hasher picks. Any closure
//! `Fn(&DynamicImage, u32, u32) -> Result<DynamicImage, E>` is a scale
//! function; two stock policies are provided.
//!
//! A scale function must return an image of exactly the requested size.
//! The hasher checks this and rejects anything else.

use crate::error::BoxError;
use fast_image_resize::{images::Image, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

/// Resamples an image to `width x height`
pub trait ScaleFunction: Send + Sync {
    fn scale(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, BoxError>;
}

impl<F, E> ScaleFunction for F
where
    F: Fn(&DynamicImage, u32, u32) -> Result<DynamicImage, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn scale(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, BoxError> {
        self(image, width, height).map_err(Into::into)
    }
}

/// Scale with one of the `image` crate's resampling filters
#[derive(Debug, Clone, Copy)]
pub struct FilterScaler {
    filter: FilterType,
}

impl FilterScaler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for FilterScaler {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl ScaleFunction for FilterScaler {
    fn scale(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, BoxError> {
        Ok(image.resize_exact(width, height, self.filter))
    }
}

/// SIMD-accelerated convolution scaling via `fast_image_resize`.
///
/// Works on RGBA8 so that every channel policy sees resampled data.
#[derive(Debug, Clone, Copy)]
pub struct FastScaler {
    filter: fast_image_resize::FilterType,
}

impl FastScaler {
    pub fn new(filter: fast_image_resize::FilterType) -> Self {
        Self { filter }
    }
}

impl Default for FastScaler {
    fn default() -> Self {
        Self::new(fast_image_resize::FilterType::Lanczos3)
    }
}

impl ScaleFunction for FastScaler {
    fn scale(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, BoxError> {
        let rgba = image.to_rgba8();
        let (src_width, src_height) = rgba.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err("Invalid source dimensions".into());
        }

        if width == 0 || height == 0 {
            return Err("Invalid destination dimensions".into());
        }

        let src_image = Image::from_vec_u8(src_width, src_height, rgba.into_raw(), PixelType::U8x4)?;
        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(self.filter));
        Resizer::new().resize(&src_image, &mut dst_image, &options)?;

        let buffer = RgbaImage::from_raw(width, height, dst_image.into_vec())
            .ok_or("Failed to create result buffer")?;

        Ok(DynamicImage::ImageRgba8(buffer))
    }
}
