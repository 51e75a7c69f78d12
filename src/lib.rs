//! # dct-phash
//!
//! DCT-based perceptual image hashing. Visually similar images give hashes a
//! small Hamming distance apart; unrelated images differ in about half their bits.
//!
//! ## Pipeline
//! 1. Read an `N x N` grayscale image into a sample grid (N = 32)
//! 2. 2D DCT-II of the grid
//! 3. Keep the top-left `M x M` low frequencies (M = 8)
//! 4. One bit per coefficient: above the DC-excluded mean or not
//!
//! Decoding, resizing and colour conversion happen before step 1 and are
//! supplied by the caller. Resizing in particular is injected as a
//! [`ScaleFunction`](core::hasher::ScaleFunction), because hash values depend
//! on the resampling algorithm.
//!
//! ## Architecture
//! - `core` - The hashing engine
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use crate::core::hasher::{PerceptualHash, PerceptualHasher, GRID_SIZE, REDUCED_SIZE};
pub use error::{PhashError, Result};

use image::GrayImage;

/// Hash a pre-scaled, pre-grayscaled 32x32 image with the canonical configuration
pub fn hash(image: &GrayImage) -> Result<PerceptualHash> {
    Ok(PerceptualHasher::canonical().hash_source(image)?)
}

/// Hamming distance between two hashes of equal length
pub fn distance(a: &PerceptualHash, b: &PerceptualHash) -> Result<u32> {
    Ok(a.distance(b)?)
}

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global tracing subscriber already set");
    }
}
