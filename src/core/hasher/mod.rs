//! # Hasher Module
//!
//! Computes DCT-based perceptual hashes.
//!
//! ## How It Works
//! 1. Read the `N x N` grayscale image into a sample grid (no resampling here)
//! 2. Run a 2D DCT-II over the grid
//! 3. Keep the top-left `M x M` low-frequency coefficients
//! 4. Set each bit to 1 when its coefficient is above the mean of the others
//!    (the DC term is left out of the mean)
//!
//! Every stage is a pure function, so one [`PerceptualHasher`] can be shared
//! across threads.
//!
//! ## Example
//! ```rust,ignore
//! use dct_phash::core::hasher::{FilterScaler, HasherConfig};
//!
//! let hasher = HasherConfig::new().build()?;
//! let hash = hasher.hash_file(&path, &FilterScaler::default())?;
//! println!("{}", hash);
//! ```

pub mod dct;
pub mod decode;
pub mod grid;
mod hash;
mod matrix;
pub mod reduce;
pub mod scale;

pub use dct::DctMethod;
pub use grid::{SampleChannel, SampleGrid, SampleSource};
pub use hash::PerceptualHash;
pub use matrix::Matrix;
pub use scale::{FastScaler, FilterScaler, ScaleFunction};

use crate::error::HashError;
use image::DynamicImage;
use std::path::Path;

/// Canonical sample grid size (N)
pub const GRID_SIZE: u32 = 32;

/// Canonical reduced size (M); hashes are `M * M` = 64 bits
pub const REDUCED_SIZE: u32 = 8;

/// Configuration builder for hashers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    /// Sample grid size N
    grid_size: u32,
    /// Reduced coefficient block size M
    reduced_size: u32,
    /// DCT evaluation strategy
    dct: DctMethod,
    /// Channel policy for colour input
    channel: SampleChannel,
}

impl HasherConfig {
    /// Create a configuration with the canonical 32/8 sizes
    pub fn new() -> Self {
        Self {
            grid_size: GRID_SIZE,
            reduced_size: REDUCED_SIZE,
            dct: DctMethod::Direct,
            channel: SampleChannel::Luma,
        }
    }

    /// Set the sample grid size N
    pub fn grid_size(mut self, size: u32) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the reduced size M. The hash will be `M * M` bits.
    pub fn hash_size(mut self, size: u32) -> Self {
        self.reduced_size = size;
        self
    }

    /// Set the DCT evaluation strategy
    pub fn dct(mut self, method: DctMethod) -> Self {
        self.dct = method;
        self
    }

    /// Set the channel policy
    pub fn channel(mut self, channel: SampleChannel) -> Self {
        self.channel = channel;
        self
    }

    /// The configured DCT evaluation strategy
    pub fn dct_method(&self) -> DctMethod {
        self.dct
    }

    /// The configured channel policy
    pub fn sample_channel(&self) -> SampleChannel {
        self.channel
    }

    /// Validate and build the hasher
    pub fn build(self) -> Result<PerceptualHasher, HashError> {
        // The DC-excluded mean needs at least one other cell
        if self.reduced_size > self.grid_size || self.reduced_size < 2 {
            return Err(HashError::InvalidReduction {
                reduced: self.reduced_size,
                grid: self.grid_size,
            });
        }

        Ok(PerceptualHasher { config: self })
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated, immutable hash pipeline
#[derive(Debug, Clone)]
pub struct PerceptualHasher {
    config: HasherConfig,
}

impl PerceptualHasher {
    /// The canonical configuration: N = 32, M = 8, direct DCT, luma channel
    pub fn canonical() -> Self {
        Self {
            config: HasherConfig::new(),
        }
    }

    /// Sample grid size N
    pub fn grid_size(&self) -> u32 {
        self.config.grid_size
    }

    /// Number of bits in every hash this hasher produces
    pub fn hash_bits(&self) -> usize {
        let m = self.config.reduced_size as usize;
        m * m
    }

    /// The configuration this hasher was built from
    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Hash a sample grid
    pub fn hash_grid(&self, grid: &SampleGrid) -> Result<PerceptualHash, HashError> {
        let n = self.config.grid_size;
        if grid.size() != n as usize {
            return Err(HashError::DimensionMismatch {
                expected: n,
                width: grid.size() as u32,
                height: grid.size() as u32,
            });
        }

        let coefficients = self.config.dct.transform(grid.as_matrix());
        let reduced = reduce::reduce(&coefficients, self.config.reduced_size as usize)?;

        Ok(reduce::build_hash(&reduced))
    }

    /// Hash an already scaled, single-channel source. Never resamples.
    pub fn hash_source<S>(&self, source: &S) -> Result<PerceptualHash, HashError>
    where
        S: SampleSource + ?Sized,
    {
        let grid = SampleGrid::extract(source, self.config.grid_size)?;
        self.hash_grid(&grid)
    }

    /// Hash a decoded image.
    ///
    /// `scaler` is only invoked when the image is not already `N x N`; its
    /// output must then be exactly `N x N`.
    pub fn hash_image<F>(&self, image: &DynamicImage, scaler: &F) -> Result<PerceptualHash, HashError>
    where
        F: ScaleFunction + ?Sized,
    {
        let n = self.config.grid_size;

        let gray = if image.width() == n && image.height() == n {
            self.config.channel.extract(image)
        } else {
            tracing::debug!(
                width = image.width(),
                height = image.height(),
                target = n,
                "scaling image to grid size"
            );
            let scaled = scaler.scale(image, n, n).map_err(HashError::Scale)?;
            self.config.channel.extract(&scaled)
        };

        self.hash_source(&gray)
    }

    /// Decode and hash an image file
    pub fn hash_file<F>(&self, path: &Path, scaler: &F) -> Result<PerceptualHash, HashError>
    where
        F: ScaleFunction + ?Sized,
    {
        let image = decode::decode_file(path)?;
        let hash = self.hash_image(&image, scaler)?;

        tracing::debug!(path = %path.display(), hash = %hash, "hashed file");
        Ok(hash)
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::canonical()
    }
}
