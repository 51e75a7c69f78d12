//! # Error Module
//!
//! Error types for the perceptual hash pipeline.
//!
//! ## Design Principles
//! - **Never panic** on caller data - return errors instead
//! - **Never repair input** - a wrongly sized image is rejected, not cropped or padded
//! - **Include context** - sizes, paths, what went wrong
//! - **Pass collaborator failures through** - scaler errors are carried, not interpreted

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by caller-supplied collaborators (e.g. a scale function).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level library error
#[derive(Error, Debug)]
pub enum PhashError {
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Invalid hash string: {0}")]
    Parse(#[from] ParseHashError),
}

/// Errors that occur while turning an image into a hash
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Image is {width}x{height}, expected exactly {expected}x{expected}")]
    DimensionMismatch { expected: u32, width: u32, height: u32 },

    #[error("Cannot reduce a {grid}x{grid} coefficient matrix to {reduced}x{reduced}")]
    InvalidReduction { reduced: u32, grid: u32 },

    #[error("Scale function failed: {0}")]
    Scale(#[source] BoxError),

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur when comparing two hashes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("Hashes have different lengths ({left} vs {right} bits) and cannot be compared")]
    LengthMismatch { left: usize, right: usize },
}

/// Errors that occur when parsing the '0'/'1' string form of a hash
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseHashError {
    #[error("hash string is empty")]
    Empty,

    #[error("unexpected character {found:?} at position {position} (expected '0' or '1')")]
    InvalidCharacter { position: usize, found: char },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PhashError>;
