//! # Core Module
//!
//! The perceptual hashing engine.
//!
//! ## Modules
//! - `hasher` - Turns an image into a fixed-length bit hash (grid, DCT, reduce, binarise)
//! - `comparator` - Hamming distance and match classification
//! - `batch` - Parallel hashing of many files with per-item errors

pub mod batch;
pub mod comparator;
pub mod hasher;

// Re-export commonly used types
pub use batch::{BatchItem, BatchResult};
pub use comparator::{MatchResult, MatchType};
pub use hasher::{HasherConfig, PerceptualHash, PerceptualHasher};
