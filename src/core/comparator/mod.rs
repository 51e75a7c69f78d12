//! # Comparator Module
//!
//! Pairwise comparison of perceptual hashes.
//!
//! ## How It Works
//! 1. Check both hashes come from the same configuration (equal bit length)
//! 2. Count differing bits (Hamming distance)
//! 3. Classify the distance with a comparison strategy
//!
//! ## Comparison Thresholds (64-bit hashes)
//! | Distance | Classification |
//! |----------|---------------|
//! | 0        | Exact match   |
//! | 1-4      | Near-exact    |
//! | 5-10     | Similar       |
//! | 11+      | Different     |

mod traits;

pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::hasher::PerceptualHash;
use crate::error::CompareError;
use serde::{Deserialize, Serialize};

/// Hamming distance between two hashes of equal length
pub fn distance(a: &PerceptualHash, b: &PerceptualHash) -> Result<u32, CompareError> {
    a.distance(b)
}

/// Result of comparing two hashes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Hamming distance between the hashes
    pub distance: u32,
    /// Number of bits compared
    pub bits: usize,
    /// Similarity as a percentage (0-100)
    pub similarity_percent: f64,
    /// Classification of the match
    pub match_type: MatchType,
}

/// Classification of match types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Distance = 0, identical perceptual content
    Exact,
    /// Distance 1-4, virtually identical
    NearExact,
    /// Distance 5-10, likely the same picture
    Similar,
    /// Distance 11+, unrelated
    Different,
}

impl MatchType {
    /// Classify based on Hamming distance
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => MatchType::Exact,
            1..=4 => MatchType::NearExact,
            5..=10 => MatchType::Similar,
            _ => MatchType::Different,
        }
    }

    /// Check if this match type is considered a near-duplicate
    pub fn is_duplicate(&self) -> bool {
        matches!(self, MatchType::Exact | MatchType::NearExact | MatchType::Similar)
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "Exact Match"),
            MatchType::NearExact => write!(f, "Near-Exact Match"),
            MatchType::Similar => write!(f, "Similar"),
            MatchType::Different => write!(f, "Different"),
        }
    }
}

/// Compare two hashes and classify the result with `strategy`
pub fn compare(
    a: &PerceptualHash,
    b: &PerceptualHash,
    strategy: &dyn ComparisonStrategy,
) -> Result<MatchResult, CompareError> {
    let distance = a.distance(b)?;

    Ok(MatchResult {
        distance,
        bits: a.len(),
        similarity_percent: a.similarity(b)?,
        match_type: strategy.classify(distance),
    })
}
