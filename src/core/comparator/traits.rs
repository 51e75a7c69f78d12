//! Comparison strategies: when is a distance close enough?

use super::MatchType;

/// Decides whether two hashes are near-duplicates from their distance
pub trait ComparisonStrategy: Send + Sync {
    /// Whether a pair at `distance` counts as a near-duplicate
    fn is_duplicate(&self, distance: u32) -> bool;

    /// Classify the match type based on distance
    fn classify(&self, distance: u32) -> MatchType;

    /// Maximum distance still considered a near-duplicate
    fn threshold(&self) -> u32;

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

/// Fixed-threshold strategy, calibrated for a given hash length.
///
/// Thresholds are expressed against 64-bit hashes and scaled linearly to
/// other lengths, so a 256-bit hash gets four times the slack.
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    threshold: u32,
    bits: usize,
}

impl ThresholdStrategy {
    /// Strategy for 64-bit hashes.
    ///
    /// Recommended thresholds:
    /// - 5: Conservative, few false positives
    /// - 8: Balanced (default)
    /// - 10: Permissive, catches more near-duplicates
    pub fn new(threshold: u32) -> Self {
        Self { threshold, bits: 64 }
    }

    /// Rescale this strategy to hashes of `bits` length
    pub fn for_bits(self, bits: usize) -> Self {
        let threshold = (self.threshold as usize * bits + 32) / 64;
        Self {
            threshold: threshold as u32,
            bits,
        }
    }

    /// Create a conservative strategy (threshold = 5)
    pub fn conservative() -> Self {
        Self::new(5)
    }

    /// Create a balanced strategy (threshold = 8)
    pub fn balanced() -> Self {
        Self::new(8)
    }

    /// Create a permissive strategy (threshold = 10)
    pub fn permissive() -> Self {
        Self::new(10)
    }

    /// Map `distance` onto the 64-bit scale used by `MatchType`
    fn normalised(&self, distance: u32) -> u32 {
        if self.bits == 64 || self.bits == 0 {
            return distance;
        }
        ((distance as usize * 64 + self.bits / 2) / self.bits) as u32
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    fn classify(&self, distance: u32) -> MatchType {
        MatchType::from_distance(self.normalised(distance))
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }

    fn description(&self) -> String {
        format!(
            "Threshold strategy: {}-bit hashes within {} bits are near-duplicates",
            self.bits, self.threshold
        )
    }
}
