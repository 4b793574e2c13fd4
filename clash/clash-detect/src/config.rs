//! Detection run configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DetectError, DetectResult};

/// Broad-phase strategy.
///
/// Every strategy produces the same candidate set; they differ only in cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BroadPhaseStrategy {
    /// Test every unordered pair, O(n²).
    #[default]
    BruteForce,
    /// Sort intervals on the widest axis and sweep, O(n log n + k).
    SweepAndPrune,
    /// Query a bounding volume hierarchy once per entry.
    Bvh,
}

impl BroadPhaseStrategy {
    /// All strategies, in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::BruteForce, Self::SweepAndPrune, Self::Bvh]
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::SweepAndPrune => "sweep-and-prune",
            Self::Bvh => "bvh",
        }
    }
}

impl std::fmt::Display for BroadPhaseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a [`ClashDetector`](crate::ClashDetector).
///
/// # Example
///
/// ```
/// use clash_detect::{BroadPhaseStrategy, DetectConfig};
///
/// let config = DetectConfig::default()
///     .with_strategy(BroadPhaseStrategy::Bvh)
///     .with_bvh_leaf_size(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectConfig {
    /// Broad-phase strategy.
    pub strategy: BroadPhaseStrategy,
    /// Maximum entries per BVH leaf (only used by [`BroadPhaseStrategy::Bvh`]).
    pub bvh_leaf_size: usize,
    /// Whether clashing bodies are passed to the reporter's `select`.
    pub select_clashing: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            strategy: BroadPhaseStrategy::BruteForce,
            bvh_leaf_size: 4,
            select_clashing: true,
        }
    }
}

impl DetectConfig {
    /// Set the broad-phase strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: BroadPhaseStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the maximum entries per BVH leaf.
    #[must_use]
    pub const fn with_bvh_leaf_size(mut self, leaf_size: usize) -> Self {
        self.bvh_leaf_size = leaf_size;
        self
    }

    /// Enable or disable selection of clashing bodies.
    #[must_use]
    pub const fn with_select_clashing(mut self, select: bool) -> Self {
        self.select_clashing = select;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the BVH leaf size is zero.
    pub fn validate(&self) -> DetectResult<()> {
        if self.bvh_leaf_size == 0 {
            return Err(DetectError::invalid_config(
                "bvh_leaf_size must be at least 1",
            ));
        }
        Ok(())
    }
}
