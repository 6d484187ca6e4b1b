//! Spatial-index tuning.

use crate::{CoreError, CoreResult};

/// Tuning values shared by every per-type KD-tree.
///
/// | Field               | Default | Meaning                                        |
/// |---------------------|---------|------------------------------------------------|
/// | `slack`             | 1000.0  | Padding added to a range query before pruning  |
/// | `nearest_threshold` | 100.0   | Max distance for a nearest-edge hit            |
///
/// Both are in map units (metres).  `slack` must be at least as large as the
/// longest distance between an edge's first point and any other point of
/// that edge for range queries to be complete.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexConfig {
    pub slack: f64,
    pub nearest_threshold: f64,
}

impl IndexConfig {
    pub const DEFAULT_SLACK: f64 = 1000.0;
    pub const DEFAULT_NEAREST_THRESHOLD: f64 = 100.0;

    pub fn with_slack(mut self, slack: f64) -> Self {
        self.slack = slack;
        self
    }

    pub fn with_nearest_threshold(mut self, threshold: f64) -> Self {
        self.nearest_threshold = threshold;
        self
    }

    /// Reject negative or non-finite values.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.slack.is_finite() || self.slack < 0.0 {
            return Err(CoreError::Config(format!("slack must be finite and >= 0, got {}", self.slack)));
        }
        if !self.nearest_threshold.is_finite() || self.nearest_threshold <= 0.0 {
            return Err(CoreError::Config(format!(
                "nearest_threshold must be finite and > 0, got {}",
                self.nearest_threshold
            )));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            slack: Self::DEFAULT_SLACK,
            nearest_threshold: Self::DEFAULT_NEAREST_THRESHOLD,
        }
    }
}
