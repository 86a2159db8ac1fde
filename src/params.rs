//! Reallocation parameters.

use serde::{Deserialize, Serialize};

/// Shortfall below the historical average APY that marks a strategy as weak.
pub const LOSS_THRESHOLD: f64 = 2.0;
/// Smoothing factor applied toward the target weight each cycle.
pub const ALPHA: f64 = 0.35;
/// Diversification floor per strategy, in percent.
pub const MIN_ALLOC: f64 = 5.0;
/// Concentration ceiling per strategy, in percent.
pub const MAX_ALLOC: f64 = 80.0;
/// Smallest score a strategy can carry into the target-weight split.
pub const SCORE_FLOOR: f64 = 0.01;

/// Tunables for the reallocation engine.
///
/// Every field has a serde default so a partial `[engine]` table in a TOML
/// config only overrides what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReallocParams {
    /// APY shortfall (absolute percentage points) that classifies a strategy as weak.
    pub loss_threshold: f64,
    /// Exponential smoothing factor in (0, 1]. 1.0 snaps straight to target.
    pub alpha: f64,
    /// Per-strategy floor applied before renormalization, in percent.
    pub min_alloc: f64,
    /// Per-strategy ceiling applied before renormalization, in percent.
    pub max_alloc: f64,
    /// Strictly positive lower bound on a strategy's score.
    pub score_floor: f64,
}

impl Default for ReallocParams {
    fn default() -> Self {
        Self {
            loss_threshold: LOSS_THRESHOLD,
            alpha: ALPHA,
            min_alloc: MIN_ALLOC,
            max_alloc: MAX_ALLOC,
            score_floor: SCORE_FLOOR,
        }
    }
}

impl ReallocParams {
    /// Validate the parameters. Returns `Err` with a description if any field is nonsensical.
    pub fn validate(&self) -> Result<(), String> {
        if !self.loss_threshold.is_finite() || self.loss_threshold < 0.0 {
            return Err(format!(
                "loss_threshold must be >= 0 and finite, got {}",
                self.loss_threshold
            ));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(format!("alpha must be in (0, 1], got {}", self.alpha));
        }
        if !self.min_alloc.is_finite() || self.min_alloc < 0.0 {
            return Err(format!(
                "min_alloc must be >= 0 and finite, got {}",
                self.min_alloc
            ));
        }
        if !self.max_alloc.is_finite() || self.max_alloc > 100.0 {
            return Err(format!(
                "max_alloc must be <= 100 and finite, got {}",
                self.max_alloc
            ));
        }
        if self.min_alloc > self.max_alloc {
            return Err(format!(
                "min_alloc ({}) must not exceed max_alloc ({})",
                self.min_alloc, self.max_alloc
            ));
        }
        if !self.score_floor.is_finite() || self.score_floor <= 0.0 {
            return Err(format!(
                "score_floor must be > 0 and finite, got {}",
                self.score_floor
            ));
        }
        Ok(())
    }
}
