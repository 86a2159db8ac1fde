//! The reallocation engine.
//!
//! Per tier: score → target weights → smoothing → clamp → renormalize →
//! round and absorb drift → rationale. Tiers are independent and the engine
//! holds no state between calls.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::params::ReallocParams;
use crate::rationale::Reason;
use crate::rounding::{absorb_drift, argmax_first, round2};
use crate::snapshot::{Snapshot, StrategyMetrics, StrategyRecord, Tier};

/// Allocations within a tier always reconcile to this total.
pub const TOTAL_ALLOCATION: f64 = 100.0;

/// Every intermediate stage for one strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyAllocation {
    pub weak: bool,
    /// Score after halving (if weak) and flooring.
    pub score: f64,
    /// Proportional share of the tier's total score, in percent.
    pub target: f64,
    /// Current allocation moved `alpha` of the way toward `target`.
    pub smoothed: f64,
    /// `smoothed` clamped to the allocation bounds.
    pub clamped: f64,
    /// Renormalized, rounded to 2 decimals, drift-corrected.
    pub new_allocation: f64,
    pub allocation_change: f64,
    pub reason: Reason,
}

/// Result of reallocating one tier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TierPlan {
    /// One entry per strategy, in input order.
    pub allocations: Vec<StrategyAllocation>,
    /// Index of the strategy that absorbed the rounding residual.
    pub anchor: Option<usize>,
    /// Residual absorbed by the anchor (`100 - Σ rounded`).
    pub drift: f64,
    /// True if the clamped total was zero and an equal split was used instead.
    pub equal_split: bool,
}

impl TierPlan {
    pub fn new_allocations(&self) -> Vec<f64> {
        self.allocations.iter().map(|a| a.new_allocation).collect()
    }

    pub fn total(&self) -> f64 {
        self.allocations.iter().map(|a| a.new_allocation).sum()
    }
}

/// Stateless reallocation engine.
#[derive(Debug, Clone, Default)]
pub struct Reallocator {
    params: ReallocParams,
}

impl Reallocator {
    /// Create an engine, rejecting invalid parameters.
    pub fn new(params: ReallocParams) -> Result<Self> {
        params.validate().map_err(Error::InvalidParams)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ReallocParams {
        &self.params
    }

    /// Compute new allocations for one tier's strategies.
    ///
    /// An empty slice yields an empty plan.
    pub fn plan(&self, metrics: &[StrategyMetrics]) -> TierPlan {
        if metrics.is_empty() {
            return TierPlan::default();
        }
        let p = &self.params;
        let n = metrics.len();

        // 1. Score: halve weak strategies, floor so nothing gets zero weight
        let weak: Vec<bool> = metrics
            .iter()
            .map(|m| m.current_apy < m.avg_apy - p.loss_threshold)
            .collect();
        let scores: Vec<f64> = metrics
            .iter()
            .zip(&weak)
            .map(|(m, &w)| {
                let raw = if w { m.current_apy * 0.5 } else { m.current_apy };
                raw.max(p.score_floor)
            })
            .collect();

        // 2. Target weights (Σ score >= n * score_floor > 0)
        let total_score: f64 = scores.iter().sum();
        let targets: Vec<f64> = scores
            .iter()
            .map(|s| s / total_score * TOTAL_ALLOCATION)
            .collect();

        // 3. Smooth toward target
        let smoothed: Vec<f64> = metrics
            .iter()
            .zip(&targets)
            .map(|(m, &t)| m.current_allocation + p.alpha * (t - m.current_allocation))
            .collect();

        // 4. Clamp
        let clamped: Vec<f64> = smoothed
            .iter()
            .map(|v| v.clamp(p.min_alloc, p.max_alloc))
            .collect();

        // 5. Renormalize
        let total_clamped: f64 = clamped.iter().sum();
        let equal_split = total_clamped <= 0.0;
        let normalized: Vec<f64> = if equal_split {
            warn!("clamped allocations sum to zero across {n} strategies, using equal split");
            vec![TOTAL_ALLOCATION / n as f64; n]
        } else {
            clamped
                .iter()
                .map(|c| c / total_clamped * TOTAL_ALLOCATION)
                .collect()
        };

        // 6. Round, then the highest score absorbs the residual
        let rounded: Vec<f64> = normalized.iter().map(|&v| round2(v)).collect();
        let anchor = argmax_first(&scores).unwrap_or(0);
        let (settled, drift) = absorb_drift(&rounded, anchor, TOTAL_ALLOCATION);
        if drift != 0.0 {
            debug!("rounding drift {drift:+.2} absorbed by strategy #{anchor}");
        }

        // 7-8. Rationale and change
        let allocations = (0..n)
            .map(|i| StrategyAllocation {
                weak: weak[i],
                score: scores[i],
                target: targets[i],
                smoothed: smoothed[i],
                clamped: clamped[i],
                new_allocation: settled[i],
                allocation_change: round2(settled[i] - metrics[i].current_allocation),
                reason: Reason::classify(weak[i], metrics[i].current_apy, metrics[i].avg_apy),
            })
            .collect();

        TierPlan {
            allocations,
            anchor: Some(anchor),
            drift,
            equal_split,
        }
    }

    /// Plan a tier straight from its records.
    pub fn plan_tier(&self, tier: &Tier) -> TierPlan {
        let metrics: Vec<StrategyMetrics> =
            tier.strategies.iter().map(StrategyRecord::metrics).collect();
        self.plan(&metrics)
    }

    /// Annotate one tier. Tiers without strategies come back unchanged.
    pub fn reallocate_tier(&self, tier: &Tier) -> Tier {
        if tier.strategies.is_empty() {
            return tier.clone();
        }

        let plan = self.plan_tier(tier);
        debug!(
            "tier '{}': {} strategies reallocated, drift {:+.2}",
            tier.name(),
            plan.allocations.len(),
            plan.drift
        );

        let strategies = tier
            .strategies
            .iter()
            .zip(&plan.allocations)
            .map(|(record, a)| record.annotate(a.new_allocation, a.allocation_change, a.reason))
            .collect();

        Tier {
            tier: tier.tier.clone(),
            name: tier.name.clone(),
            strategies,
            extra: tier.extra.clone(),
        }
    }

    /// Annotate every tier of a snapshot, preserving order and passthrough fields.
    pub fn reallocate(&self, snapshot: &Snapshot) -> Snapshot {
        let tiers = snapshot
            .tiers
            .iter()
            .map(|t| self.reallocate_tier(t))
            .collect();
        with_tiers(snapshot, tiers)
    }

    /// Like [`Reallocator::reallocate`], with tiers processed in parallel.
    #[cfg(feature = "parallel")]
    pub fn reallocate_par(&self, snapshot: &Snapshot) -> Snapshot {
        use rayon::prelude::*;

        let tiers = snapshot
            .tiers
            .par_iter()
            .map(|t| self.reallocate_tier(t))
            .collect();
        with_tiers(snapshot, tiers)
    }
}

fn with_tiers(snapshot: &Snapshot, tiers: Vec<Tier>) -> Snapshot {
    Snapshot {
        request_type: snapshot.request_type.clone(),
        timestamp: snapshot.timestamp.clone(),
        tiers,
        extra: snapshot.extra.clone(),
    }
}

/// Reallocate with the default parameters.
pub fn reallocate(snapshot: &Snapshot) -> Snapshot {
    Reallocator::default().reallocate(snapshot)
}
