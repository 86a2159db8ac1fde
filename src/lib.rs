//! # tiervault
//!
//! Deterministic reallocation of capital across tiers of yield strategies.
//!
//! Given a snapshot of each strategy's current allocation and APY, the engine
//! proposes new allocation percentages per tier and attaches a rationale:
//!
//! 1. **Score** each strategy by current APY, halved when it trails its
//!    historical average by more than the loss threshold, floored at 0.01.
//! 2. **Target** weights are proportional to score.
//! 3. **Smooth** the current allocation toward target (exponential, α = 0.35).
//! 4. **Clamp** to `[5, 80]` percent, then **renormalize** to 100.
//! 5. **Round** to 2 decimals; the highest-scoring strategy absorbs the
//!    rounding residual so each tier sums to exactly 100.00.
//!
//! ## Quick Start
//!
//! ```
//! use tiervault::{Reallocator, Snapshot, StrategyRecord, Tier};
//!
//! let snapshot = Snapshot::new("rebalance", 1_735_689_600_000_u64).with_tier(
//!     Tier::new(0, "Conservative")
//!         .with_strategy(StrategyRecord::new(10.0, 40.0).with_avg_apy(8.0))
//!         .with_strategy(StrategyRecord::new(4.0, 60.0).with_avg_apy(8.0)),
//! );
//!
//! let out = Reallocator::default().reallocate(&snapshot);
//! let strategies = &out.tiers[0].strategies;
//!
//! assert_eq!(strategies[0].new_allocation(), Some(55.17));
//! assert_eq!(strategies[1].new_allocation(), Some(44.83));
//! ```
//!
//! ## Forgiving input
//!
//! Missing or non-numeric `currentAPY`, `currentAllocation` and
//! `historical.avgAPY` read as 0. Unknown fields on snapshots, tiers, and
//! strategies are carried through to the output in their original order.
//!
//! ```
//! use tiervault::Snapshot;
//!
//! let snapshot = Snapshot::from_json(r#"{
//!     "requestType": "rebalance",
//!     "timestamp": 0,
//!     "tiers": [{ "tier": 0, "name": "Empty", "strategies": [] }]
//! }"#).unwrap();
//!
//! let out = tiervault::reallocate(&snapshot);
//! assert_eq!(out, snapshot);
//! ```

mod engine;
mod error;
mod params;
mod rationale;
pub mod rounding;
pub mod snapshot;
pub mod stats;

// Re-export public API
pub use engine::{Reallocator, StrategyAllocation, TOTAL_ALLOCATION, TierPlan, reallocate};
pub use error::{Error, Result};
pub use params::{ALPHA, LOSS_THRESHOLD, MAX_ALLOC, MIN_ALLOC, ReallocParams, SCORE_FLOOR};
pub use rationale::Reason;
pub use snapshot::{Snapshot, StrategyMetrics, StrategyRecord, Tier};
