//! Snapshot loading and pre-run inspection.
//!
//! Inspection is advisory: it logs what looks off but never rejects input,
//! since the engine treats missing numbers as zero and always produces output.

use std::fmt;
use std::io::Read;
use std::path::Path;

use log::warn;
use rustc_hash::FxHashSet;
use tiervault::Snapshot;

use crate::error::{Error, Result};

/// Load a snapshot from a file, or from stdin when `path` is `-`.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let read_err = |e| Error::SnapshotRead {
        path: path.to_path_buf(),
        source: e,
    };

    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(read_err)?
    };
    parse_snapshot(&contents)
}

/// Parse a snapshot from JSON text.
pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(json)?)
}

/// Something in the input worth a second look.
#[derive(Debug, Clone, PartialEq)]
pub enum InputWarning {
    /// A tier's current allocations do not sum to 100.
    AllocationSum { tier: String, total: f64 },
    /// Two strategies in one tier share an identifier.
    DuplicateStrategy { tier: String, id: String },
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::AllocationSum { tier, total } => {
                write!(f, "tier '{tier}': current allocations sum to {total:.2}, not 100")
            }
            InputWarning::DuplicateStrategy { tier, id } => {
                write!(f, "tier '{tier}': duplicate strategy '{id}'")
            }
        }
    }
}

/// Check a snapshot for suspicious input, logging each finding at `warn`.
pub fn inspect(snapshot: &Snapshot, sum_tolerance: f64) -> Vec<InputWarning> {
    let mut warnings = Vec::new();

    for tier in &snapshot.tiers {
        if tier.strategies.is_empty() {
            continue;
        }

        let total = tier.current_total();
        if (total - 100.0).abs() > sum_tolerance {
            warnings.push(InputWarning::AllocationSum {
                tier: tier.name().to_string(),
                total,
            });
        }

        let mut seen = FxHashSet::default();
        for id in tier.strategies.iter().filter_map(|s| s.identifier()) {
            if !seen.insert(id.clone()) {
                warnings.push(InputWarning::DuplicateStrategy {
                    tier: tier.name().to_string(),
                    id,
                });
            }
        }
    }

    for w in &warnings {
        warn!("{w}");
    }
    warnings
}
