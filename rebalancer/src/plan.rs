//! Per-tier plan report: current vs proposed allocations.
//!
//! Also carries the settlement view: whole-percent allocations that sum to
//! exactly 100 and their basis-point equivalents, which is what downstream
//! settlement consumes.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tiervault::rounding::{to_bps, whole_percentages};
use tiervault::{Reallocator, Reason, Snapshot, Tier};

/// One strategy's line in the plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    pub id: String,
    pub current: f64,
    pub new: f64,
    pub change: f64,
    pub reason: Reason,
    /// Absorbed the rounding residual.
    pub anchor: bool,
    pub whole_pct: i64,
    pub bps: i64,
}

/// One tier's section of the plan.
#[derive(Debug, Clone, Serialize)]
pub struct TierReport {
    pub tier: String,
    pub name: String,
    pub rows: Vec<PlanRow>,
    pub drift: f64,
    pub equal_split: bool,
}

impl TierReport {
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.new).sum()
    }
}

/// The full plan for a snapshot. Serializes as the `plan --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub request_type: String,
    pub timestamp: String,
    pub tiers: Vec<TierReport>,
}

/// Build the plan report for a snapshot.
pub fn build_report(engine: &Reallocator, snapshot: &Snapshot) -> PlanReport {
    PlanReport {
        request_type: value_label(snapshot.request_type.as_ref()),
        timestamp: describe_timestamp(snapshot.timestamp.as_ref().unwrap_or(&Value::Null)),
        tiers: snapshot
            .tiers
            .iter()
            .map(|t| build_tier_report(engine, t))
            .collect(),
    }
}

fn build_tier_report(engine: &Reallocator, tier: &Tier) -> TierReport {
    let plan = engine.plan_tier(tier);
    let whole = whole_percentages(&plan.new_allocations());
    let bps = to_bps(&whole);

    let rows = tier
        .strategies
        .iter()
        .zip(&plan.allocations)
        .enumerate()
        .map(|(i, (record, a))| PlanRow {
            id: record.identifier().unwrap_or_else(|| format!("#{i}")),
            current: record.metrics().current_allocation,
            new: a.new_allocation,
            change: a.allocation_change,
            reason: a.reason,
            anchor: plan.anchor == Some(i),
            whole_pct: whole[i],
            bps: bps[i],
        })
        .collect();

    TierReport {
        tier: value_label(tier.tier.as_ref()),
        name: tier.name().to_string(),
        rows,
        drift: plan.drift,
        equal_split: plan.equal_split,
    }
}

fn value_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => "-".into(),
        Some(other) => other.to_string(),
    }
}

/// Render an opaque snapshot timestamp for humans.
///
/// Integers of 10^12 or more are epoch milliseconds, smaller integers epoch
/// seconds; RFC 3339 strings are normalized to UTC. Anything else prints as-is.
pub fn describe_timestamp(value: &Value) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

    let parsed: Option<DateTime<Utc>> = match value {
        Value::Number(n) => n.as_i64().and_then(|ts| {
            if ts.unsigned_abs() >= 1_000_000_000_000 {
                DateTime::from_timestamp_millis(ts)
            } else {
                DateTime::from_timestamp(ts, 0)
            }
        }),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    };

    match parsed {
        Some(dt) => dt.format(FORMAT).to_string(),
        None => value_label(Some(value)),
    }
}

impl PlanReport {
    /// Render as a text table. `settlement` adds the whole-percent and bps columns.
    pub fn render(&self, settlement: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "REALLOCATION PLAN ({}, {})", self.request_type, self.timestamp);

        for tier in &self.tiers {
            let _ = writeln!(out, "\nTIER {} {}:", tier.tier, tier.name);
            if tier.rows.is_empty() {
                let _ = writeln!(out, "  (no strategies)");
                continue;
            }

            let _ = write!(
                out,
                "  {:<20} {:>9} {:>9} {:>9}  {:<8}",
                "STRATEGY", "CURRENT", "NEW", "CHANGE", "REASON"
            );
            if settlement {
                let _ = write!(out, " {:>6} {:>6}", "WHOLE", "BPS");
            }
            out.push('\n');

            for row in &tier.rows {
                let _ = write!(
                    out,
                    "  {:<20} {:>8.2}% {:>8.2}% {:>+9.2}  {:<8}",
                    truncate(&row.id, 20),
                    row.current,
                    row.new,
                    row.change,
                    row.reason.label(),
                );
                if settlement {
                    let _ = write!(out, " {:>5}% {:>6}", row.whole_pct, row.bps);
                }
                if row.anchor {
                    out.push_str(" *");
                }
                out.push('\n');
            }

            let _ = writeln!(out, "  {:<20} {:>9} {:>8.2}%", "TOTAL", "", tier.total());
            if tier.drift != 0.0 {
                let _ = writeln!(out, "  * absorbed rounding drift {:+.2}", tier.drift);
            }
            if tier.equal_split {
                let _ = writeln!(out, "  ! clamped total was zero, equal split applied");
            }
        }
        out
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max - 1).collect();
        t.push('~');
        t
    }
}
