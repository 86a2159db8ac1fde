//! Human-readable rationale attached to each reallocated strategy.

use std::fmt;

use serde::Serialize;

/// Why a strategy's allocation moved the way it did.
///
/// The reason reflects the strategy's APY trend going in, not the direction of
/// the resulting allocation change. A weak strategy that was floored upward by
/// the minimum allocation still reports [`Reason::Weak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// Current APY trails the historical average by more than the loss threshold.
    Weak,
    /// Current APY is above the historical average.
    Strong,
    /// Anything else.
    Neutral,
}

impl Reason {
    /// Classify a strategy's trend. Weakness takes priority over the APY comparison.
    pub fn classify(weak: bool, current_apy: f64, avg_apy: f64) -> Self {
        if weak {
            Reason::Weak
        } else if current_apy > avg_apy {
            Reason::Strong
        } else {
            Reason::Neutral
        }
    }

    /// The message written into the `reason` field of an annotated strategy.
    pub fn message(self) -> &'static str {
        match self {
            Reason::Weak => {
                "Weak trend: current APY is more than the loss threshold below its historical average"
            }
            Reason::Strong => "Strong trend: current APY is above its historical average",
            Reason::Neutral => "Neutral trend: current APY is in line with its historical average",
        }
    }

    /// Recover a reason from an annotated message.
    pub fn from_message(message: &str) -> Option<Self> {
        if message.starts_with("Weak trend") {
            Some(Reason::Weak)
        } else if message.starts_with("Strong trend") {
            Some(Reason::Strong)
        } else if message.starts_with("Neutral trend") {
            Some(Reason::Neutral)
        } else {
            None
        }
    }

    /// Short label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Reason::Weak => "weak",
            Reason::Strong => "strong",
            Reason::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
