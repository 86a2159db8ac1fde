//! Risk model response parsing.
//!
//! Models wrap their JSON in prose or code fences. The object is taken to be
//! everything from the first `{` to the last `}`; the split may sit under a
//! `risk_score` key or at the top level.

use serde_json::Value;

use crate::error::ScoreError;
use crate::split::RiskSplit;

/// Wrapper key the prompt asks the model to use.
const RISK_SCORE: &str = "risk_score";

/// Extract and validate a risk split from a raw model response.
pub fn parse_response(raw: &str) -> Result<RiskSplit, ScoreError> {
    let span = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(ScoreError::NoJson {
                raw: raw.to_string(),
            });
        }
    };

    let value: Value = serde_json::from_str(span).map_err(|e| ScoreError::Malformed {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;

    let body = value.get(RISK_SCORE).unwrap_or(&value);
    let malformed = |reason: String| ScoreError::Malformed {
        raw: raw.to_string(),
        reason,
    };
    let low = integer_field(body, "low_risk").map_err(malformed)?;
    let medium = integer_field(body, "medium_risk").map_err(malformed)?;
    let high = integer_field(body, "high_risk").map_err(malformed)?;

    RiskSplit::try_new(low, medium, high).ok_or_else(|| ScoreError::InvalidSplit {
        raw: raw.to_string(),
        low,
        medium,
        high,
    })
}

/// Smallest and one past the largest float that converts to `i64` exactly.
const I64_FLOAT_RANGE: (f64, f64) = (-9_223_372_036_854_775_808.0, 9_223_372_036_854_775_808.0);

/// Read an integer field. Whole floats (`30.0`) count as integers.
fn integer_field(body: &Value, key: &str) -> Result<i64, String> {
    let value = body.get(key).ok_or_else(|| format!("missing {key}"))?;
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            let (lower, upper) = I64_FLOAT_RANGE;
            if f >= lower && f < upper {
                Ok(f as i64)
            } else {
                Err(format!("{key} is out of range, got {value}"))
            }
        }
        _ => Err(format!("{key} must be an integer, got {value}")),
    }
}
