//! Risk scoring errors.

/// Errors from scoring a questionnaire.
///
/// Every variant derived from a model response carries the raw response text
/// so callers can log or surface it.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("risk model error: {0}")]
    Model(String),

    #[error("no JSON object found in model response")]
    NoJson { raw: String },

    #[error("malformed risk score: {reason}")]
    Malformed { raw: String, reason: String },

    #[error("risk split must be non-negative and sum to 100, got {low}/{medium}/{high}")]
    InvalidSplit {
        raw: String,
        low: i64,
        medium: i64,
        high: i64,
    },
}

impl ScoreError {
    /// The raw model response, if this error came from one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ScoreError::Model(_) => None,
            ScoreError::NoJson { raw }
            | ScoreError::Malformed { raw, .. }
            | ScoreError::InvalidSplit { raw, .. } => Some(raw),
        }
    }
}
