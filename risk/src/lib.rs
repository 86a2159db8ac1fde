//! Risk-questionnaire scoring for tiervault.
//!
//! Maps question/answer pairs to a three-way `{low_risk, medium_risk,
//! high_risk}` split summing to 100. The language model itself sits behind the
//! [`RiskModel`] trait; this crate owns the prompt and the validation of what
//! comes back. It shares no data with the reallocation engine.

pub mod error;
pub mod mock;
pub mod parse;
pub mod prompt;
pub mod split;

pub use error::ScoreError;
pub use parse::parse_response;
pub use prompt::build_prompt;
pub use split::{Questionnaire, RiskBucket, RiskSplit};

use log::{debug, warn};

/// A text-completion backend.
pub trait RiskModel {
    /// Complete `prompt`, returning the raw response text or a transport error.
    fn complete(&self, prompt: &str) -> Result<String, String>;
}

impl<F> RiskModel for F
where
    F: Fn(&str) -> Result<String, String>,
{
    fn complete(&self, prompt: &str) -> Result<String, String> {
        self(prompt)
    }
}

/// Scores questionnaires with a [`RiskModel`].
#[derive(Debug, Clone)]
pub struct RiskScorer<M> {
    model: M,
}

impl<M: RiskModel> RiskScorer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Access the underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Ask the model for a risk split and validate the answer.
    pub fn score(&self, qa: &Questionnaire) -> Result<RiskSplit, ScoreError> {
        if qa.is_empty() {
            warn!("scoring an empty questionnaire");
        }
        debug!("scoring questionnaire with {} answers", qa.len());

        let prompt = build_prompt(qa);
        let raw = self.model.complete(&prompt).map_err(ScoreError::Model)?;

        let result = parse_response(&raw);
        match &result {
            Ok(split) => debug!("risk split: {split}"),
            Err(e) => warn!("risk model response rejected: {e}"),
        }
        result
    }
}
