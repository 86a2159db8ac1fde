//! Mock risk model for testing: canned responses, recorded prompts.
//!
//! ```
//! use tiervault_risk::mock::MockModel;
//! use tiervault_risk::{Questionnaire, RiskScorer};
//!
//! let model = MockModel::replying(r#"{"risk_score":{"low_risk":20,"medium_risk":50,"high_risk":30}}"#);
//! let scorer = RiskScorer::new(model);
//! let split = scorer.score(&Questionnaire::new().with_answer("Horizon?", "10y")).unwrap();
//! assert_eq!(split.medium_risk, 50);
//! assert_eq!(scorer.model().prompts().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::RiskModel;

/// A model that replays queued responses in order.
///
/// The last response repeats once the queue drains to a single entry.
#[derive(Debug, Default)]
pub struct MockModel {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    /// Always answer with `response`.
    pub fn replying(response: impl Into<String>) -> Self {
        Self::default().then_reply(response)
    }

    /// Always fail with `error`.
    pub fn failing(error: impl Into<String>) -> Self {
        Self::default().then_fail(error)
    }

    pub fn then_reply(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()))
    }

    pub fn then_fail(self, error: impl Into<String>) -> Self {
        self.push(Err(error.into()))
    }

    fn push(self, response: Result<String, String>) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl RiskModel for MockModel {
    fn complete(&self, prompt: &str) -> Result<String, String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let mut queue = self
            .responses
            .lock()
            .map_err(|_| "mock model poisoned".to_string())?;
        match queue.len() {
            0 => Err("mock model has no responses queued".into()),
            1 => queue[0].clone(),
            _ => queue
                .pop_front()
                .unwrap_or_else(|| Err("mock model has no responses queued".into())),
        }
    }
}
