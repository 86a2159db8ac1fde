//! Questionnaire input and the three-way risk split.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Question → answer pairs, in the order they were asked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Questionnaire(Map<String, Value>);

impl Questionnaire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<Value>) -> Self {
        self.0.insert(question.into(), answer.into());
        self
    }

    pub fn answers(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One bucket of the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBucket::Low => write!(f, "low"),
            RiskBucket::Medium => write!(f, "medium"),
            RiskBucket::High => write!(f, "high"),
        }
    }
}

/// Percent of capital per risk bucket. Always sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSplit {
    pub low_risk: u32,
    pub medium_risk: u32,
    pub high_risk: u32,
}

impl RiskSplit {
    /// Build a split, returning `None` unless every part is in `0..=100` and
    /// the parts sum to 100.
    pub fn try_new(low: i64, medium: i64, high: i64) -> Option<Self> {
        let part = |value: i64| u32::try_from(value).ok().filter(|p| *p <= 100);
        let split = Self {
            low_risk: part(low)?,
            medium_risk: part(medium)?,
            high_risk: part(high)?,
        };
        (split.low_risk + split.medium_risk + split.high_risk == 100).then_some(split)
    }

    pub fn get(&self, bucket: RiskBucket) -> u32 {
        match bucket {
            RiskBucket::Low => self.low_risk,
            RiskBucket::Medium => self.medium_risk,
            RiskBucket::High => self.high_risk,
        }
    }

    /// The largest bucket. Ties resolve toward the lower-risk bucket.
    pub fn dominant(&self) -> RiskBucket {
        let mut best = RiskBucket::Low;
        for bucket in [RiskBucket::Medium, RiskBucket::High] {
            if self.get(bucket) > self.get(best) {
                best = bucket;
            }
        }
        best
    }
}

impl fmt::Display for RiskSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "low {}% / medium {}% / high {}%",
            self.low_risk, self.medium_risk, self.high_risk
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_requires_exact_sum() {
        assert!(RiskSplit::try_new(20, 50, 30).is_some());
        assert!(RiskSplit::try_new(20, 50, 31).is_none());
        assert!(RiskSplit::try_new(-10, 80, 30).is_none());
        assert!(RiskSplit::try_new(0, 0, 100).is_some());
    }

    #[test]
    fn try_new_rejects_parts_outside_percent_range() {
        assert!(RiskSplit::try_new(i64::MAX, i64::MAX, 102).is_none());
        assert!(RiskSplit::try_new(i64::MIN, i64::MAX, 100).is_none());
        assert!(RiskSplit::try_new(4_294_967_296, 0, 100).is_none());
        assert!(RiskSplit::try_new(150, -50, 0).is_none());
    }

    #[test]
    fn dominant_bucket() {
        assert_eq!(RiskSplit::try_new(20, 50, 30).unwrap().dominant(), RiskBucket::Medium);
        assert_eq!(RiskSplit::try_new(10, 10, 80).unwrap().dominant(), RiskBucket::High);
        // ties lean conservative
        assert_eq!(RiskSplit::try_new(40, 40, 20).unwrap().dominant(), RiskBucket::Low);
        assert_eq!(RiskSplit::try_new(10, 45, 45).unwrap().dominant(), RiskBucket::Medium);
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let split = RiskSplit::try_new(30, 50, 20).unwrap();
        let json = serde_json::to_value(split).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "low_risk": 30, "medium_risk": 50, "high_risk": 20 })
        );
    }

    #[test]
    fn questionnaire_keeps_order() {
        let qa = Questionnaire::new()
            .with_answer("What is your investment horizon?", "5+ years")
            .with_answer("How would you react to a 20% drop?", "Buy more");
        let questions: Vec<&String> = qa.answers().keys().collect();
        assert_eq!(questions[0], "What is your investment horizon?");
        assert_eq!(qa.len(), 2);
        assert!(!qa.is_empty());
    }
}
