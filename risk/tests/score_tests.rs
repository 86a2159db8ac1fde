//! Tests for RiskScorer::score against mock models.

use tiervault_risk::mock::MockModel;
use tiervault_risk::{Questionnaire, RiskBucket, RiskScorer, ScoreError};

fn questionnaire() -> Questionnaire {
    Questionnaire::new()
        .with_answer("What is your investment horizon?", "More than 10 years")
        .with_answer("How would you react to a 30% drawdown?", "Buy more")
        .with_answer("What share of your savings is this?", "Under 10%")
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn aggressive_answers_score_high() {
    let model = MockModel::replying(
        "Based on the answers:\n{\"risk_score\": {\"low_risk\": 10, \"medium_risk\": 25, \"high_risk\": 65}}",
    );
    let scorer = RiskScorer::new(model);

    let split = scorer.score(&questionnaire()).unwrap();
    assert_eq!(split.low_risk + split.medium_risk + split.high_risk, 100);
    assert_eq!(split.dominant(), RiskBucket::High);
}

#[test]
fn prompt_carries_every_answer() {
    let scorer = RiskScorer::new(MockModel::replying(
        r#"{"risk_score":{"low_risk":34,"medium_risk":33,"high_risk":33}}"#,
    ));
    scorer.score(&questionnaire()).unwrap();

    let prompts = scorer.model().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("More than 10 years"));
    assert!(prompts[0].contains("Buy more"));
    assert!(prompts[0].contains("Under 10%"));
}

#[test]
fn closure_model() {
    let scorer = RiskScorer::new(|prompt: &str| -> Result<String, String> {
        assert!(prompt.contains("investment horizon"));
        Ok(r#"{"low_risk": 70, "medium_risk": 20, "high_risk": 10}"#.to_string())
    });
    let split = scorer.score(&questionnaire()).unwrap();
    assert_eq!(split.dominant(), RiskBucket::Low);
}

// ============================================================================
// Failures carry the raw response
// ============================================================================

#[test]
fn transport_failure() {
    let scorer = RiskScorer::new(MockModel::failing("connection reset"));
    match scorer.score(&questionnaire()).unwrap_err() {
        ScoreError::Model(msg) => assert_eq!(msg, "connection reset"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn refusal_keeps_raw_text() {
    let raw = "Sorry, I can't provide financial advice.";
    let scorer = RiskScorer::new(MockModel::replying(raw));
    let err = scorer.score(&questionnaire()).unwrap_err();
    assert!(matches!(err, ScoreError::NoJson { .. }));
    assert_eq!(err.raw(), Some(raw));
}

#[test]
fn bad_arithmetic_rejected() {
    let raw = r#"{"risk_score":{"low_risk":40,"medium_risk":40,"high_risk":40}}"#;
    let scorer = RiskScorer::new(MockModel::replying(raw));
    let err = scorer.score(&questionnaire()).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidSplit { .. }));
    assert_eq!(err.raw(), Some(raw));
}

#[test]
fn queued_responses_replay_in_order() {
    let model = MockModel::default()
        .then_reply("not json")
        .then_reply(r#"{"risk_score":{"low_risk":50,"medium_risk":50,"high_risk":0}}"#);
    let scorer = RiskScorer::new(model);

    assert!(scorer.score(&questionnaire()).is_err());
    let split = scorer.score(&questionnaire()).unwrap();
    assert_eq!(split.high_risk, 0);
    // last response sticks
    assert!(scorer.score(&questionnaire()).is_ok());
    assert_eq!(scorer.model().prompts().len(), 3);
}

#[test]
fn empty_questionnaire_still_scored() {
    let scorer = RiskScorer::new(MockModel::replying(
        r#"{"risk_score":{"low_risk":100,"medium_risk":0,"high_risk":0}}"#,
    ));
    let split = scorer.score(&Questionnaire::new()).unwrap();
    assert_eq!(split.low_risk, 100);
}
