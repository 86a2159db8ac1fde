//! Prompt construction for the risk model.

use crate::split::Questionnaire;

/// Instructions sent ahead of the questionnaire.
const INSTRUCTIONS: &str = "\
You are a financial risk assessment expert. The questions below were designed \
to reveal an investor's appetite for risk. Based on the answers, split 100 \
points across three buckets:
- low_risk: answers indicate a conservative approach to investing
- medium_risk: answers indicate a balanced approach to investing
- high_risk: answers indicate an aggressive approach to investing";

/// Required response shape.
const RESPONSE_FORMAT: &str = r#"Respond with a JSON object of exactly this shape:
{
  "risk_score": {
    "low_risk": 0,
    "medium_risk": 0,
    "high_risk": 0
  }
}
Rules:
- All values must be integers
- low_risk + medium_risk + high_risk must equal exactly 100"#;

/// Build the full prompt for a questionnaire.
pub fn build_prompt(qa: &Questionnaire) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + RESPONSE_FORMAT.len() + 256);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\nQuestions and answers:\n");

    if qa.is_empty() {
        prompt.push_str("(no answers provided)\n");
    }
    for (question, answer) in qa.answers() {
        let answer = match answer.as_str() {
            Some(s) => s.to_string(),
            None => answer.to_string(),
        };
        prompt.push_str(&format!("Q: {question}\nA: {answer}\n"));
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_questions_in_order() {
        let qa = Questionnaire::new()
            .with_answer("Horizon?", "10 years")
            .with_answer("Loss tolerance (%)?", 25);
        let prompt = build_prompt(&qa);

        let horizon = prompt.find("Q: Horizon?\nA: 10 years").unwrap();
        let tolerance = prompt.find("Q: Loss tolerance (%)?\nA: 25").unwrap();
        assert!(horizon < tolerance);
        assert!(prompt.contains("\"risk_score\""));
        assert!(prompt.ends_with("must equal exactly 100"));
    }

    #[test]
    fn empty_questionnaire() {
        let prompt = build_prompt(&Questionnaire::new());
        assert!(prompt.contains("(no answers provided)"));
    }
}
