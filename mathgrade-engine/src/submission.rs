//! The wire format of student submissions and grading results.

use crate::error::SubmissionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the prior state in a submission.
pub const STATE_KEY: &str = "@state";

/// The answers a student submitted for one problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// One markup string per expected answer.
    pub answers: Vec<String>,

    /// The state returned by the previous grading of this problem, echoed back when no new
    /// snapshot is produced.
    pub prior_state: String,
}

impl Submission {
    /// Creates a submission with no prior state.
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prior_state: String::new(),
        }
    }

    /// Reads the submission for the given problem from the task input, a JSON object such as
    /// `{ "q1": ["x", "y"], "@state": "{\"q1\": \"...\"}" }`.
    ///
    /// A single answer may be given as a string instead of a list. A prior state that is missing
    /// or unreadable is treated as empty.
    pub fn from_task_input(input: &Value, problem_id: &str) -> Result<Self, SubmissionError> {
        let answers = match input.get(problem_id) {
            None => return Err(SubmissionError::Missing(problem_id.to_string())),
            Some(Value::String(answer)) => vec![answer.clone()],
            Some(Value::Array(answers)) => answers.iter()
                .map(|answer| answer.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| SubmissionError::NotText(problem_id.to_string()))?,
            Some(_) => return Err(SubmissionError::NotText(problem_id.to_string())),
        };

        Ok(Self {
            answers,
            prior_state: prior_state(input, problem_id),
        })
    }

    /// Parses the task input from JSON text, then reads the submission for the given problem.
    pub fn from_json(source: &str, problem_id: &str) -> Result<Self, SubmissionError> {
        let input: Value = serde_json::from_str(source)?;
        Self::from_task_input(&input, problem_id)
    }
}

/// Reads this problem's entry of the `@state` object, which is itself serialized as a string.
fn prior_state(input: &Value, problem_id: &str) -> String {
    input.get(STATE_KEY)
        .and_then(Value::as_str)
        .and_then(|state| serde_json::from_str::<Value>(state).ok())
        .and_then(|state| state.get(problem_id).and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}

/// The outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// `true` if correct, `false` if incorrect, or `null` for an ungraded problem.
    pub valid: Option<bool>,

    /// Unused; always `null`.
    pub multiplier: Option<f64>,

    /// Message keys and messages, in display order.
    pub feedback: Vec<String>,

    /// 1 if an answer failed to parse, 0 otherwise.
    pub weight: u32,

    /// A snapshot of the sorted answers, or the prior state.
    pub state: String,
}

impl EvaluationResult {
    pub(crate) fn new(valid: Option<bool>, feedback: Vec<String>, weight: u32, state: String) -> Self {
        Self { valid, multiplier: None, feedback, weight, state }
    }

    /// Returns true if the submission was graded as correct.
    pub fn is_correct(&self) -> bool {
        self.valid == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use super::*;

    #[test]
    fn answers_and_state() {
        let input = json!({
            "q1": ["x", "y"],
            "@state": "{\"q1\": \"[\\\"x\\\"]\", \"q2\": \"other\"}",
        });
        let submission = Submission::from_task_input(&input, "q1").unwrap();
        assert_eq!(submission.answers, vec!["x", "y"]);
        assert_eq!(submission.prior_state, r#"["x"]"#);
    }

    #[test]
    fn single_answer() {
        let submission = Submission::from_json(r#"{ "q1": "2x" }"#, "q1").unwrap();
        assert_eq!(submission, Submission::new(["2x"]));
    }

    #[test]
    fn unreadable_state() {
        let input = json!({ "q1": [], "@state": "not json" });
        assert_eq!(Submission::from_task_input(&input, "q1").unwrap().prior_state, "");
    }

    #[test]
    fn missing_problem() {
        let input = json!({ "q2": ["x"] });
        assert!(matches!(Submission::from_task_input(&input, "q1"), Err(SubmissionError::Missing(_))));
        let input = json!({ "q1": [1, 2] });
        assert!(matches!(Submission::from_task_input(&input, "q1"), Err(SubmissionError::NotText(_))));
    }

    #[test]
    fn result_wire_format() {
        let result = EvaluationResult::new(Some(true), vec!["_correct_answer".to_string()], 0, "[]".to_string());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({
            "valid": true,
            "multiplier": null,
            "feedback": ["_correct_answer"],
            "weight": 0,
            "state": "[]",
        }));
    }
}
