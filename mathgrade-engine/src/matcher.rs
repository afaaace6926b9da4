//! Grading a list of student answers against a problem's reference answers.
//!
//! Both lists are sorted by their textual form and compared pair by pair, so the order in which
//! the student gives the answers does not matter. Known wrong answers ("distractors") are
//! checked first, so that a student who makes an anticipated mistake gets the targeted feedback
//! for it.

use crate::equivalence::is_equal;
use crate::error::ParseFailure;
use crate::spec::ProblemSpec;
use crate::submission::{EvaluationResult, Submission};
use crate::value::{ParsedValue, ProblemKind};
use mathgrade_compute::{symbolic::Budget, EvalError};
use mathgrade_parser::parser::fmt::Latex;
use tracing::{debug, info, instrument};

/// Default feedback key for a wrong answer.
pub const WRONG_ANSWER: &str = "_wrong_answer";

/// Default feedback key for a correct answer.
pub const CORRECT_ANSWER: &str = "_correct_answer";

/// Parses every source, stopping at the first failure.
fn parse_all<'a>(
    kind: ProblemKind,
    sources: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<ParsedValue>, ParseFailure> {
    sources.into_iter()
        .map(|source| kind.parse(source).map_err(|err| {
            debug!(target: "mathgrade::matcher", source, error = %err, "answer failed to parse");
            err
        }))
        .collect()
}

/// Feedback for an answer that failed to parse.
fn parse_error_feedback(spec: &ProblemSpec, err: &ParseFailure) -> Vec<String> {
    let mut message = err.message.clone();
    if spec.kind == ProblemKind::Set {
        message.push_str("\n\nExpected format: ");
        message.push_str(spec.format_hint());
    }
    vec![
        WRONG_ANSWER.to_string(),
        format!("Parsing error: \n\n .. code-block:: \n\n\t{}", message.replace('\n', "\n\t")),
    ]
}

/// Returns the message for a wrong number of answers, or matrices of the wrong shape.
fn count_mismatch(students: &[ParsedValue], references: &[ParsedValue]) -> Option<String> {
    if students.len() != references.len() {
        return Some(format!("Expected {} answer(s)", references.len()));
    }

    let shape_mismatch = students.iter()
        .zip(references)
        .any(|pair| match pair {
            (ParsedValue::Matrix(a), ParsedValue::Matrix(b)) => a.shape() != b.shape(),
            _ => false,
        });
    if !shape_mismatch {
        return None;
    }

    let shapes = references.iter()
        .filter_map(|reference| match reference {
            ParsedValue::Matrix(matrix) => {
                let (rows, columns) = matrix.shape();
                Some(format!("({}, {})", rows, columns))
            },
            _ => None,
        })
        .collect::<Vec<_>>();
    Some(format!("Expected {} answer(s) of size [{}]", references.len(), shapes.join(", ")))
}

/// Sorts the values by their textual form.
fn sorted(mut values: Vec<ParsedValue>) -> Vec<ParsedValue> {
    values.sort_by_cached_key(ParsedValue::sort_key);
    values
}

/// Grades a submission.
///
/// Every failure, including answers that fail to parse and comparisons that exceed the
/// simplification budget, is reported in the returned result.
#[instrument(skip_all, fields(kind = ?spec.kind, answers = submission.answers.len()))]
pub fn grade(spec: &ProblemSpec, submission: &Submission) -> EvaluationResult {
    let result = grade_inner(spec, submission);
    info!(
        target: "mathgrade::matcher",
        valid = ?result.valid,
        feedback = ?result.feedback,
        "submission graded",
    );
    result
}

fn grade_inner(spec: &ProblemSpec, submission: &Submission) -> EvaluationResult {
    let prior_state = || submission.prior_state.clone();
    if spec.is_ungraded() {
        return EvaluationResult::new(None, Vec::new(), 0, prior_state());
    }

    let parsed = parse_all(spec.kind, submission.answers.iter().map(String::as_str))
        .and_then(|students| {
            let references = parse_all(spec.kind, spec.answers.iter().map(String::as_str))?;
            let distractors = parse_all(spec.kind, spec.distractors.iter().map(|d| d.answer.as_str()))?;
            Ok((students, references, distractors))
        });
    let (students, references, distractors) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => return EvaluationResult::new(Some(false), parse_error_feedback(spec, &err), 1, prior_state()),
    };

    let sorted_students = sorted(students.clone());
    let references = sorted(references);
    if let Some(message) = count_mismatch(&sorted_students, &references) {
        return EvaluationResult::new(Some(false), vec![message], 0, prior_state());
    }

    let renderings = sorted_students.iter()
        .map(|student| student.as_display().to_string())
        .collect::<Vec<_>>();
    let state = serde_json::to_string(&renderings).unwrap_or_default();

    let mut budget = Budget::new(spec.config.budget);
    match compare(spec, &students, &sorted_students, &references, &distractors, &mut budget) {
        Ok(Verdict::Distractor(idx)) => EvaluationResult::new(
            Some(false),
            vec![spec.distractors[idx].feedback.clone()],
            0,
            state,
        ),
        Ok(Verdict::Wrong(idx)) => EvaluationResult::new(
            Some(false),
            vec![
                wrong_answer_message(spec),
                format!("Not correct : :math:`{}`", renderings[idx]),
            ],
            0,
            state,
        ),
        Ok(Verdict::Correct) => EvaluationResult::new(
            Some(true),
            vec![spec.success_message.clone().unwrap_or_else(|| CORRECT_ANSWER.to_string())],
            0,
            state,
        ),
        Err(err) => EvaluationResult::new(
            Some(false),
            vec![wrong_answer_message(spec), format!("Evaluation too complex: {}", err)],
            0,
            state,
        ),
    }
}

fn wrong_answer_message(spec: &ProblemSpec) -> String {
    spec.error_message.clone().unwrap_or_else(|| WRONG_ANSWER.to_string())
}

/// The outcome of comparing the parsed answers.
enum Verdict {
    /// The student gave the distractor at this index.
    Distractor(usize),

    /// The sorted student answer at this index is wrong.
    Wrong(usize),

    Correct,
}

fn compare(
    spec: &ProblemSpec,
    students: &[ParsedValue],
    sorted_students: &[ParsedValue],
    references: &[ParsedValue],
    distractors: &[ParsedValue],
    budget: &mut Budget,
) -> Result<Verdict, EvalError> {
    for (idx, distractor) in distractors.iter().enumerate() {
        for student in students {
            if is_equal(student, distractor, &spec.config, budget)? {
                debug!(target: "mathgrade::matcher", distractor = idx, "distractor matched");
                return Ok(Verdict::Distractor(idx));
            }
        }
    }

    for (idx, (student, reference)) in sorted_students.iter().zip(references).enumerate() {
        if !is_equal(student, reference, &spec.config, budget)? {
            return Ok(Verdict::Wrong(idx));
        }
    }
    Ok(Verdict::Correct)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn spec(json: &str) -> ProblemSpec {
        ProblemSpec::from_json(json).unwrap()
    }

    #[test]
    fn ungraded_echoes_state() {
        let submission = Submission {
            answers: vec!["x".to_string()],
            prior_state: "previous".to_string(),
        };
        let result = grade(&spec("{}"), &submission);
        assert_eq!(result.valid, None);
        assert_eq!(result.state, "previous");
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn correct_answer() {
        let result = grade(&spec(r#"{ "answer": "2x+1" }"#), &Submission::new(["x+x+1"]));
        assert!(result.is_correct());
        assert_eq!(result.feedback, vec![CORRECT_ANSWER]);
        assert_eq!(result.weight, 0);
        let state: Vec<String> = serde_json::from_str(&result.state).unwrap();
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn wrong_answer() {
        let result = grade(
            &spec(r#"{ "answer": "2x+1", "error_message": "Try again" }"#),
            &Submission::new(["2x-1"]),
        );
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.feedback.len(), 2);
        assert_eq!(result.feedback[0], "Try again");
        assert!(result.feedback[1].starts_with("Not correct : :math:`"));
    }

    #[test]
    fn parse_error() {
        let submission = Submission {
            answers: vec![r"\frac{1}{".to_string()],
            prior_state: "previous".to_string(),
        };
        let result = grade(&spec(r#"{ "answer": "1" }"#), &submission);
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.weight, 1);
        assert_eq!(result.state, "previous");
        assert_eq!(result.feedback[0], WRONG_ANSWER);
        assert!(result.feedback[1].starts_with("Parsing error: \n\n .. code-block:: \n\n\t"));
    }

    #[test]
    fn count_mismatch_keeps_state() {
        let submission = Submission {
            answers: vec!["x".to_string()],
            prior_state: "previous".to_string(),
        };
        let result = grade(&spec(r#"{ "answers": { "0": "x", "1": "y" } }"#), &submission);
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.feedback, vec!["Expected 2 answer(s)"]);
        assert_eq!(result.state, "previous");
    }

    #[test]
    fn matrix_shape() {
        let result = grade(
            &spec(r#"{ "type": "math_matrix", "answer": "[1,2:3,4]" }"#),
            &Submission::new(["[1,2,3,4]"]),
        );
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.feedback, vec!["Expected 1 answer(s) of size [(2, 2)]"]);
    }

    #[test]
    fn distractor_takes_precedence() {
        let spec = spec(r#"{
            "answer": "2x",
            "choices": { "0": { "answer": "x+x", "feedback": "Simplify your answer." } }
        }"#);
        let result = grade(&spec, &Submission::new(["x+x"]));
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.feedback, vec!["Simplify your answer."]);
    }

    #[test]
    fn budget_overrun() {
        let spec = spec(r#"{ "answer": "(x+1)^6", "budget": 5 }"#);
        let result = grade(&spec, &Submission::new(["(x-1)^6"]));
        assert_eq!(result.valid, Some(false));
        assert!(result.feedback[1].starts_with("Evaluation too complex: "));
    }
}
