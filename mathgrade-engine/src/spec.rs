//! Loading problem specifications from authored JSON.
//!
//! Authored data is loose: flags may be booleans or the strings `"on"` and `"true"`, the
//! tolerance may be a number or a possibly empty string, and answers and choices are maps keyed
//! by their position. [`ProblemSpec::from_json`] validates all of it once, when the problem is
//! loaded; a malformed specification is a [`ConfigError`], never a grading failure.

use crate::adapter::set::SetFormat;
use crate::config::{ComparisonConfig, ComparisonMode, DEFAULT_BUDGET};
use crate::error::ConfigError;
use crate::value::ProblemKind;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// A known wrong answer, with the feedback shown to a student who submits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distractor {
    pub answer: String,
    pub feedback: String,
}

/// A validated problem. Read-only once loaded, and shared freely between graders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSpec {
    pub name: Option<String>,
    pub kind: ProblemKind,
    pub header: String,
    pub hints: String,

    /// The reference answers, in authored order. An empty list makes the problem ungraded.
    pub answers: Vec<String>,

    /// Known wrong answers, checked in authored order before the reference answers.
    pub distractors: Vec<Distractor>,

    pub config: ComparisonConfig,

    /// Feedback for a wrong answer. Defaults to `_wrong_answer`.
    pub error_message: Option<String>,

    /// Feedback for a correct answer. Defaults to `_correct_answer`.
    pub success_message: Option<String>,

    /// The answer format of a set problem.
    pub set_format: Option<SetFormat>,
}

/// A map keyed by position, or a plain list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keyed<T> {
    Map(BTreeMap<String, T>),
    List(Vec<T>),
}

impl<T> Keyed<T> {
    /// Returns the entries ordered by their integer key, along with the keys.
    fn into_ordered(self, field: &'static str) -> Result<Vec<(String, T)>, ConfigError> {
        match self {
            Self::List(list) => Ok(list.into_iter()
                .enumerate()
                .map(|(idx, value)| (idx.to_string(), value))
                .collect()),
            Self::Map(map) => {
                let mut entries = map.into_iter()
                    .map(|(key, value)| match key.trim().parse::<i64>() {
                        Ok(idx) => Ok((idx, key, value)),
                        Err(_) => Err(ConfigError::Key { field, key }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                entries.sort_by_key(|(idx, _, _)| *idx);
                Ok(entries.into_iter().map(|(_, key, value)| (key, value)).collect())
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSpec {
    #[serde(rename = "type", default)]
    kind: ProblemKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    header: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    answers: Option<Keyed<String>>,
    #[serde(default)]
    tolerance: Option<Value>,
    #[serde(default)]
    hints: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    success_message: Option<String>,
    #[serde(default)]
    choices: Option<Keyed<RawChoice>>,
    #[serde(default)]
    comparison_type: Option<ComparisonMode>,
    #[serde(default)]
    use_log: Option<Value>,
    #[serde(default)]
    use_trigo: Option<Value>,
    #[serde(default)]
    use_complex: Option<Value>,
    #[serde(default)]
    set_type: Option<String>,
    #[serde(default)]
    budget: Option<usize>,
}

/// Returns [`None`] for a missing or blank string.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

fn parse_tolerance(value: Option<Value>) -> Result<Option<f64>, ConfigError> {
    let tolerance = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => text.trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::Tolerance(text.clone()))?,
        Some(Value::Number(number)) => number.as_f64()
            .ok_or_else(|| ConfigError::Tolerance(number.to_string()))?,
        Some(other) => return Err(ConfigError::Tolerance(other.to_string())),
    };

    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ConfigError::Tolerance(tolerance.to_string()));
    }
    Ok(Some(tolerance))
}

fn parse_flag(field: &'static str, value: Option<Value>) -> Result<bool, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(flag),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" | "yes" => Ok(true),
            "false" | "off" | "0" | "no" | "" => Ok(false),
            _ => Err(ConfigError::Flag { field, value: text }),
        },
        Some(Value::Number(number)) => match number.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ConfigError::Flag { field, value: number.to_string() }),
        },
        Some(other) => Err(ConfigError::Flag { field, value: other.to_string() }),
    }
}

fn parse_set_format(value: Option<String>) -> Result<Option<SetFormat>, ConfigError> {
    match non_blank(value) {
        None => Ok(None),
        Some(text) => match text.trim() {
            "explicit" => Ok(Some(SetFormat::Explicit)),
            "implicit" => Ok(Some(SetFormat::Implicit)),
            _ => Err(ConfigError::SetType(text)),
        },
    }
}

impl ProblemSpec {
    /// Loads a problem from authored JSON.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let raw: RawSpec = serde_json::from_str(source)?;
        Self::from_raw(raw)
    }

    /// Loads a problem from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let raw: RawSpec = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSpec) -> Result<Self, ConfigError> {
        let answers: Vec<String> = match (raw.answers, raw.answer) {
            (Some(answers), _) => answers.into_ordered("answers")?
                .into_iter()
                .map(|(_, answer)| answer)
                .collect(),
            (None, Some(answer)) => vec![answer],
            (None, None) => Vec::new(),
        };
        let answers = answers.into_iter()
            .filter(|answer| !answer.trim().is_empty())
            .collect::<Vec<_>>();

        let mut distractors = Vec::new();
        if let Some(choices) = raw.choices {
            for (key, choice) in choices.into_ordered("choices")? {
                let Some(feedback) = non_blank(choice.feedback) else {
                    continue;
                };
                let answer = non_blank(choice.answer).ok_or(ConfigError::ChoiceAnswer(key))?;
                distractors.push(Distractor { answer, feedback });
            }
        }

        let config = ComparisonConfig {
            tolerance: parse_tolerance(raw.tolerance)?,
            mode: raw.comparison_type.unwrap_or_default(),
            use_log: parse_flag("use_log", raw.use_log)?,
            use_trigonometric: parse_flag("use_trigo", raw.use_trigo)?,
            allow_complex: parse_flag("use_complex", raw.use_complex)?,
            budget: raw.budget.unwrap_or(DEFAULT_BUDGET),
        };

        let spec = Self {
            name: non_blank(raw.name),
            kind: raw.kind,
            header: raw.header.unwrap_or_default(),
            hints: raw.hints.unwrap_or_default(),
            answers,
            distractors,
            config,
            error_message: non_blank(raw.error_message),
            success_message: non_blank(raw.success_message),
            set_format: parse_set_format(raw.set_type)?,
        };
        debug!(
            target: "mathgrade::spec",
            kind = ?spec.kind,
            answers = spec.answers.len(),
            distractors = spec.distractors.len(),
            "problem loaded",
        );
        Ok(spec)
    }

    /// Returns true if the problem has no reference answers, and so is never graded.
    pub fn is_ungraded(&self) -> bool {
        self.answers.is_empty()
    }

    /// An example of the expected answer format.
    pub fn format_hint(&self) -> &'static str {
        match self.kind {
            ProblemKind::Math => "expression: 5x+3  equation: x=y+3",
            ProblemKind::Matrix => "matrix: a,b:c,d  vector: a,b,c",
            ProblemKind::Interval => "[0,2]\\cup[5,\\infty)",
            ProblemKind::Set => SetFormat::hint(self.set_format),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn legacy_single_answer() {
        let spec = ProblemSpec::from_json(r#"{ "answer": "2x+1" }"#).unwrap();
        assert_eq!(spec.answers, vec!["2x+1".to_string()]);
        assert_eq!(spec.kind, ProblemKind::Math);
        assert_eq!(spec.config, ComparisonConfig::default());
    }

    #[test]
    fn keyed_answers_are_ordered() {
        let spec = ProblemSpec::from_json(r#"{
            "answers": { "10": "c", "2": "b", "0": "a" }
        }"#).unwrap();
        assert_eq!(spec.answers, vec!["a", "b", "c"]);
    }

    #[test]
    fn bad_key() {
        let err = ProblemSpec::from_json(r#"{ "answers": { "first": "a" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Key { field: "answers", .. }));
    }

    #[test]
    fn tolerance() {
        let parse = |tolerance: &str| {
            ProblemSpec::from_json(&format!(r#"{{ "answer": "1", "tolerance": {} }}"#, tolerance))
                .map(|spec| spec.config.tolerance)
        };
        assert_eq!(parse(r#""0.01""#).unwrap(), Some(0.01));
        assert_eq!(parse("0.5").unwrap(), Some(0.5));
        assert_eq!(parse(r#""""#).unwrap(), None);
        assert!(matches!(parse(r#""abc""#), Err(ConfigError::Tolerance(_))));
        assert!(matches!(parse(r#""-1""#), Err(ConfigError::Tolerance(_))));
    }

    #[test]
    fn choices() {
        let spec = ProblemSpec::from_json(r#"{
            "answer": "2x",
            "choices": {
                "1": { "answer": "x^2", "feedback": "" },
                "0": { "answer": "2", "feedback": "Keep the variable." }
            }
        }"#).unwrap();
        assert_eq!(spec.distractors, vec![Distractor {
            answer: "2".to_string(),
            feedback: "Keep the variable.".to_string(),
        }]);

        let err = ProblemSpec::from_json(r#"{ "choices": { "0": { "feedback": "no" } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ChoiceAnswer(_)));
    }

    #[test]
    fn flags_and_messages() {
        let spec = ProblemSpec::from_json(r#"{
            "type": "math_set",
            "answer": "\\{1\\}",
            "comparison_type": "perfect_match",
            "use_log": "on",
            "use_trigo": true,
            "use_complex": "",
            "error_message": "  ",
            "success_message": "Well done",
            "set_type": "implicit"
        }"#).unwrap();
        assert!(spec.config.is_perfect_match());
        assert!(spec.config.use_log);
        assert!(spec.config.use_trigonometric);
        assert!(!spec.config.allow_complex);
        assert_eq!(spec.error_message, None);
        assert_eq!(spec.success_message.as_deref(), Some("Well done"));
        assert_eq!(spec.format_hint(), "Implicit: {x|x<4|N}");

        let err = ProblemSpec::from_json(r#"{ "use_log": "maybe" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Flag { field: "use_log", .. }));
    }

    #[test]
    fn ungraded() {
        assert!(ProblemSpec::from_json("{}").unwrap().is_ungraded());
        assert!(ProblemSpec::from_json("[1, 2]").is_err());
    }
}
