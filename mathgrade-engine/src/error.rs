//! Errors produced while loading problems and parsing answers.

use mathgrade_compute::ConvertError;
use mathgrade_error::Error as DiagnosticError;
use thiserror::Error;

/// A problem specification could not be loaded. This is an authoring mistake, reported when the
/// problem is loaded and never shown to a student.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The specification is not valid JSON, or has the wrong shape.
    #[error("invalid problem specification: {0}")]
    Json(#[from] serde_json::Error),

    /// The tolerance is not a finite, non-negative number.
    #[error("invalid tolerance `{0}`")]
    Tolerance(String),

    /// A keyed collection has a key that is not an integer.
    #[error("invalid key `{key}` in `{field}`, expected an integer")]
    Key {
        field: &'static str,
        key: String,
    },

    /// A boolean flag has a value that is not a boolean.
    #[error("invalid value `{value}` for `{field}`, expected a boolean")]
    Flag {
        field: &'static str,
        value: String,
    },

    /// `set_type` is neither `explicit` nor `implicit`.
    #[error("invalid set type `{0}`, expected `explicit` or `implicit`")]
    SetType(String),

    /// A choice has no answer.
    #[error("choice `{0}` has no answer")]
    ChoiceAnswer(String),
}

/// A submission does not have the expected shape.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The task input is not valid JSON.
    #[error("invalid submission: {0}")]
    Json(#[from] serde_json::Error),

    /// The task input has no answers for the problem.
    #[error("no answer submitted for problem `{0}`")]
    Missing(String),

    /// The answers of the problem are not strings.
    #[error("the answers to problem `{0}` must be strings")]
    NotText(String),
}

/// An answer could not be parsed.
///
/// The message is shown to the author or student as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
}

impl ParseFailure {
    /// Creates a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Renders a parser diagnostic against the markup it was produced from.
    pub fn from_diagnostic(err: &DiagnosticError, source: &str) -> Self {
        Self::new(err.to_plain_report("answer", source))
    }
}

impl From<ConvertError> for ParseFailure {
    fn from(err: ConvertError) -> Self {
        Self::new(err.to_string())
    }
}
