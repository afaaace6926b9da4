//! Grading of free-form math answers.
//!
//! A [`ProblemSpec`] is loaded once from authored JSON, then any number of [`Submission`]s are
//! graded against it with [`grade`]. Grading is a pure function of the problem and the
//! submission, so one problem can be shared between threads without locking.
//!
//! ```
//! use mathgrade_engine::{grade, ProblemSpec, Submission};
//!
//! let spec = ProblemSpec::from_json(r#"{ "answers": { "0": "x", "1": "y" } }"#).unwrap();
//! let result = grade(&spec, &Submission::new(["y", "x"]));
//! assert_eq!(result.valid, Some(true));
//! ```

pub mod adapter;
pub mod config;
pub mod equivalence;
pub mod error;
pub mod matcher;
pub mod spec;
pub mod submission;
pub mod value;

pub use config::{ComparisonConfig, ComparisonMode};
pub use equivalence::is_equal;
pub use error::{ConfigError, ParseFailure, SubmissionError};
pub use matcher::grade;
pub use spec::{Distractor, ProblemSpec};
pub use submission::{EvaluationResult, Submission};
pub use value::{ParsedValue, ProblemKind};
