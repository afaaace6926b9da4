use mathgrade_engine::{ConfigError, SubmissionError};
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Errors that stop the command-line tool.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be read.
    #[error("cannot read `{path}`: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The problem file is not a valid problem.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The submission file is not a valid submission.
    #[error("{0}")]
    Submission(#[from] SubmissionError),

    /// The result could not be written.
    #[error("cannot write the result: {0}")]
    Output(#[from] serde_json::Error),

    /// The interactive editor failed.
    #[error("{0}")]
    Readline(#[from] ReadlineError),
}

/// Reads a whole file into a string.
pub fn read_file(path: &str) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_string(),
        source,
    })
}
