//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors are rendered in two ways: as a colored [`ariadne`] report written to stderr (used by
//! the command line tools), or as a plain-text report with all ANSI escapes removed, which is
//! what gets embedded into grading feedback shown to students.

// lets the `ErrorKind` derive refer to `mathgrade_error::EXPR` from inside this crate's tests
extern crate self as mathgrade_error;

use ariadne::{Color, Report, Source};
use std::{fmt::{self, Debug, Display}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// The one-line message of this error, without any source code context.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// The one-line message of this error.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Converts the byte spans of this error into character spans that lie within the given
    /// source, which is what [`ariadne`] expects. An empty span is widened to cover one
    /// character, so that spans pointing at the end of the source remain visible.
    fn char_spans(&self, input: &str) -> Vec<Range<usize>> {
        let len = input.chars().count();
        let to_char = |byte: usize| {
            input.char_indices().take_while(|(idx, _)| *idx < byte).count()
        };

        self.spans
            .iter()
            .map(|span| {
                let start = to_char(span.start).min(len.saturating_sub(1));
                let end = to_char(span.end).min(len).max(start + 1);
                start..end
            })
            .collect()
    }

    /// Writes the report for this error into the given writer, highlighting the given source.
    fn write_report(&self, src_id: &str, input: &str, writer: impl std::io::Write) -> std::io::Result<()> {
        self.kind
            .build_report(src_id, &self.char_spans(input))
            .write((src_id, Source::from(input)), writer)
    }

    /// Report this error to stderr, highlighting the given source.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) {
        if self.spans.is_empty() || input.is_empty() || self.write_report(src_id, input, std::io::stderr()).is_err() {
            eprintln!("{}", self.message());
        }
    }

    /// Renders the report for this error as plain text, with ANSI escapes stripped.
    ///
    /// If the error points at no source code, or the report cannot be written, the one-line
    /// message is returned instead.
    pub fn to_plain_report(&self, src_id: &str, input: &str) -> String {
        if self.spans.is_empty() || input.is_empty() {
            return self.message();
        }

        let mut buf = Vec::new();
        if self.write_report(src_id, input, &mut buf).is_err() {
            return self.message();
        }

        let stripped = strip_ansi_escapes::strip(buf);
        String::from_utf8_lossy(&stripped).trim_end().to_string()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use mathgrade_attrs::ErrorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("unknown command `\\{}`", name),
        labels = ["this command"],
        help = "check the spelling",
    )]
    struct UnknownThing {
        name: String,
    }

    #[test]
    fn message_uses_fields() {
        let err = Error::new(vec![0..5], UnknownThing { name: "fracc".to_string() });
        assert_eq!(err.message(), "unknown command `\\fracc`");
        assert_eq!(err.to_string(), "unknown command `\\fracc`");
    }

    #[test]
    fn plain_report_has_no_escapes() {
        let err = Error::new(vec![0..6], UnknownThing { name: "fracc".to_string() });
        let report = err.to_plain_report("answer", "\\fracc{1}{2}");
        assert!(!report.contains('\u{1b}'));
        assert!(report.contains("unknown command `\\fracc`"));
        assert!(report.contains("this command"));
        assert!(report.contains("check the spelling"));
    }

    #[test]
    fn no_spans_does_not_panic() {
        let err = Error::new(Vec::new(), UnknownThing { name: "x".to_string() });
        assert_eq!(err.to_plain_report("answer", ""), "unknown command `\\x`");
    }

    #[test]
    fn span_past_end_is_clamped() {
        let err = Error::new(vec![4..4], UnknownThing { name: "x".to_string() });
        let report = err.to_plain_report("answer", "1 + ");
        assert!(report.contains("this command"));
    }
}
