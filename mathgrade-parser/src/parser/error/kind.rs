use ariadne::Fmt;
use mathgrade_attrs::ErrorKind;
use mathgrade_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// An intentionally useless error. This should only be used for errors that are caught and
/// discarded by the parser, as it contains no useful information.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "an internal non-fatal error occurred while parsing",
    labels = ["here"],
    help = "you should never see this error; please report this as a bug"
)]
pub struct NonFatal;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of answer",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of answer",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis, bracket, or brace was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        format!("add a closing `{}` somewhere after this", close)
    } else {
        format!("add an opening `{}` somewhere before this", open)
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis. Otherwise, the parenthesis was a
    /// closing parenthesis.
    pub opening: bool,

    /// The opening delimiter, such as `(`.
    pub open: &'static str,

    /// The matching closing delimiter, such as `)`.
    pub close: &'static str,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A command that the parser does not know was used.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown command `\\{}`", name),
    labels = ["this command"],
    help = match suggestion {
        Some(suggestion) => format!("did you mean `{}`?", format!("\\{}", suggestion).fg(EXPR)),
        None => "check the spelling of the command".to_string(),
    },
)]
pub struct UnknownCommand {
    /// The name of the command, without the leading backslash.
    pub name: String,

    /// The most similarly named known command, if any.
    pub suggestion: Option<String>,
}

/// A command that takes an argument was not given one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing argument to `\\{}`", command),
    labels = ["this command needs an argument"],
    help = format!("write the argument in braces, as in `\\{}{{x}}`", command),
)]
pub struct MissingArgument {
    /// The name of the command, without the leading backslash.
    pub command: String,
}

/// A subscript was not followed by anything to subscript.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing subscript",
    labels = ["this subscript is empty"],
    help = format!("write the subscript in braces, as in {}", "x_{1}".fg(EXPR)),
)]
pub struct MissingSubscript;

/// More than one relation was used in a single expression, such as `1 < x < 2`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "chained relations are not supported",
    labels = ["this relation", "and this relation"],
    help = "write each relation as a separate answer",
)]
pub struct ChainedRelation;
