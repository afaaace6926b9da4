//! Normalizer, tokenizer, and parser for typeset math answers.
//!
//! Answers arrive as LaTeX-like markup typed by students, such as `\frac{1}{2}x^{2}` or
//! `y \leq 3x`. The [`normalize`](normalize::normalize) step rewrites the many equivalent
//! spellings of the same thing into one canonical spelling, and the [`Parser`](parser::Parser)
//! builds an [`Expr`](parser::ast::Expr) from the normalized text.
//!
//! ```
//! use mathgrade_parser::{normalize::normalize, parse_expr};
//!
//! let source = normalize(r"\dfrac{1}{2}\cdot x");
//! let expr = parse_expr(&source).unwrap();
//! assert_eq!(expr.to_string(), "1/2*x");
//! ```

pub mod normalize;
pub mod parser;
pub mod tokenizer;

use parser::{ast::Expr, error::Error, Parser};
use tracing::debug;

/// Parses a single expression from already normalized markup. Every token must be consumed.
///
/// Spans in the returned expression or error point into `source`.
pub fn parse_expr(source: &str) -> Result<Expr, Error> {
    let mut parser = Parser::new(source);
    parser.try_parse_full::<Expr>().map_err(|err| {
        debug!(target: "mathgrade::parse", source, error = %err.message(), "parse failed");
        err
    })
}
