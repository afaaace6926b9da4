//! Parsers for the structured answer formats: matrices, intervals, and sets.
//!
//! Each adapter cuts the markup into pieces along its own delimiters, then parses every piece
//! as an ordinary expression with [`parse_statement`].

pub mod interval;
pub mod matrix;
pub mod set;

use crate::error::ParseFailure;
use mathgrade_compute::symbolic::{Statement, SymExpr};
use mathgrade_parser::{normalize::normalize, parse_expr};

/// Normalizes and parses a single expression or relation.
pub fn parse_statement(source: &str) -> Result<Statement, ParseFailure> {
    let normalized = normalize(source);
    let expr = parse_expr(&normalized)
        .map_err(|err| ParseFailure::from_diagnostic(&err, &normalized))?;
    Ok(Statement::try_from(&expr)?)
}

/// Normalizes and parses a single expression, rejecting relations.
pub fn parse_scalar(source: &str) -> Result<SymExpr, ParseFailure> {
    match parse_statement(source)? {
        Statement::Scalar(expr) => Ok(expr),
        Statement::Relation(_) => Err(ParseFailure::new(format!(
            "expected an expression, found a relation in `{}`",
            source.trim(),
        ))),
    }
}

/// Splits the input on every occurrence of `delimiter` that is not nested inside `()`, `[]`, or
/// `{}`.
///
/// Brackets that are never closed do not prevent splitting after them.
pub(crate) fn split_top_level<'a>(input: &'a str, delimiter: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut idx = 0;

    while idx < input.len() {
        let rest = &input[idx..];
        if depth == 0 && rest.starts_with(delimiter) {
            pieces.push(&input[start..idx]);
            idx += delimiter.len();
            start = idx;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {},
        }
        idx += c.len_utf8();
    }

    pieces.push(&input[start..]);
    pieces
}

/// Removes the first matching prefix and the first matching suffix, if present.
pub(crate) fn strip_delimiters<'a>(input: &'a str, prefixes: &[&str], suffixes: &[&str]) -> &'a str {
    let input = input.trim();
    let input = prefixes.iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .unwrap_or(input);
    suffixes.iter()
        .find_map(|suffix| input.strip_suffix(suffix))
        .unwrap_or(input)
        .trim()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn split_respects_nesting() {
        assert_eq!(split_top_level("1,f(2,3),4", ","), vec!["1", "f(2,3)", "4"]);
        assert_eq!(split_top_level(r"[0,2)\cup[5,9]", r"\cup"), vec!["[0,2)", "[5,9]"]);
        assert_eq!(split_top_level("", ","), vec![""]);
    }

    #[test]
    fn strip_outer_brackets() {
        assert_eq!(strip_delimiters(" [a,b:c,d] ", &["["], &["]"]), "a,b:c,d");
        assert_eq!(strip_delimiters("a,b", &["["], &["]"]), "a,b");
    }

    #[test]
    fn relation_is_not_scalar() {
        assert!(parse_scalar("x = 1").is_err());
        assert!(parse_scalar(r"\frac{1}{2}").is_ok());
    }
}
