//! Parsed answers of every supported domain.

use crate::adapter::{interval::IntervalSet, matrix::Matrix, parse_statement, set::SetExpr};
use crate::error::ParseFailure;
use mathgrade_compute::symbolic::{Relation, Statement, SymExpr};
use mathgrade_parser::parser::fmt::Latex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};

/// The answer domain of a problem, selecting how its answers are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemKind {
    /// Expressions, equations, and inequalities.
    #[default]
    #[serde(rename = "math")]
    Math,

    #[serde(rename = "math_matrix")]
    Matrix,

    #[serde(rename = "math_interval")]
    Interval,

    #[serde(rename = "math_set")]
    Set,
}

impl ProblemKind {
    /// Parses an answer written for this kind of problem.
    pub fn parse(self, source: &str) -> Result<ParsedValue, ParseFailure> {
        Ok(match self {
            Self::Math => match parse_statement(source)? {
                Statement::Scalar(expr) => ParsedValue::Scalar(expr),
                Statement::Relation(relation) => ParsedValue::Relation(relation),
            },
            Self::Matrix => ParsedValue::Matrix(Matrix::parse(source)?),
            Self::Interval => ParsedValue::Interval(IntervalSet::parse(source)?),
            Self::Set => ParsedValue::Set(SetExpr::parse(source)?),
        })
    }
}

/// A parsed answer. Never modified after parsing.
///
/// Equality is structural: two values are equal if they were written the same way, up to the
/// order of terms and factors. Semantic equality is decided by
/// [`is_equal`](crate::equivalence::is_equal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Scalar(SymExpr),
    Relation(Relation),
    Matrix(Matrix),
    Interval(IntervalSet),
    Set(SetExpr),
}

impl ParsedValue {
    /// The name of the value's domain, used in log output.
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Relation(_) => "relation",
            Self::Matrix(_) => "matrix",
            Self::Interval(_) => "interval",
            Self::Set(_) => "set",
        }
    }

    /// The canonical textual form answers are sorted by before they are paired.
    pub fn sort_key(&self) -> String {
        self.to_string()
    }
}

impl Latex for ParsedValue {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Scalar(expr) => expr.fmt_latex(f),
            Self::Relation(relation) => relation.fmt_latex(f),
            Self::Matrix(matrix) => matrix.fmt_latex(f),
            Self::Interval(set) => set.fmt_latex(f),
            Self::Set(set) => set.fmt_latex(f),
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Scalar(expr) => write!(f, "{}", expr),
            Self::Relation(relation) => write!(f, "{}", relation),
            Self::Matrix(matrix) => write!(f, "{}", matrix),
            Self::Interval(set) => write!(f, "{}", set),
            Self::Set(set) => write!(f, "{}", set),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn kind_selects_parser() {
        assert_eq!(ProblemKind::Math.parse("2x").unwrap().domain(), "scalar");
        assert_eq!(ProblemKind::Math.parse("y = 2x").unwrap().domain(), "relation");
        assert_eq!(ProblemKind::Matrix.parse("[1,2:3,4]").unwrap().domain(), "matrix");
        assert_eq!(ProblemKind::Interval.parse("[0,1)").unwrap().domain(), "interval");
        assert_eq!(ProblemKind::Set.parse(r"\{1,2\}").unwrap().domain(), "set");
    }

    #[test]
    fn kind_names() {
        let kind: ProblemKind = serde_json::from_str("\"math_interval\"").unwrap();
        assert_eq!(kind, ProblemKind::Interval);
    }

    #[test]
    fn structural_equality() {
        let a = ProblemKind::Math.parse("x + 1").unwrap();
        let b = ProblemKind::Math.parse("1 + x").unwrap();
        let c = ProblemKind::Math.parse("2x - x + 1").unwrap();
        assert_eq!(a, b);
        assert!(a != c);
    }
}
