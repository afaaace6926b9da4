//! Equations and inequalities.

use crate::error::{ConvertError, EvalError};
use mathgrade_parser::parser::{ast::Expr as AstExpr, fmt::Latex, token::op::BinOpKind};
use rug::Rational;
use std::fmt::{Formatter, Result as FmtResult};
use super::{
    expr::SymExpr,
    simplify::{rules::multiply::split_coefficient, simplify, Budget, SimplifyOptions},
    zero::is_zero,
};

/// The kind of a [`Relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationKind {
    /// `a = b`
    Eq,

    /// `a \ne b`
    NotEq,

    /// `a < b`
    Less,

    /// `a \le b`
    LessEq,

    /// `a > b`
    Greater,

    /// `a \ge b`
    GreaterEq,
}

impl RelationKind {
    /// Returns the relation kind of the given operator, if it is a relational operator.
    pub fn from_op(op: BinOpKind) -> Option<Self> {
        Some(match op {
            BinOpKind::Eq => Self::Eq,
            BinOpKind::NotEq => Self::NotEq,
            BinOpKind::Less => Self::Less,
            BinOpKind::LessEq => Self::LessEq,
            BinOpKind::Greater => Self::Greater,
            BinOpKind::GreaterEq => Self::GreaterEq,
            _ => return None,
        })
    }

    /// The relation that holds after swapping both sides, `a < b` becoming `b > a`.
    pub fn flipped(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::LessEq => Self::GreaterEq,
            Self::Greater => Self::Less,
            Self::GreaterEq => Self::LessEq,
            kind => kind,
        }
    }

    /// Returns true for `<`, `\le`, `>`, and `\ge`.
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq)
    }

    /// The LaTeX spelling of the operator.
    pub fn latex(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "\\ne",
            Self::Less => "<",
            Self::LessEq => "\\le",
            Self::Greater => ">",
            Self::GreaterEq => "\\ge",
        }
    }
}

/// A relation between two expressions, such as `y = 2x + 1` or `x \le 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The kind of relation.
    pub kind: RelationKind,

    /// The left-hand side.
    pub lhs: SymExpr,

    /// The right-hand side.
    pub rhs: SymExpr,
}

impl Relation {
    /// Returns the same relation written with `<`, `\le`, `=`, or `\ne`, swapping both sides of
    /// `>` and `\ge`.
    pub fn normalized(&self) -> Self {
        match self.kind {
            RelationKind::Greater | RelationKind::GreaterEq => Self {
                kind: self.kind.flipped(),
                lhs: self.rhs.clone(),
                rhs: self.lhs.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Returns `lhs - rhs`.
    pub fn difference(&self) -> SymExpr {
        self.lhs.clone() - self.rhs.clone()
    }

    /// Returns true if both relations describe the same constraint.
    ///
    /// After moving every term to the left, `a ~ 0` and `b ~ 0` are equivalent if `a = c*b` for
    /// a rational constant `c`, which must be positive for inequalities, and nonzero otherwise.
    pub fn equivalent(
        &self,
        other: &Self,
        options: &SimplifyOptions,
        budget: &mut Budget,
    ) -> std::result::Result<bool, EvalError> {
        let (lhs, rhs) = (self.normalized(), other.normalized());
        if lhs.kind != rhs.kind {
            return Ok(false);
        }

        let a = simplify(&lhs.difference(), options, budget)?;
        let b = simplify(&rhs.difference(), options, budget)?;
        if a == b {
            return Ok(true);
        }

        let Some(ratio) = proportionality(&a, &b) else {
            return Ok(false);
        };
        let allowed = if lhs.kind.is_ordering() {
            ratio > 0
        } else {
            ratio != 0
        };
        if !allowed {
            return Ok(false);
        }

        is_zero(&(a - SymExpr::rational(ratio) * b), options, budget)
    }
}

/// Returns the terms of a sum, or the expression itself.
fn terms(expr: &SymExpr) -> Vec<(Rational, SymExpr)> {
    match expr {
        SymExpr::Add(terms) => terms.iter().map(split_coefficient).collect(),
        expr => vec![split_coefficient(expr)],
    }
}

/// Finds the ratio `c` for which `a = c*b` could hold, by comparing the coefficients of the
/// first term of `b` that also appears in `a`.
fn proportionality(a: &SymExpr, b: &SymExpr) -> Option<Rational> {
    let a_terms = terms(a);
    terms(b).into_iter()
        .filter(|(coeff, _)| *coeff != 0)
        .find_map(|(b_coeff, b_rest)| {
            a_terms.iter()
                .find(|(_, a_rest)| *a_rest == b_rest)
                .map(|(a_coeff, _)| Rational::from(a_coeff / &b_coeff))
        })
}

impl Latex for Relation {
    fn fmt_latex(&self, f: &mut Formatter) -> FmtResult {
        self.lhs.fmt_latex(f)?;
        write!(f, "{}", self.kind.latex())?;
        self.rhs.fmt_latex(f)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let op = match self.kind {
            RelationKind::Eq => "=",
            RelationKind::NotEq => "!=",
            RelationKind::Less => "<",
            RelationKind::LessEq => "<=",
            RelationKind::Greater => ">",
            RelationKind::GreaterEq => ">=",
        };
        write!(f, "{} {} {}", self.lhs, op, self.rhs)
    }
}

/// A parsed answer: either a single expression, or a relation between two expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A single expression.
    Scalar(SymExpr),

    /// An equation or inequality.
    Relation(Relation),
}

impl Statement {
    /// Returns the expression of a [`Statement::Scalar`].
    pub fn as_scalar(&self) -> Option<&SymExpr> {
        match self {
            Self::Scalar(expr) => Some(expr),
            Self::Relation(_) => None,
        }
    }

    /// Returns the relation of a [`Statement::Relation`].
    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Scalar(_) => None,
            Self::Relation(relation) => Some(relation),
        }
    }

    /// Applies the given function to every expression in the statement.
    pub fn map(&self, mut f: impl FnMut(&SymExpr) -> SymExpr) -> Self {
        match self {
            Self::Scalar(expr) => Self::Scalar(f(expr)),
            Self::Relation(relation) => Self::Relation(Relation {
                kind: relation.kind,
                lhs: f(&relation.lhs),
                rhs: f(&relation.rhs),
            }),
        }
    }
}

/// Converts a parsed answer, substituting the reserved constants `e`, `i`, and `\pi`.
impl TryFrom<&AstExpr> for Statement {
    type Error = ConvertError;

    fn try_from(expr: &AstExpr) -> std::result::Result<Self, Self::Error> {
        if let AstExpr::Binary(bin) = expr {
            if let Some(kind) = RelationKind::from_op(bin.op.kind) {
                return Ok(Self::Relation(Relation {
                    kind,
                    lhs: SymExpr::try_from(&*bin.lhs)?.substitute_reserved(),
                    rhs: SymExpr::try_from(&*bin.rhs)?.substitute_reserved(),
                }));
            }
        }

        Ok(Self::Scalar(SymExpr::try_from(expr)?.substitute_reserved()))
    }
}

impl Latex for Statement {
    fn fmt_latex(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Scalar(expr) => expr.fmt_latex(f),
            Self::Relation(relation) => relation.fmt_latex(f),
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Scalar(expr) => write!(f, "{}", expr),
            Self::Relation(relation) => write!(f, "{}", relation),
        }
    }
}

#[cfg(test)]
mod tests {
    use mathgrade_parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> Statement {
        Statement::try_from(&parse_expr(input).unwrap()).unwrap()
    }

    fn relation(input: &str) -> Relation {
        parse(input).as_relation().cloned().unwrap()
    }

    fn equivalent(a: &str, b: &str) -> bool {
        relation(a)
            .equivalent(&relation(b), &SimplifyOptions::default(), &mut Budget::new(20_000))
            .unwrap()
    }

    #[test]
    fn scalar_or_relation() {
        assert!(parse("2x + 1").as_scalar().is_some());
        assert_eq!(relation(r"y \ge 2").kind, RelationKind::GreaterEq);
    }

    #[test]
    fn normalize_direction() {
        let normalized = relation("x > 1").normalized();
        assert_eq!(normalized.kind, RelationKind::Less);
        assert_eq!(normalized.lhs, SymExpr::integer(1));
    }

    #[test]
    fn equivalent_equations() {
        assert!(equivalent("y = 2x + 1", "2x + 1 = y"));
        assert!(equivalent("2y = 4x + 2", "y = 2x + 1"));
        assert!(!equivalent("y = 2x + 1", "y = 2x - 1"));
    }

    #[test]
    fn equivalent_inequalities() {
        assert!(equivalent("x < 3", "3 > x"));
        assert!(equivalent("2x < 6", "x < 3"));
        assert!(!equivalent("x < 3", "-x < -3"));
        assert!(!equivalent(r"x \le 3", "x < 3"));
    }

    #[test]
    fn latex_relation() {
        assert_eq!(relation(r"x \le 3").as_display().to_string(), r"x\le3");
    }
}
