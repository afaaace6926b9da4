use crate::parser::{
    ast::{binary::Binary, expr::Expr},
    error::{kind, Error},
    fmt::Latex,
    token::op::{Associativity, UnaryOp, UnaryOpKind},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attempt to parse a unary operator with the correct associativity. Returns a non-fatal error if
/// the operator is not of the correct associativity.
fn try_parse_unary_op(input: &mut Parser, associativity: Associativity) -> Result<UnaryOp, Error> {
    input.try_parse_then::<UnaryOp, _>(|op, input| {
        if op.associativity() == associativity {
            Ok(())
        } else {
            Err(input.error(kind::NonFatal))
        }
    })
}

/// A unary expression, such as `-x` or `3!`. Unary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression (left or right, depending on the associativity).
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or lower precedence expressions.
    ///
    /// Prefix operators (`-x`) take as their operand everything of higher precedence that
    /// follows, so `-x^2` is `-(x^2)`. Postfix operators (`x!`) apply to the primary expression
    /// directly before them.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if let Ok(op) = try_parse_unary_op(input, Associativity::Right) {
            let start_span = op.span.start;
            let operand = {
                let lhs = Self::parse_or_lower(input)?;
                Binary::parse_expr(input, lhs, op.precedence())?.0
            };
            let end_span = operand.span().end;
            return Ok(Expr::Unary(Self {
                operand: Box::new(operand),
                op,
                span: start_span..end_span,
            }));
        }

        let mut result = Expr::parse_primary(input)?;
        let start_span = result.span().start;

        // iteratively find any left-associative operators
        while let Ok(op) = try_parse_unary_op(input, Associativity::Left) {
            let end_span = op.span.end;
            result = Expr::Unary(Self {
                operand: Box::new(result),
                op,
                span: start_span..end_span,
            });
        }

        Ok(result)
    }
}

impl Parse for Unary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let start = input.span();
        match Self::parse_or_lower(input)? {
            Expr::Unary(unary) => Ok(unary),
            _ => Err(Error::new(vec![start], kind::NonFatal)),
        }
    }
}

impl std::fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            UnaryOpKind::Factorial => write!(f, "{}{}", self.operand, self.op),
            UnaryOpKind::Neg | UnaryOpKind::Pos => write!(f, "{}{}", self.op, self.operand),
        }
    }
}

impl Latex for Unary {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            UnaryOpKind::Factorial => {
                self.operand.fmt_latex(f)?;
                self.op.fmt_latex(f)
            },
            UnaryOpKind::Neg | UnaryOpKind::Pos => {
                self.op.fmt_latex(f)?;
                self.operand.fmt_latex(f)
            },
        }
    }
}
