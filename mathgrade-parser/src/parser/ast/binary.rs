use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::{kind, Error},
    fmt::{Latex, fmt_pow},
    token::op::{Associativity, BinOp, BinOpKind, Precedence},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operator, including implicit multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `\cdot`.
    Op(BinOp),

    /// Implicit multiplication, such as `2x` or `x(x + 1)`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => Precedence::Factor,
        }
    }
}

impl From<BinOp> for BinOpExt {
    fn from(op: BinOp) -> Self {
        BinOpExt::Op(op)
    }
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the operator of the given expression if it is a relation, such as `x = 1`.
    fn relation_op(expr: &Expr) -> Option<&BinOp> {
        match expr {
            Expr::Binary(binary) if binary.op.kind.is_relation() => Some(&binary.op),
            _ => None,
        }
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    ///
    /// If we are parsing the expression `1 + 2 \cdot 3`, we will first parse the left-hand-side
    /// `1`, then the operator `+`, then the right-hand-side `2`. However, before we build the
    /// corresponding AST node, we should check if the operator after `2` has higher precedence
    /// than `+` (if it exists).
    ///
    /// If it does, we should parse the expression starting with `2` first, so that we get
    /// `2 \cdot 3` as the right-hand-side to the `1 +` node. This works by calling into
    /// [`Self::parse_expr`] again, but with `rhs` (`2` in this case) as the `lhs` argument.
    ///
    /// Implicit multiplication is also handled here. In an expression such as `1 + 2xy`, the
    /// first call to [`Self::parse_expr`] will parse `1 + 2`. However, there is no operator after
    /// `2`, so instead, we assume an implicit multiplication operator, because multiplication has
    /// higher precedence than addition, then continue with the same procedure as if the operator
    /// did exist.
    ///
    /// Since implicit multiplication creates an operator out of thin air, we must be careful not
    /// to loop forever: [`Self::parse_expr`] returns whether it consumed anything, and we stop
    /// as soon as it did not.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    // this operator has a higher precedence or it is right associative, so we
                    // should parse its expression starting with `rhs` first
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?.0;
                } else {
                    // lower precedence, or equal precedence and left-associativity, as in
                    // `1 \cdot 2 + 3` or `1 \cdot 2 \cdot 3`; the outer loop picks it up
                    break;
                }
            } else {
                // there is no operator; this could be implicit multiplication, but only if the
                // previous operator has lower precedence than multiplication
                if precedence >= BinOpKind::Mul.precedence() {
                    break;
                }

                let (expr, changed) = Self::parse_expr(input, rhs, BinOpKind::Mul.precedence())?;
                rhs = expr;

                if !changed {
                    break;
                }
            }
        }

        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        let op = match op {
            BinOpExt::Op(op) => op,
            BinOpExt::ImplicitMultiplication => BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: lhs.span().end..rhs.span().start,
            },
        };

        if op.kind.is_relation() {
            if let Some(inner) = Self::relation_op(&lhs).or_else(|| Self::relation_op(&rhs)) {
                let mut spans = vec![inner.span.clone(), op.span.clone()];
                spans.sort_by_key(|span| span.start);
                return Err(Error::new(spans, kind::ChainedRelation));
            }
        }

        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span: start_span..end_span,
        }))
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator and a right-hand-side.
    ///
    /// Returns the parsed expression, and whether anything was consumed after `lhs`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<(Expr, bool), Error> {
        let mut changed = false;
        loop {
            let mut input_ahead = input.clone();
            if let Ok(op) = input_ahead.try_parse_then::<BinOp, _>(|bin_op, input| {
                if bin_op.precedence() >= precedence {
                    Ok(())
                } else {
                    Err(input.error(kind::NonFatal))
                }
            }) {
                input.set_cursor(&input_ahead);
                let rhs = Unary::parse_or_lower(input)?;
                lhs = Self::complete_rhs(input, lhs, op.into(), rhs)?;
            } else if BinOpKind::Mul.precedence() >= precedence {
                // implicit multiplication test

                // ensure that we get here because there is *no* operator, not because the operator
                // has lower precedence
                if input_ahead.try_parse::<BinOp>().is_ok() {
                    break;
                }

                // if nothing that can start a factor follows, there is no implicit multiplication
                if !Expr::can_start_factor(&input_ahead) {
                    break;
                }

                let rhs = Unary::parse_or_lower(&mut input_ahead)?;
                if rhs.is_implicit_mul_target() {
                    input.set_cursor(&input_ahead);
                    lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
                } else {
                    break;
                }
            } else {
                break;
            }

            changed = true;
        }

        Ok((lhs, changed))
    }
}

impl Parse for Binary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let start = input.span();
        match input.try_parse::<Expr>()? {
            Expr::Binary(binary) => Ok(binary),
            _ => Err(Error::new(vec![start], kind::NonFatal)),
        }
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // operands that bind looser than this operator need parentheses, since `\frac{a+b}{c}`
        // has no explicit parentheses of its own
        let needs_paren = |expr: &Expr, is_rhs: bool| match expr {
            Expr::Binary(inner) => inner.op.precedence() < self.op.precedence()
                || (is_rhs && inner.op.precedence() == self.op.precedence()
                    && matches!(self.op.kind, BinOpKind::Sub | BinOpKind::Div))
                || (!is_rhs && self.op.kind == BinOpKind::Exp),
            _ => false,
        };

        if needs_paren(&self.lhs, false) {
            write!(f, "({})", self.lhs)?;
        } else {
            self.lhs.fmt(f)?;
        }
        self.op.fmt(f)?;
        if needs_paren(&self.rhs, true) {
            write!(f, "({})", self.rhs)
        } else {
            self.rhs.fmt(f)
        }
    }
}

impl Latex for Binary {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            BinOpKind::Exp => fmt_pow(f, Some(&*self.lhs), Some(&*self.rhs)),
            BinOpKind::Div => {
                write!(f, "\\frac{{")?;
                self.lhs.innermost().fmt_latex(f)?;
                write!(f, "}}{{")?;
                self.rhs.innermost().fmt_latex(f)?;
                write!(f, "}}")
            },
            _ => {
                self.lhs.fmt_latex(f)?;
                self.op.fmt_latex(f)?;
                self.rhs.fmt_latex(f)
            },
        }
    }
}
