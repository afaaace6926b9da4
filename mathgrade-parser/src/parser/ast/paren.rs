use crate::{
    parser::{
        ast::expr::Expr,
        error::{kind, Error},
        fmt::Latex,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of brackets surrounding a grouped expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParenKind {
    /// Parentheses, `(x)`.
    Round,

    /// Square brackets, `[x]`.
    Square,

    /// Braces, `{x}`, which group without being typeset.
    Curly,
}

impl ParenKind {
    /// Returns the kind of group opened by the given token kind, if any.
    pub fn from_open(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::OpenParen => Some(Self::Round),
            TokenKind::OpenSquare => Some(Self::Square),
            TokenKind::OpenCurly => Some(Self::Curly),
            _ => None,
        }
    }

    /// Returns the opening and closing delimiters of this kind of group.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Round => ("(", ")"),
            Self::Square => ("[", "]"),
            Self::Curly => ("{", "}"),
        }
    }

    /// Returns the token kind that closes this kind of group.
    pub fn close(self) -> TokenKind {
        match self {
            Self::Round => TokenKind::CloseParen,
            Self::Square => TokenKind::CloseSquare,
            Self::Curly => TokenKind::CloseCurly,
        }
    }
}

/// A grouped expression, such as `(x + 1)`. A [`Paren`] can only contain a single expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The kind of brackets used.
    pub kind: ParenKind,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the innermost expression in the parenthesized expression.
    pub fn innermost(&self) -> &Expr {
        let mut inner = &self.expr;
        while let Expr::Paren(paren) = inner.as_ref() {
            inner = &paren.expr;
        }
        inner
    }

    /// Returns the innermost expression in the parenthesized expression, consuming the [`Paren`].
    pub fn into_innermost(self) -> Expr {
        let mut inner = self.expr;
        while let Expr::Paren(paren) = *inner {
            inner = paren.expr;
        }
        *inner
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.next_token()?;
        let Some(paren_kind) = ParenKind::from_open(open.kind) else {
            return Err(Error::new(vec![open.span], kind::UnexpectedToken {
                expected: &[TokenKind::OpenParen, TokenKind::OpenSquare, TokenKind::OpenCurly],
                found: open.kind,
            }));
        };

        if input.peek_kind() == Some(paren_kind.close()) {
            let close = input.next_token()?;
            return Err(Error::new(vec![open.span.start..close.span.end], kind::EmptyParenthesis));
        }

        // bars inside the group open new absolute values
        let expr = input.outside_abs(|input| input.try_parse::<Expr>())?;

        let (open_str, close_str) = paren_kind.delimiters();
        let unclosed = || Error::new(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true, open: open_str, close: close_str },
        );
        let close = input.next_token().map_err(|_| unclosed())?;
        if close.kind != paren_kind.close() {
            return Err(unclosed());
        }

        Ok(Self {
            expr: Box::new(expr),
            kind: paren_kind,
            span: open.span.start..close.span.end,
        })
    }
}

impl std::fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (open, close) = self.kind.delimiters();
        write!(f, "{}{}{}", open, self.expr, close)
    }
}

impl Latex for Paren {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ParenKind::Round => write!(f, "\\left(")?,
            ParenKind::Square => write!(f, "\\left[")?,
            ParenKind::Curly => write!(f, "{{")?,
        }
        self.expr.fmt_latex(f)?;
        match self.kind {
            ParenKind::Round => write!(f, "\\right)"),
            ParenKind::Square => write!(f, "\\right]"),
            ParenKind::Curly => write!(f, "}}"),
        }
    }
}
