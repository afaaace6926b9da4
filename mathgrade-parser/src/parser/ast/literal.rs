use crate::{
    parser::{
        ast::expr::Expr,
        error::{kind, Error},
        fmt::Latex,
        token::{Float, Int},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Greek letter commands that are parsed as symbols.
pub const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "rho", "varrho", "sigma", "tau",
    "upsilon", "phi", "varphi", "chi", "psi", "omega",
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

/// Commands that are parsed as reserved symbols: `\pi` and `\infty`.
pub const RESERVED: &[&str] = &["pi", "infty"];

/// Returns true if the given command name is parsed as a symbol.
pub fn is_symbol_command(name: &str) -> bool {
    GREEK.contains(&name) || RESERVED.contains(&name)
}

/// An integer literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Int>()
            .map(|int| Self {
                value: int.lexeme,
                span: int.span,
            })
    }
}

impl std::fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Latex for LitInt {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A decimal literal, represented as a [`String`], such as `3.14` or `.5`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the decimal literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitFloat {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Float>()
            .map(|float| Self {
                value: float.lexeme,
                span: float.span,
            })
    }
}

impl std::fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Latex for LitFloat {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol, such as `x`, `\theta`, or `x_{1}`.
///
/// The name of a symbol never includes a backslash. A subscripted symbol is always named with a
/// braced subscript, so `x_1` and `x_{1}` name the same symbol `x_{1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl LitSym {
    /// Parses the subscript following a symbol, if there is one, returning its contents.
    fn parse_subscript(input: &mut Parser) -> Result<Option<String>, Error> {
        if input.peek_kind() != Some(TokenKind::Subscript) {
            return Ok(None);
        }

        let underscore = input.next_token()?;
        let missing = || Error::new(vec![underscore.span.clone()], kind::MissingSubscript);
        let token = input.next_token().map_err(|_| missing())?;

        match token.kind {
            TokenKind::OpenCurly => {
                let mut content = String::new();
                loop {
                    let inner = input.next_token().map_err(|_| Error::new(
                        vec![token.span.clone()],
                        kind::UnclosedParenthesis { opening: true, open: "{", close: "}" },
                    ))?;
                    if inner.kind == TokenKind::CloseCurly {
                        break;
                    }
                    content.push_str(inner.lexeme);
                }

                if content.is_empty() {
                    return Err(missing());
                }
                Ok(Some(content))
            },
            TokenKind::Int | TokenKind::Name => Ok(Some(token.lexeme.to_owned())),
            TokenKind::Command if token.command_name().map_or(false, is_symbol_command) => {
                Ok(Some(token.lexeme.to_owned()))
            },
            _ => Err(missing()),
        }
    }

    /// Returns the part of the name before the subscript.
    pub fn base(&self) -> &str {
        self.name.split('_').next().unwrap_or(&self.name)
    }
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let base = match token.kind {
            TokenKind::Name => token.lexeme,
            TokenKind::Command => match token.command_name() {
                Some(name) if is_symbol_command(name) => name,
                _ => return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                    expected: &[TokenKind::Name],
                    found: token.kind,
                })),
            },
            _ => return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[TokenKind::Name],
                found: token.kind,
            })),
        };

        let name = match Self::parse_subscript(input)? {
            Some(subscript) => format!("{}_{{{}}}", base, subscript),
            None => base.to_owned(),
        };
        let end = input.prev_token().map_or(token.span.end, |token| token.span.end);

        Ok(Self {
            name,
            span: token.span.start..end,
        })
    }
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Latex for LitSym {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.base().len() > 1 {
            write!(f, "\\{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Represents a literal value in typeset math.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer, such as `2`.
    Integer(LitInt),

    /// A decimal, such as `3.14`.
    Float(LitFloat),

    /// A symbol, such as `x` or `\alpha`.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_kind() {
            Some(TokenKind::Int) => input.try_parse().map(Literal::Integer),
            Some(TokenKind::Float) => input.try_parse().map(Literal::Float),
            _ => input.try_parse().map(Literal::Symbol),
        }
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}

impl Latex for Literal {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt_latex(f),
            Literal::Float(float) => float.fmt_latex(f),
            Literal::Symbol(sym) => sym.fmt_latex(f),
        }
    }
}
