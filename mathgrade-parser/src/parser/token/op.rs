//! Structs to help parse binary and unary operators.

use crate::{
    parser::{
        error::{Error, kind},
        fmt::Latex,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`. For unary
    /// operations, this means `a op op` is evaluated as `(a op) op` (the operators appear to the
    /// right of the operand).
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of relations (`=`, `\ne`, `<`, `\le`, `>`, and `\ge`).
    Compare,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`, `\cdot`, `\times`) and division (`/`, `\div`), which
    /// separate factors.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of factorial (`!`).
    Factorial,
}

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Neg,
    Pos,
    Factorial,
}

impl UnaryOpKind {
    /// Returns the precedence of the unary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Neg | Self::Pos => Precedence::Neg,
            Self::Factorial => Precedence::Factorial,
        }
    }

    /// Returns the associativity of the unary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Neg | Self::Pos => Associativity::Right,
            Self::Factorial => Associativity::Left,
        }
    }
}

/// A unary operator that takes one operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Returns the precedence of the unary operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the unary operator.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Sub => Ok(UnaryOpKind::Neg),
            TokenKind::Add => Ok(UnaryOpKind::Pos),
            TokenKind::Factorial => Ok(UnaryOpKind::Factorial),
            _ => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Sub,
                    TokenKind::Add,
                    TokenKind::Factorial,
                ],
                found: token.kind,
            })),
        }?;

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            UnaryOpKind::Neg => write!(f, "-"),
            UnaryOpKind::Pos => write!(f, "+"),
            UnaryOpKind::Factorial => write!(f, "!"),
        }
    }
}

impl Latex for UnaryOp {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
            Self::Eq | Self::NotEq
                | Self::Less | Self::LessEq
                | Self::Greater | Self::GreaterEq => Precedence::Compare,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            Self::Mul | Self::Div
                | Self::Add | Self::Sub
                | Self::Eq | Self::NotEq
                | Self::Less | Self::LessEq
                | Self::Greater | Self::GreaterEq => Associativity::Left,
        }
    }

    /// Returns true if the operation is a relation, such as `=` or `\le`.
    pub fn is_relation(&self) -> bool {
        self.precedence() == Precedence::Compare
    }

    /// Returns the binary operation written as the given command, if any.
    pub fn from_command(name: &str) -> Option<Self> {
        Some(match name {
            "cdot" | "times" | "ast" => Self::Mul,
            "div" => Self::Div,
            "le" | "leq" => Self::LessEq,
            "ge" | "geq" => Self::GreaterEq,
            "ne" | "neq" => Self::NotEq,
            "lt" => Self::Less,
            "gt" => Self::Greater,
            _ => return None,
        })
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// Whether this binary operator was implicitly inserted by the parser.
    pub implicit: bool,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Exp => Some(BinOpKind::Exp),
            TokenKind::Mul => Some(BinOpKind::Mul),
            TokenKind::Div => Some(BinOpKind::Div),
            TokenKind::Add => Some(BinOpKind::Add),
            TokenKind::Sub => Some(BinOpKind::Sub),
            TokenKind::Eq => Some(BinOpKind::Eq),
            TokenKind::Less => Some(BinOpKind::Less),
            TokenKind::Greater => Some(BinOpKind::Greater),
            TokenKind::Command => token.command_name().and_then(BinOpKind::from_command),
            _ => None,
        };

        match kind {
            Some(kind) => Ok(Self {
                kind,
                implicit: false,
                span: token.span,
            }),
            None => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Exp,
                    TokenKind::Mul,
                    TokenKind::Div,
                    TokenKind::Add,
                    TokenKind::Sub,
                    TokenKind::Eq,
                    TokenKind::Less,
                    TokenKind::Greater,
                    TokenKind::Command,
                ],
                found: token.kind,
            })),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.implicit {
            return Ok(());
        }

        match self.kind {
            BinOpKind::Exp => write!(f, "^"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "/"),
            BinOpKind::Add => write!(f, " + "),
            BinOpKind::Sub => write!(f, " - "),
            BinOpKind::Eq => write!(f, " = "),
            BinOpKind::NotEq => write!(f, " != "),
            BinOpKind::Less => write!(f, " < "),
            BinOpKind::LessEq => write!(f, " <= "),
            BinOpKind::Greater => write!(f, " > "),
            BinOpKind::GreaterEq => write!(f, " >= "),
        }
    }
}

impl Latex for BinOp {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.implicit {
            return Ok(());
        }

        match self.kind {
            BinOpKind::Exp => write!(f, "^"),
            BinOpKind::Mul => write!(f, " \\cdot "),
            BinOpKind::Div => write!(f, " \\div "),
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
            BinOpKind::Eq => write!(f, "="),
            BinOpKind::NotEq => write!(f, "\\ne "),
            BinOpKind::Less => write!(f, "<"),
            BinOpKind::LessEq => write!(f, "\\le "),
            BinOpKind::Greater => write!(f, ">"),
            BinOpKind::GreaterEq => write!(f, "\\ge "),
        }
    }
}
