use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::{self, Call, FUNCTION_LETTERS},
            literal::{is_symbol_command, LitSym, Literal},
            paren::Paren,
            unary::Unary,
        },
        error::{kind, Error},
        fmt::Latex,
        token::op::{BinOp, BinOpKind, Precedence},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression in typeset math.
///
/// An expression is a single answer, such as `2x + 1`, `\frac{\pi}{2}`, or `y \le 3x`. At most
/// one relation may appear in an expression, and it is always the root of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A grouped expression, such as `(1 + 2)` or `{x}`.
    Paren(Paren),

    /// A function call, such as `\sin x`, `\sqrt{2}`, or `|x|`.
    Call(Call),

    /// A unary operation, such as `-1` or `n!`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2` or `\frac{1}{2}`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }

    /// Returns true if the expression is a relation, such as `x = 1` or `y \le 2`.
    pub fn is_relation(&self) -> bool {
        matches!(self, Expr::Binary(binary) if binary.op.kind.is_relation())
    }

    /// Returns true if the given expression can be used as a target for implicit multiplication.
    pub fn is_implicit_mul_target(&self) -> bool {
        matches!(self,
            Expr::Literal(_)
                | Expr::Paren(_)
                | Expr::Call(_)
                | Expr::Unary(_)
                | Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Div | BinOpKind::Exp, .. }, .. })
        )
    }

    /// Returns true if the next token can begin a factor of an implicit multiplication, such as
    /// the `x` in `2x`.
    pub fn can_start_factor(input: &Parser) -> bool {
        let Some(token) = input.peek_token() else {
            return false;
        };

        match token.kind {
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Name
                | TokenKind::OpenParen
                | TokenKind::OpenSquare
                | TokenKind::OpenCurly => true,
            // inside an absolute value, a bar closes it
            TokenKind::Bar => input.abs_depth() == 0,
            TokenKind::Command => token
                .command_name()
                .map_or(false, |name| {
                    BinOpKind::from_command(name).is_none() && !matches!(name, "cup" | "cap")
                }),
            _ => false,
        }
    }

    /// Returns true if the next token is a function command, such as `\sin`.
    pub fn starts_function(input: &Parser) -> bool {
        input
            .peek_token()
            .and_then(|token| token.command_name())
            .map_or(false, call::is_function)
    }

    /// Parses a primary expression: a literal, a group, a call, or a command such as
    /// `\frac{1}{2}`.
    pub fn parse_primary(input: &mut Parser) -> Result<Expr, Error> {
        let Some(token) = input.peek_token().cloned() else {
            return Err(input.error(kind::UnexpectedEof));
        };

        match token.kind {
            TokenKind::Int | TokenKind::Float => input.try_parse::<Literal>().map(Expr::Literal),
            TokenKind::Name => {
                let mut input_ahead = input.clone();
                input_ahead.next_token()?;

                // `f(x)` is a function application only if the paren directly follows
                let is_call = FUNCTION_LETTERS.contains(&token.lexeme)
                    && input_ahead.current_token().map_or(false, |next| next.kind == TokenKind::OpenParen);
                if is_call {
                    input.set_cursor(&input_ahead);
                    return Call::parse_user(input, token);
                }

                input.try_parse::<LitSym>().map(|sym| Expr::Literal(Literal::Symbol(sym)))
            },
            TokenKind::OpenParen | TokenKind::OpenSquare | TokenKind::OpenCurly => {
                input.try_parse::<Paren>().map(Expr::Paren)
            },
            TokenKind::Bar => Call::parse_abs(input),
            TokenKind::Command if token.command_name().map_or(false, is_symbol_command) => {
                input.try_parse::<LitSym>().map(|sym| Expr::Literal(Literal::Symbol(sym)))
            },
            TokenKind::Command => Self::parse_command(input),
            _ => {
                input.next_token()?;
                Err(Error::new(vec![token.span], kind::UnexpectedToken {
                    expected: &[
                        TokenKind::Int,
                        TokenKind::Float,
                        TokenKind::Name,
                        TokenKind::OpenParen,
                        TokenKind::Command,
                    ],
                    found: token.kind,
                }))
            },
        }
    }

    /// Parses a command in primary position, such as `\frac{1}{2}`, `\sin x`, or `\alpha`.
    fn parse_command(input: &mut Parser) -> Result<Expr, Error> {
        let command = input.next_token()?;
        let name = command.command_name().unwrap_or_default().to_owned();

        match name.as_str() {
            "frac" => {
                let numerator = Call::parse_group_arg(input, &command)?;
                let denominator = Call::parse_group_arg(input, &command)?;
                let end = input.prev_token().map_or(command.span.end, |token| token.span.end);
                Ok(Expr::Binary(Binary {
                    lhs: Box::new(numerator),
                    op: BinOp { kind: BinOpKind::Div, implicit: false, span: command.span.clone() },
                    rhs: Box::new(denominator),
                    span: command.span.start..end,
                }))
            },
            "sqrt" => Call::parse_sqrt(input, command),
            name if call::is_function(name) => Call::parse_function(input, command),
            name if BinOpKind::from_command(name).is_some() => {
                Err(Error::new(vec![command.span], kind::UnexpectedToken {
                    expected: &[TokenKind::Int, TokenKind::Name, TokenKind::OpenParen],
                    found: TokenKind::Command,
                }))
            },
            name => Err(Error::new(vec![command.span.clone()], kind::UnknownCommand {
                name: name.to_owned(),
                suggestion: call::suggest_command(name),
            })),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Some(token) = input.peek_token() {
            if token.kind == TokenKind::CloseParen {
                return Err(Error::new(
                    vec![token.span.clone()],
                    kind::UnclosedParenthesis { opening: false, open: "(", close: ")" },
                ));
            }
        }

        let lhs = Unary::parse_or_lower(input)?;
        Ok(Binary::parse_expr(input, lhs, Precedence::Any)?.0)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

impl Latex for Expr {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt_latex(f),
            Expr::Paren(paren) => paren.fmt_latex(f),
            Expr::Call(call) => call.fmt_latex(f),
            Expr::Unary(unary) => unary.fmt_latex(f),
            Expr::Binary(binary) => binary.fmt_latex(f),
        }
    }
}
