pub mod ast;
pub mod error;
pub mod fmt;
pub mod token;

use error::{Error, kind};
use mathgrade_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for typeset math markup. This is the type to use to parse a piece of
/// normalized markup into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The number of absolute value bars `|` that are currently open. Inside an absolute value, a
    /// bar closes the innermost absolute value instead of opening a new one.
    abs_depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            abs_depth: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Sets the cursor of this parser to that of the given parser. This is used after parsing
    /// ahead with a clone of this parser.
    pub fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next non-whitespace token without moving the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns the kind of the next non-whitespace token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_token().map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Returns the number of absolute values that are currently open.
    pub fn abs_depth(&self) -> usize {
        self.abs_depth
    }

    /// Runs the given parsing function inside an absolute value, so that a bar `|` closes it.
    pub fn within_abs<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.abs_depth += 1;
        let result = f(self);
        self.abs_depth -= 1;
        result
    }

    /// Runs the given parsing function outside of any absolute value, such as inside a pair of
    /// parentheses, so that a bar `|` opens a new absolute value.
    pub fn outside_abs<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        let depth = std::mem::replace(&mut self.abs_depth, 0);
        let result = f(self);
        self.abs_depth = depth;
        result
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses multiple values (at least one) from the given stream of tokens, each
    /// delimited by a certain token.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// values are returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut values = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) => {
                    self.cursor = start;
                    return Err(err);
                },
            }

            if self.peek_kind() == Some(delimiter) {
                self.next_token()?;
            } else {
                return Ok(values);
            }
        }
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;
        let value = T::parse(self).and_then(|value| {
            predicate(&value, self)?;
            Ok(value)
        });

        if value.is_err() {
            self.cursor = start;
        }
        value
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;

        if self.peek_token().is_none() {
            Ok(value)
        } else {
            // point at the first leftover token, not the whitespace before it
            while self.current_token().map_or(false, Token::is_whitespace) {
                self.cursor += 1;
            }
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        literal::{LitFloat, LitInt, LitSym, Literal},
        paren::{Paren, ParenKind},
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn parse(source: &str) -> Expr {
        let mut parser = Parser::new(source);
        parser.try_parse_full::<Expr>().unwrap()
    }

    fn parse_err(source: &str) -> String {
        let mut parser = Parser::new(source);
        parser.try_parse_full::<Expr>().unwrap_err().message()
    }

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value: value.to_string(), span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn binary(lhs: Expr, kind: BinOpKind, implicit: bool, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, implicit, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16"), int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14"), Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn subscripted_symbols() {
        assert_eq!(parse("x_1"), sym("x_{1}", 0..3));
        assert_eq!(parse("x_{1}"), sym("x_{1}", 0..5));
        assert_eq!(parse(r"\alpha_{n}"), sym("alpha_{n}", 0..10));
    }

    #[test]
    fn reserved_names() {
        assert_eq!(parse(r"\pi"), sym("pi", 0..3));
        assert_eq!(parse(r"\infty"), sym("infty", 0..6));
    }

    #[test]
    fn precedence() {
        assert_eq!(parse("1 + 2 * 3"), binary(
            int("1", 0..1),
            BinOpKind::Add,
            false,
            2..3,
            binary(int("2", 4..5), BinOpKind::Mul, false, 6..7, int("3", 8..9)),
        ));
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(parse("2xy"), binary(
            binary(int("2", 0..1), BinOpKind::Mul, true, 1..1, sym("x", 1..2)),
            BinOpKind::Mul,
            true,
            2..2,
            sym("y", 2..3),
        ));
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(parse("2^3^4"), binary(
            int("2", 0..1),
            BinOpKind::Exp,
            false,
            1..2,
            binary(int("3", 2..3), BinOpKind::Exp, false, 3..4, int("4", 4..5)),
        ));
    }

    #[test]
    fn power_binds_before_implicit_multiplication() {
        assert_eq!(parse("x^2y"), binary(
            binary(sym("x", 0..1), BinOpKind::Exp, false, 1..2, int("2", 2..3)),
            BinOpKind::Mul,
            true,
            3..3,
            sym("y", 3..4),
        ));
    }

    #[test]
    fn negation() {
        assert_eq!(parse("-x^2"), Expr::Unary(Unary {
            operand: Box::new(binary(sym("x", 1..2), BinOpKind::Exp, false, 2..3, int("2", 3..4))),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn factorial() {
        assert_eq!(parse("n!"), Expr::Unary(Unary {
            operand: Box::new(sym("n", 0..1)),
            op: UnaryOp { kind: UnaryOpKind::Factorial, span: 1..2 },
            span: 0..2,
        }));
    }

    #[test]
    fn fraction_command() {
        assert_eq!(parse(r"\frac{1}{x}"), Expr::Binary(Binary {
            lhs: Box::new(int("1", 6..7)),
            op: BinOp { kind: BinOpKind::Div, implicit: false, span: 0..5 },
            rhs: Box::new(sym("x", 9..10)),
            span: 0..11,
        }));
    }

    #[test]
    fn groups() {
        assert_eq!(parse("[x]"), Expr::Paren(Paren {
            expr: Box::new(sym("x", 1..2)),
            kind: ParenKind::Square,
            span: 0..3,
        }));
    }

    #[test]
    fn function_with_bare_argument() {
        // `\log 2x` is the logarithm of `2x`
        let expr = parse(r"\log 2x");
        let Expr::Call(call) = expr else { panic!("expected a call") };
        assert_eq!(call.name, "log");
        assert_eq!(call.args, vec![binary(int("2", 5..6), BinOpKind::Mul, true, 6..6, sym("x", 6..7))]);
    }

    #[test]
    fn function_bare_argument_stops_at_terms() {
        // `\ln 5+10` is `\ln(5) + 10`
        let expr = parse(r"\ln 5+10");
        let Expr::Binary(binary) = expr else { panic!("expected a sum") };
        assert_eq!(binary.op.kind, BinOpKind::Add);
        assert!(matches!(*binary.lhs, Expr::Call(Call { ref name, .. }) if name == "ln"));
    }

    #[test]
    fn function_products() {
        let expr = parse(r"\sin x \cos x");
        let Expr::Binary(binary) = expr else { panic!("expected a product") };
        assert!(binary.op.implicit);
        assert!(matches!(*binary.lhs, Expr::Call(Call { ref name, .. }) if name == "sin"));
        assert!(matches!(*binary.rhs, Expr::Call(Call { ref name, .. }) if name == "cos"));
    }

    #[test]
    fn function_powers() {
        let expr = parse(r"\sin^2 x");
        let Expr::Binary(binary) = expr else { panic!("expected a power") };
        assert_eq!(binary.op.kind, BinOpKind::Exp);
        assert!(matches!(*binary.lhs, Expr::Call(Call { ref name, .. }) if name == "sin"));

        let Expr::Call(call) = parse(r"\sin^{-1} x") else { panic!("expected a call") };
        assert_eq!(call.name, "arcsin");
    }

    #[test]
    fn log_with_base() {
        let Expr::Call(call) = parse(r"\log_{2}(8)") else { panic!("expected a call") };
        assert_eq!(call.name, "log");
        assert_eq!(call.args, vec![int("8", 9..10), int("2", 6..7)]);
    }

    #[test]
    fn roots() {
        let Expr::Call(call) = parse(r"\sqrt[3]{x}") else { panic!("expected a call") };
        assert_eq!(call.name, "sqrt");
        assert_eq!(call.args, vec![sym("x", 9..10), int("3", 6..7)]);
    }

    #[test]
    fn absolute_value() {
        let Expr::Binary(binary) = parse("2|x - 1|") else { panic!("expected a product") };
        assert!(matches!(*binary.rhs, Expr::Call(Call { ref name, .. }) if name == "abs"));

        let Expr::Call(call) = parse("||x|-1|") else { panic!("expected a call") };
        assert_eq!(call.name, "abs");
    }

    #[test]
    fn user_functions() {
        let Expr::Call(call) = parse("f(x, y)") else { panic!("expected a call") };
        assert_eq!(call.name, "f");
        assert_eq!(call.args, vec![sym("x", 2..3), sym("y", 5..6)]);

        // any other letter is multiplication
        let Expr::Binary(binary) = parse("x(x+1)") else { panic!("expected a product") };
        assert!(binary.op.implicit);
    }

    #[test]
    fn relations() {
        let Expr::Binary(binary) = parse(r"x \le 2") else { panic!("expected a relation") };
        assert_eq!(binary.op.kind, BinOpKind::LessEq);

        let Expr::Binary(binary) = parse("y = 2x + 1") else { panic!("expected a relation") };
        assert_eq!(binary.op.kind, BinOpKind::Eq);
    }

    #[test]
    fn errors() {
        assert_eq!(parse_err("1 < x < 2"), "chained relations are not supported");
        assert_eq!(parse_err("(1 + 2"), "unclosed parenthesis");
        assert_eq!(parse_err("()"), "missing expression inside parenthesis");
        assert_eq!(parse_err(r"\fracc{1}{2}"), r"unknown command `\fracc`");
        assert_eq!(parse_err("1 +"), "unexpected end of answer");
        assert_eq!(parse_err(""), "unexpected end of answer");
        assert_eq!(parse_err("1, 2"), "expected end of answer");
        assert_eq!(parse_err(r"\sqrt"), r"missing argument to `\sqrt`");
        assert_eq!(parse_err("2 $"), "expected end of answer");
    }
}
