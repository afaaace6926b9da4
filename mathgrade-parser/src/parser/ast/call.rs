use crate::{
    parser::{
        ast::{binary::Binary, expr::Expr, literal::{GREEK, RESERVED}, paren::Paren, unary::Unary},
        error::{kind, Error},
        fmt::Latex,
        token::{op::{BinOp, BinOpKind, Precedence, UnaryOpKind}, CloseParen, CloseSquare, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::{Token, TokenKind},
};
use levenshtein::levenshtein;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Function commands, such as `\sin`, which take one argument.
pub const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh",
    "exp", "ln", "log",
];

/// Single letters that are treated as function names when directly followed by `(`.
pub const FUNCTION_LETTERS: &[&str] = &["f", "g", "h"];

/// Other commands the parser understands.
const STRUCTURAL: &[&str] = &["frac", "sqrt"];

/// Commands that are binary operators.
const OPERATORS: &[&str] = &["cdot", "times", "div", "le", "ge", "ne"];

/// Returns true if the given command name is a function command, such as `sin`.
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Returns the known command with the name most similar to the given name, if any is similar
/// enough.
pub fn suggest_command(name: &str) -> Option<String> {
    FUNCTIONS
        .iter()
        .chain(GREEK)
        .chain(RESERVED)
        .chain(STRUCTURAL)
        .chain(OPERATORS)
        .map(|known| (levenshtein(known, name), *known))
        .filter(|(distance, _)| *distance < 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, known)| known.to_string())
}

/// Returns true if the expression is `-1`.
fn is_minus_one(expr: &Expr) -> bool {
    match expr.innermost() {
        Expr::Unary(unary) if unary.op.kind == UnaryOpKind::Neg => {
            matches!(unary.operand.innermost(), Expr::Literal(lit) if lit.to_string() == "1")
        },
        _ => false,
    }
}

/// A function call, such as `\sin x`, `\sqrt{2}`, `|x|`, or `f(x, y)`.
///
/// Function commands, roots, and absolute values are all represented as calls. The name of the
/// call is the name of the command without the backslash (`sin`), or `abs` for absolute values.
/// Some calls take optional trailing arguments:
///
/// - `log`: `[x]` for the base 10 logarithm, or `[x, base]`.
/// - `sqrt`: `[x]` for the square root, or `[x, n]` for the `n`-th root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: String,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the end of the span of the most recently consumed token.
    fn end_span(input: &Parser, fallback: usize) -> usize {
        input.prev_token().map_or(fallback, |token| token.span.end)
    }

    /// Parses a braced argument of a command, such as the `{x}` in `\sqrt{x}`, returning the
    /// expression inside. A single atom, such as the `2` in `\sqrt 2`, is also accepted.
    pub fn parse_group_arg(input: &mut Parser, command: &Token) -> Result<Expr, Error> {
        let missing = || Error::new(
            vec![command.span.clone()],
            kind::MissingArgument { command: command.lexeme.trim_start_matches('\\').to_string() },
        );

        match input.peek_kind() {
            Some(TokenKind::OpenCurly) => Ok(input.try_parse::<Paren>()?.into_innermost()),
            Some(TokenKind::Int | TokenKind::Float | TokenKind::Name | TokenKind::Command) => {
                Expr::parse_primary(input)
            },
            _ => Err(missing()),
        }
    }

    /// Parses a superscript or subscript, such as the `2` in `\sin^2 x` or the `{-1}` in
    /// `\sin^{-1} x`.
    fn parse_script(input: &mut Parser, command: &Token) -> Result<Expr, Error> {
        if input.peek_kind() == Some(TokenKind::Sub) {
            let start = input.span().start;
            let op = input.try_parse()?;
            let operand = Self::parse_group_arg(input, command)?;
            let end = operand.span().end;
            return Ok(Expr::Unary(Unary {
                operand: Box::new(operand),
                op,
                span: start..end,
            }));
        }

        Self::parse_group_arg(input, command)
    }

    /// Parses a single factor of a bare function argument, which may carry a power, such as
    /// `x^2`.
    fn parse_factor(input: &mut Parser) -> Result<Expr, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Ok(Binary::parse_expr(input, lhs, Precedence::Exp)?.0)
    }

    /// Parses the argument of a function command. The argument is either grouped, as in
    /// `\sin(x)` and `\sin{x}`, or it is the run of implicitly multiplied factors that follows the
    /// command, as in `\log 2x`. The run stops at the next function command, explicit operator,
    /// or relation, so `\ln 5+10` is `\ln(5) + 10`.
    fn parse_function_arg(input: &mut Parser, command: &Token) -> Result<Expr, Error> {
        match input.peek_kind() {
            Some(TokenKind::OpenParen | TokenKind::OpenCurly) => {
                return Ok(input.try_parse::<Paren>()?.into_innermost());
            },
            Some(TokenKind::Sub | TokenKind::Add) => (),
            _ if Expr::can_start_factor(input) => (),
            _ => return Err(Error::new(
                vec![command.span.clone()],
                kind::MissingArgument { command: command.lexeme.trim_start_matches('\\').to_string() },
            )),
        }

        let mut arg = Self::parse_factor(input)?;
        while Expr::can_start_factor(input) && !Expr::starts_function(input) {
            let rhs = Self::parse_factor(input)?;
            let span = arg.span().start..rhs.span().end;
            let op_span = arg.span().end..rhs.span().start;
            arg = Expr::Binary(Binary {
                lhs: Box::new(arg),
                op: BinOp { kind: BinOpKind::Mul, implicit: true, span: op_span },
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(arg)
    }

    /// Parses a function command, such as `\sin^2 x` or `\log_{2}(8)`. The command token has
    /// already been consumed.
    ///
    /// A power written on the command applies to the whole call, so `\sin^2 x` is
    /// `(\sin x)^2`, except for `\sin^{-1}`, `\cos^{-1}`, and `\tan^{-1}`, which are the inverse
    /// functions.
    pub fn parse_function(input: &mut Parser, command: Token) -> Result<Expr, Error> {
        let start = command.span.start;
        let mut name = command.lexeme.trim_start_matches('\\').to_string();
        let mut base = None;
        let mut power = None;

        loop {
            match input.peek_kind() {
                Some(TokenKind::Subscript) if name == "log" && base.is_none() => {
                    input.next_token()?;
                    base = Some(Self::parse_script(input, &command)?);
                },
                Some(TokenKind::Exp) if power.is_none() => {
                    let caret = input.next_token()?;
                    power = Some((caret.span, Self::parse_script(input, &command)?));
                },
                _ => break,
            }
        }

        if matches!(name.as_str(), "sin" | "cos" | "tan")
            && power.as_ref().map_or(false, |(_, power)| is_minus_one(power))
        {
            name = format!("arc{}", name);
            power = None;
        }

        let arg = Self::parse_function_arg(input, &command)?;
        let mut args = vec![arg];
        args.extend(base);

        let call = Expr::Call(Self {
            name,
            args,
            span: start..Self::end_span(input, command.span.end),
        });

        Ok(match power {
            Some((caret_span, power)) => {
                let span = start..call.span().end.max(power.span().end);
                Expr::Binary(Binary {
                    lhs: Box::new(call),
                    op: BinOp { kind: BinOpKind::Exp, implicit: false, span: caret_span },
                    rhs: Box::new(power),
                    span,
                })
            },
            None => call,
        })
    }

    /// Parses a root, `\sqrt{x}` or `\sqrt[n]{x}`. The command token has already been consumed.
    pub fn parse_sqrt(input: &mut Parser, command: Token) -> Result<Expr, Error> {
        let index = if input.peek_kind() == Some(TokenKind::OpenSquare) {
            let open = input.next_token()?;
            let index = input.outside_abs(|input| input.try_parse::<Expr>())?;
            input.try_parse::<CloseSquare>().map_err(|_| Error::new(
                vec![open.span],
                kind::UnclosedParenthesis { opening: true, open: "[", close: "]" },
            ))?;
            Some(index)
        } else {
            None
        };

        let radicand = Self::parse_group_arg(input, &command)?;
        let mut args = vec![radicand];
        args.extend(index);

        Ok(Expr::Call(Self {
            name: "sqrt".to_string(),
            args,
            span: command.span.start..Self::end_span(input, command.span.end),
        }))
    }

    /// Parses an absolute value, `|x|`.
    pub fn parse_abs(input: &mut Parser) -> Result<Expr, Error> {
        let open = input.next_token()?;

        // a bar directly after the opening bar opens a nested absolute value, as in `||x|-1|`
        let arg = input.within_abs(|input| input.try_parse::<Expr>())?;
        let close = input.next_token().map_err(|_| Error::new(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true, open: "|", close: "|" },
        ))?;
        if close.kind != TokenKind::Bar {
            return Err(Error::new(
                vec![open.span],
                kind::UnclosedParenthesis { opening: true, open: "|", close: "|" },
            ));
        }

        Ok(Expr::Call(Self {
            name: "abs".to_string(),
            args: vec![arg],
            span: open.span.start..close.span.end,
        }))
    }

    /// Parses an application of a single-letter function, such as `f(x, y)`. The name token has
    /// already been consumed.
    pub fn parse_user(input: &mut Parser, name: Token) -> Result<Expr, Error> {
        let open = input.try_parse::<OpenParen>()?;
        let args = input.outside_abs(|input| input.try_parse_delimited::<Expr>(TokenKind::Comma))?;
        let close = input.try_parse::<CloseParen>().map_err(|_| Error::new(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true, open: "(", close: ")" },
        ))?;

        Ok(Expr::Call(Self {
            name: name.lexeme.to_string(),
            args,
            span: name.span.start..close.span.end,
        }))
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            arg.fmt(f)?;
        }
        write!(f, ")")
    }
}

impl Latex for Call {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.name.as_str(), self.args.as_slice()) {
            ("sqrt", [radicand]) => write!(f, "\\sqrt{{{}}}", radicand.innermost().as_display()),
            ("sqrt", [radicand, index]) => write!(
                f,
                "\\sqrt[{}]{{{}}}",
                index.innermost().as_display(),
                radicand.innermost().as_display(),
            ),
            ("abs", [arg]) => write!(f, "\\left|{}\\right|", arg.as_display()),
            ("log", [arg, base]) => write!(
                f,
                "\\log_{{{}}}\\left({}\\right)",
                base.innermost().as_display(),
                arg.innermost().as_display(),
            ),
            (name, args) => {
                if FUNCTION_LETTERS.contains(&name) {
                    write!(f, "{}\\left(", name)?;
                } else {
                    write!(f, "\\{}\\left(", name)?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.innermost().fmt_latex(f)?;
                }
                write!(f, "\\right)")
            },
        }
    }
}
