use std::fmt::{Display, Formatter, Result};
use super::{ast::expr::Expr, token::op::BinOpKind};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// Helper to format powers.
pub fn fmt_pow(f: &mut Formatter, left: Option<&Expr>, right: Option<&Expr>) -> Result {
    if let Some(left) = left {
        let left = left.innermost();
        let mut insert_with_paren = || {
            write!(f, "\\left(")?;
            left.fmt_latex(f)?;
            write!(f, "\\right)")
        };

        match left {
            Expr::Unary(unary)
                if unary.op.precedence() <= BinOpKind::Exp.precedence() => insert_with_paren(),
            // every binary operator binds no tighter than a power
            Expr::Binary(_) => insert_with_paren(),
            _ => left.fmt_latex(f),
        }?
    }
    write!(f, "^{{")?;
    if let Some(right) = right {
        right.innermost().fmt_latex(f)?;
    }
    write!(f, "}}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::parser::Parser;

    fn parse(source: &str) -> Expr {
        Parser::new(source).try_parse_full::<Expr>().unwrap()
    }

    #[test]
    fn fmt_display() {
        assert_eq!(parse("3x + 6").to_string(), "3x + 6");
        assert_eq!(parse(r"\frac{x+1}{2}").to_string(), "(x + 1)/2");
        assert_eq!(parse("f(x) = x^2 + 5x + 6").to_string(), "f(x) = x^2 + 5x + 6");
    }

    #[test]
    fn fmt_display_calls() {
        assert_eq!(parse(r"\sqrt[3]{x}").to_string(), "sqrt(x, 3)");
        assert_eq!(parse(r"\log_{2}8").to_string(), "log(8, 2)");
        assert_eq!(parse("|x - 1|").to_string(), "abs(x - 1)");
    }

    #[test]
    fn fmt_latex() {
        assert_eq!(parse("3x + 6").as_display().to_string(), "3x+6");
        assert_eq!(parse(r"\frac{1}{x}").as_display().to_string(), r"\frac{1}{x}");
        assert_eq!(parse(r"\alpha_{1} \le 2").as_display().to_string(), r"\alpha_{1}\le 2");
    }

    #[test]
    fn fmt_latex_powers() {
        assert_eq!(parse("x^2").as_display().to_string(), "x^{2}");
        assert_eq!(parse("(x+1)^2").as_display().to_string(), r"\left(x+1\right)^{2}");
        assert_eq!(parse("(-x)^2").as_display().to_string(), r"\left(-x\right)^{2}");
    }

    #[test]
    fn fmt_latex_calls() {
        assert_eq!(parse(r"\sqrt{2}").as_display().to_string(), r"\sqrt{2}");
        assert_eq!(parse(r"\sin x").as_display().to_string(), r"\sin\left(x\right)");
        assert_eq!(parse("f(x, y)").as_display().to_string(), r"f\left(x, y\right)");
    }
}
