//! LaTeX rendering of [`SymExpr`]s, used to echo answers back in feedback.

use mathgrade_parser::parser::{
    ast::{call::FUNCTIONS, literal::GREEK},
    fmt::Latex,
};
use rug::Integer;
use std::fmt::{Formatter, Result};
use super::{sorted, Constant, Primary, SymExpr};

/// Writes a symbol name, adding the backslash to Greek letters. The subscript, if any, is kept.
fn fmt_symbol(f: &mut Formatter, name: &str) -> Result {
    let letter = name.split('_').next().unwrap_or(name);
    if GREEK.contains(&letter) {
        write!(f, "\\{}", name)
    } else {
        write!(f, "{}", name)
    }
}

/// Writes the expression, wrapped in `\left(` and `\right)` if `wrap` is true.
fn fmt_wrapped(f: &mut Formatter, expr: &SymExpr, wrap: bool) -> Result {
    if wrap {
        write!(f, "\\left(")?;
        expr.fmt_latex(f)?;
        write!(f, "\\right)")
    } else {
        expr.fmt_latex(f)
    }
}

/// Writes a comma-separated argument list in parentheses.
fn fmt_args(f: &mut Formatter, args: &[SymExpr]) -> Result {
    write!(f, "\\left(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        arg.fmt_latex(f)?;
    }
    write!(f, "\\right)")
}

/// Returns true if the expression is a negative number.
fn is_negative_number(expr: &SymExpr) -> bool {
    match expr {
        SymExpr::Primary(Primary::Integer(int)) => *int < 0,
        SymExpr::Primary(Primary::Float(float)) => *float < 0,
        _ => false,
    }
}

impl Latex for Primary {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Float(num) => write!(f, "{}", num.to_f64()),
            Self::Symbol(name) => fmt_symbol(f, name),
            Self::Const(Constant::E) => write!(f, "e"),
            Self::Const(Constant::Pi) => write!(f, "\\pi"),
            Self::Const(Constant::I) => write!(f, "i"),
            Self::Const(Constant::Infinity) => write!(f, "\\infty"),
            Self::Call(name, args) => match (name.as_str(), args.as_slice()) {
                ("abs", [arg]) => {
                    write!(f, "\\left|")?;
                    arg.fmt_latex(f)?;
                    write!(f, "\\right|")
                },
                ("factorial", [arg]) => {
                    fmt_wrapped(f, arg, !matches!(arg, SymExpr::Primary(_)) || is_negative_number(arg))?;
                    write!(f, "!")
                },
                ("log", [arg, base]) => {
                    write!(f, "\\log_{{")?;
                    base.fmt_latex(f)?;
                    write!(f, "}}")?;
                    fmt_args(f, std::slice::from_ref(arg))
                },
                (name, args) if FUNCTIONS.contains(&name) => {
                    write!(f, "\\{}", name)?;
                    fmt_args(f, args)
                },
                (name, args) => {
                    write!(f, "{}", name)?;
                    fmt_args(f, args)
                },
            },
        }
    }
}

/// Splits the factors of a product into the numerator and the denominator. Factors raised to a
/// negative integer power go to the denominator, with the sign of the power flipped.
fn split_fraction(factors: &[SymExpr]) -> (Vec<SymExpr>, Vec<SymExpr>) {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match factor {
            SymExpr::Exp(base, exp) if exp.as_integer().map_or(false, |exp| *exp < 0) => {
                let flipped = exp.as_integer().map(|exp| Integer::from(-exp)).unwrap_or_default();
                if flipped == 1 {
                    denominator.push((**base).clone());
                } else {
                    denominator.push(SymExpr::Exp(base.clone(), Box::new(SymExpr::Primary(Primary::Integer(flipped)))));
                }
            },
            factor => numerator.push(factor.clone()),
        }
    }
    (numerator, denominator)
}

/// Writes a product of factors with no denominator. A leading `-1` is written as a minus sign.
fn fmt_product(f: &mut Formatter, factors: &[SymExpr]) -> Result {
    let ordered = sorted(factors);
    let mut iter = ordered.into_iter().peekable();

    if iter.peek().map_or(false, |first| first.as_integer().map_or(false, |n| *n == -1)) && factors.len() > 1 {
        iter.next();
        write!(f, "-")?;
    }

    let mut first = true;
    for factor in iter {
        // juxtaposed digits would merge into one number
        if !first && factor.is_number_literal() {
            write!(f, "\\cdot ")?;
        }
        let wrap = matches!(factor, SymExpr::Add(_)) || (!first && is_negative_number(factor));
        fmt_wrapped(f, factor, wrap)?;
        first = false;
    }
    Ok(())
}

impl Latex for SymExpr {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Primary(primary) => primary.fmt_latex(f),
            Self::Add(terms) => {
                for (i, term) in sorted(terms).into_iter().enumerate() {
                    let rendered = term.as_display().to_string();
                    if i > 0 && !rendered.starts_with('-') {
                        write!(f, "+")?;
                    }
                    write!(f, "{}", rendered)?;
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let (numerator, denominator) = split_fraction(factors);
                if denominator.is_empty() {
                    return fmt_product(f, &numerator);
                }

                let negative = numerator.iter().any(|factor| factor.as_integer().map_or(false, |n| *n == -1));
                let numerator = numerator.into_iter()
                    .filter(|factor| !(negative && factor.as_integer().map_or(false, |n| *n == -1)))
                    .collect::<Vec<_>>();
                if negative {
                    write!(f, "-")?;
                }
                write!(f, "\\frac{{")?;
                if numerator.is_empty() {
                    write!(f, "1")?;
                } else {
                    fmt_product(f, &numerator)?;
                }
                write!(f, "}}{{")?;
                fmt_product(f, &denominator)?;
                write!(f, "}}")
            },
            Self::Exp(base, exp) => {
                if let Some(index) = exp.as_integer_recip() {
                    if *index == 2 {
                        write!(f, "\\sqrt{{")?;
                    } else {
                        write!(f, "\\sqrt[{}]{{", index)?;
                    }
                    base.fmt_latex(f)?;
                    return write!(f, "}}");
                }
                if let SymExpr::Mul(factors) = &**exp {
                    if let [one, recip] | [recip, one] = factors.as_slice() {
                        if one.as_integer().map_or(false, |n| *n == 1) {
                            if let Some(index) = recip.as_integer_recip() {
                                if *index == 2 {
                                    write!(f, "\\sqrt{{")?;
                                } else {
                                    write!(f, "\\sqrt[{}]{{", index)?;
                                }
                                base.fmt_latex(f)?;
                                return write!(f, "}}");
                            }
                        }
                    }
                }
                if exp.as_integer().map_or(false, |n| *n == -1) {
                    write!(f, "\\frac{{1}}{{")?;
                    base.fmt_latex(f)?;
                    return write!(f, "}}");
                }

                let wrap = !matches!(**base, SymExpr::Primary(_)) || is_negative_number(base);
                fmt_wrapped(f, base, wrap)?;
                write!(f, "^{{")?;
                exp.fmt_latex(f)?;
                write!(f, "}}")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::simplify::fraction::make_fraction;
    use pretty_assertions::assert_eq;
    use super::*;

    fn latex(expr: &SymExpr) -> String {
        expr.as_display().to_string()
    }

    #[test]
    fn latex_primaries() {
        assert_eq!(latex(&SymExpr::integer(-3)), "-3");
        assert_eq!(latex(&SymExpr::symbol("theta")), r"\theta");
        assert_eq!(latex(&SymExpr::symbol("x_{1}")), "x_{1}");
        assert_eq!(latex(&SymExpr::constant(Constant::Pi)), r"\pi");
        assert_eq!(
            latex(&SymExpr::call("sin", vec![SymExpr::symbol("x")])),
            r"\sin\left(x\right)",
        );
        assert_eq!(
            latex(&SymExpr::call("abs", vec![SymExpr::symbol("x")])),
            r"\left|x\right|",
        );
    }

    #[test]
    fn latex_fractions() {
        let half = make_fraction(SymExpr::integer(1), SymExpr::integer(2));
        assert_eq!(latex(&half), r"\frac{1}{2}");

        let neg = SymExpr::Mul(vec![
            SymExpr::integer(-1),
            SymExpr::symbol("x"),
            SymExpr::Exp(Box::new(SymExpr::symbol("y")), Box::new(SymExpr::integer(-2))),
        ]);
        assert_eq!(latex(&neg), r"-\frac{x}{y^{2}}");
    }

    #[test]
    fn latex_roots_and_powers() {
        let root = SymExpr::symbol("x").root(SymExpr::integer(2));
        assert_eq!(latex(&root), r"\sqrt{x}");

        let cube = SymExpr::integer(5).root(SymExpr::integer(3));
        assert_eq!(latex(&cube), r"\sqrt[3]{5}");

        let square = SymExpr::Exp(
            Box::new(SymExpr::Add(vec![SymExpr::symbol("x"), SymExpr::integer(1)])),
            Box::new(SymExpr::integer(2)),
        );
        assert_eq!(latex(&square), r"\left(1+x\right)^{2}");
    }

    #[test]
    fn latex_sums() {
        let expr = SymExpr::Add(vec![
            SymExpr::Mul(vec![SymExpr::integer(2), SymExpr::symbol("x")]),
            SymExpr::integer(-1),
        ]);
        assert_eq!(latex(&expr), "-1+2x");
    }
}
