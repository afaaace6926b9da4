//! Deciding whether an expression is identically zero.

use crate::error::EvalError;
use crate::numerical::{eval, is_negligible};
use super::{
    expr::{SymExpr, Primary},
    simplify::{simplify, Budget, SimplifyOptions},
};
use rug::Integer;

fn is_literal_zero(expr: &SymExpr) -> bool {
    expr.as_integer().map_or(false, |n| n.is_zero())
}

/// If the factor is `b^-k` for a non-numeric base `b` and a positive integer `k`, returns `b`
/// and `k`.
fn symbolic_denominator(factor: &SymExpr) -> Option<(&SymExpr, Integer)> {
    let SymExpr::Exp(base, exp) = factor else {
        return None;
    };
    if base.is_number_literal() {
        return None;
    }
    let exp = exp.as_integer().filter(|n| **n < 0)?;
    Some((&**base, Integer::from(-exp)))
}

/// Multiplies a sum by every symbolic denominator that appears in its terms, raised to the
/// largest power in which it appears.
///
/// Returns [`None`] if there are no symbolic denominators.
fn clear_denominators(expr: &SymExpr) -> Option<SymExpr> {
    let terms = match expr {
        SymExpr::Add(terms) => terms.as_slice(),
        expr => std::slice::from_ref(expr),
    };

    let mut denominators: Vec<(&SymExpr, Integer)> = Vec::new();
    for term in terms {
        let factors = match term {
            SymExpr::Mul(factors) => factors.as_slice(),
            term => std::slice::from_ref(term),
        };
        for (base, power) in factors.iter().filter_map(symbolic_denominator) {
            match denominators.iter_mut().find(|(other, _)| *other == base) {
                Some((_, existing)) if *existing < power => *existing = power,
                Some(_) => {},
                None => denominators.push((base, power)),
            }
        }
    }

    if denominators.is_empty() {
        return None;
    }

    let mut factors = vec![expr.clone()];
    factors.extend(denominators.into_iter().map(|(base, power)| {
        SymExpr::Exp(Box::new(base.clone()), Box::new(SymExpr::Primary(Primary::Integer(power))))
    }));
    Some(SymExpr::Mul(factors))
}

/// Returns true if the expression is zero for every value of its free variables.
///
/// The expression is simplified first. If that does not reduce it to `0`, symbolic
/// denominators are cleared and the result is simplified again. Finally, an expression without
/// free variables is evaluated numerically. A result of `false` means that zero-ness could not
/// be shown, not that the expression is nonzero.
pub fn is_zero(
    expr: &SymExpr,
    options: &SimplifyOptions,
    budget: &mut Budget,
) -> Result<bool, EvalError> {
    let simplified = simplify(expr, options, budget)?;
    if is_literal_zero(&simplified) {
        return Ok(true);
    }
    if simplified.as_rational().map_or(false, |value| value != 0) {
        // an exact nonzero number, however small
        return Ok(false);
    }

    if let Some(cleared) = clear_denominators(&simplified) {
        if is_literal_zero(&simplify(&cleared, options, budget)?) {
            return Ok(true);
        }
    }

    if simplified.is_closed() {
        return match eval(&simplified) {
            Ok(value) => Ok(is_negligible(&value)),
            Err(EvalError::Undefined) => Ok(false),
            Err(err) => Err(err),
        };
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use mathgrade_parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn zero(input: &str) -> bool {
        let expr = parse_expr(input).unwrap();
        let expr = SymExpr::try_from(&expr).unwrap().substitute_reserved();
        is_zero(&expr, &SimplifyOptions::default(), &mut Budget::new(20_000)).unwrap()
    }

    #[test]
    fn polynomial_identity() {
        assert!(zero("(x+1)^2 - (x^2 + 2x + 1)"));
        assert!(!zero("(x+1)^2 - (x^2 + 1)"));
    }

    #[test]
    fn rational_function() {
        assert!(zero(r"\frac{1}{x} + \frac{1}{x} - \frac{2}{x}"));
        assert!(zero(r"\frac{x^2 - 1}{x - 1} - (x + 1)"));
    }

    #[test]
    fn numeric_constants() {
        assert!(zero(r"\sqrt{2}\sqrt{2} - 2"));
        assert!(zero(r"e^{i\pi} + 1"));
        assert!(!zero(r"\pi - 3.14"));
    }

    #[test]
    fn tiny_exact_difference() {
        assert!(!zero("1 + 10^{-200} - 1"));
        assert!(!zero(r"\frac{1}{10^{200}}"));
    }

    #[test]
    fn denominators() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::Mul(vec![
            SymExpr::integer(3),
            SymExpr::Exp(Box::new(x.clone()), Box::new(SymExpr::integer(-2))),
        ]);
        assert_eq!(
            clear_denominators(&expr),
            Some(SymExpr::Mul(vec![
                expr.clone(),
                SymExpr::Exp(Box::new(x), Box::new(SymExpr::integer(2))),
            ])),
        );
    }
}
