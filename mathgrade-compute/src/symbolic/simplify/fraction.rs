//! Tools to help manipulate fractions.

use crate::approx::approximate_rational;
use crate::primitive::int;
use crate::symbolic::expr::{SymExpr, Primary};
use rug::Integer;

/// Create a [`SymExpr`] representing a fraction with the given numerator and denominator.
///
/// The representation is a [`SymExpr::Mul`] containing two factors. The first factor is the
/// numerator, and the second factor is the denominator raised to the power of -1.
pub(crate) fn make_fraction(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    numerator *
        SymExpr::Exp(
            Box::new(denominator),
            Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
        )
}

/// Extracts a numerical fraction from the factors of a [`SymExpr::Mul`].
///
/// Fractions are represented as a [`SymExpr::Mul`] containing a [`Primary::Integer`] and a
/// [`SymExpr::Exp`] whose base is a [`Primary::Integer`] and whose exponent is `-1`.
///
/// This function finds the first factors that match this pattern, removes them, and returns the
/// numerator and denominator. When `numerator_optional` is `true`, an implied 1 is returned as the
/// numerator if no [`Primary::Integer`] is found. When `denominator_optional` is `true`, an
/// implied 1 is returned as the denominator if no reciprocal is found.
///
/// If [`None`] is returned, `factors` is left untouched.
pub(crate) fn extract_integer_fraction(
    factors: &mut Vec<SymExpr>,
    numerator_optional: bool,
    denominator_optional: bool,
) -> Option<(Integer, Integer)> {
    let numerator_idx = factors.iter().position(SymExpr::is_integer);
    let denominator_idx = factors.iter().position(SymExpr::is_integer_recip);

    match (numerator_idx, denominator_idx) {
        (Some(_), None) if !denominator_optional => return None,
        (None, Some(_)) if !numerator_optional => return None,
        (None, None) if !(numerator_optional && denominator_optional) => return None,
        _ => (),
    }

    // remove larger index first, so that the smaller index is still valid
    let (numerator, denominator) = match (numerator_idx, denominator_idx) {
        (Some(n), Some(d)) if n > d => {
            let numerator = factors.swap_remove(n).into_integer();
            (numerator, factors.swap_remove(d).into_integer_recip())
        },
        (Some(n), Some(d)) => {
            let denominator = factors.swap_remove(d).into_integer_recip();
            (factors.swap_remove(n).into_integer(), denominator)
        },
        (Some(n), None) => (factors.swap_remove(n).into_integer(), Some(int(1))),
        (None, Some(d)) => (Some(int(1)), factors.swap_remove(d).into_integer_recip()),
        (None, None) => (Some(int(1)), Some(int(1))),
    };

    Some((numerator?, denominator?))
}

/// Extracts an expression from the factors of a [`SymExpr::Mul`] that represents a numeric
/// coefficient. This is like [`extract_integer_fraction`], but the result of the function is a
/// [`SymExpr`], and not the extracted numerator and denominator.
///
/// [`Primary::Float`]s are also extracted, and returned as-is.
pub(crate) fn extract_fractional(factors: &mut Vec<SymExpr>) -> Option<SymExpr> {
    if let Some(idx) = factors.iter().position(SymExpr::is_float) {
        return Some(factors.swap_remove(idx));
    }

    let numerator_idx = factors.iter().position(SymExpr::is_integer);
    let denominator_idx = factors.iter().position(SymExpr::is_integer_recip);
    match (numerator_idx, denominator_idx) {
        (Some(numerator_idx), Some(denominator_idx)) => {
            // remove larger index first, so that the smaller index is still valid
            if numerator_idx > denominator_idx {
                Some(factors.swap_remove(numerator_idx)
                    * factors.swap_remove(denominator_idx))
            } else {
                Some(factors.swap_remove(denominator_idx)
                    * factors.swap_remove(numerator_idx))
            }
        },
        (Some(numerator_idx), None) => Some(factors.swap_remove(numerator_idx)),
        (None, Some(denominator_idx)) => Some(factors.swap_remove(denominator_idx)),
        (None, None) => None,
    }
}

/// A more aggressive version of [`extract_integer_fraction`] that extracts numerical fractions
/// from any kind of expression, replacing the original expression with a [`Primary::Integer`]
/// containing the number 1.
///
/// Fractions are extracted as follows:
///
/// - [`Primary::Integer`] `n` -> `n / 1`
/// - [`Primary::Float`] -> rational approximation of the float
/// - [`SymExpr::Mul`] -> the first integer factor over the first reciprocal factor (or 1)
/// - [`SymExpr::Exp`] -> `1 / n`, if the base is an integer `n` and the exponent is `-1`
pub(crate) fn extract_explicit_frac(expr: &mut SymExpr) -> Option<(Integer, Integer)> {
    match expr {
        SymExpr::Primary(Primary::Integer(num)) => {
            Some((std::mem::replace(num, int(1)), int(1)))
        },
        SymExpr::Primary(Primary::Float(num)) => {
            let rational = approximate_rational(num)?;
            *expr = SymExpr::Primary(Primary::Integer(int(1)));
            Some(rational.into_numer_denom())
        },
        SymExpr::Mul(factors) => extract_integer_fraction(factors, false, true),
        SymExpr::Exp(..) => {
            let denominator = expr.as_integer_recip()?.clone();
            *expr = SymExpr::Primary(Primary::Integer(int(1)));
            Some((int(1), denominator))
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn extract_fraction_from_factors() {
        let mut factors = vec![
            SymExpr::symbol("x"),
            SymExpr::Exp(Box::new(SymExpr::integer(4)), Box::new(SymExpr::integer(-1))),
            SymExpr::integer(3),
        ];
        assert_eq!(extract_integer_fraction(&mut factors, false, false), Some((int(3), int(4))));
        assert_eq!(factors, vec![SymExpr::symbol("x")]);
    }

    #[test]
    fn missing_denominator() {
        let mut factors = vec![SymExpr::symbol("x"), SymExpr::integer(3)];
        assert_eq!(extract_integer_fraction(&mut factors, false, false), None);
        assert_eq!(factors.len(), 2);
        assert_eq!(extract_integer_fraction(&mut factors, false, true), Some((int(3), int(1))));
    }

    #[test]
    fn explicit_fraction() {
        let mut expr = make_fraction(SymExpr::integer(2), SymExpr::integer(7));
        assert_eq!(extract_explicit_frac(&mut expr), Some((int(2), int(7))));
        assert_eq!(expr, SymExpr::Mul(vec![]));
    }
}
