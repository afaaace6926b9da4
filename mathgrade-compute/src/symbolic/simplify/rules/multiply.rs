//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::primitive::int;
use crate::symbolic::{
    expr::{SymExpr, Primary},
    simplify::{fraction::{extract_integer_fraction, make_fraction}, rules::do_multiply, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `a*(b*c) = a*b*c`
pub fn flatten_product(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        let new_factors = factors.iter()
            .flat_map(|factor| match factor {
                SymExpr::Mul(inner) => inner.clone(),
                factor => vec![factor.clone()],
            })
            .collect::<Vec<_>>();
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::FlattenProduct);
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().any(|factor| factor.as_integer().map(|n| n.is_zero()).unwrap_or(false)) {
            Some(SymExpr::Primary(Primary::Integer(int(0))))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| {
                // keep all non-one factors
                factor.as_integer()
                    .map(|n| n != &1)
                    .unwrap_or(true)
            })
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() && factors.len() >= 2 {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Simplifies numerical fractions, moving the sign to the numerator.
///
/// `3/12 = 1/4`
/// `12/3 = 4`
/// `1/(-2) = -1/2`
pub fn reduce_numerical_fraction(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();

        // extract a fraction, a Integer and a Integer^-1
        let (mut numerator, mut denominator) = extract_integer_fraction(&mut new_factors, true, false)?;
        if denominator.is_zero() {
            return None;
        }

        // reduce the fraction
        let gcd = numerator.clone().gcd(&denominator);
        if gcd == 1 && denominator > 0 {
            return None;
        }
        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }

        // insert the reduced fraction back into the factors
        Some(SymExpr::Mul(new_factors) * make_fraction(
            SymExpr::Primary(Primary::Integer(numerator / &gcd)),
            SymExpr::Primary(Primary::Integer(denominator / &gcd)),
        ))
    })?;

    step_collector.push(Step::ReduceFraction);
    Some(opt)
}

/// Returns true if two powers of the same integer base can be merged into one power.
///
/// Powers of an integer are kept with an integer exponent, or a fractional exponent between 0 and
/// 1, so that merging never undoes the extraction of perfect roots.
fn can_merge_integer_powers(lhs_exp: &SymExpr, rhs_exp: &SymExpr) -> bool {
    match (lhs_exp.as_rational(), rhs_exp.as_rational()) {
        (Some(lhs), Some(rhs)) => {
            let sum = lhs + rhs;
            *sum.denom() == 1 || (sum > 0 && sum < 1)
        },
        _ => true,
    }
}

/// Returns true if the expression is a positive integer.
fn is_positive_integer(expr: &SymExpr) -> bool {
    expr.as_integer().map_or(false, |n| *n > 0)
}

/// Combines like factors.
///
/// `a^b*a^c = a^(b+c)`
/// `a^c*b^c = (a*b)^c`, if `a` and `b` are numbers and `c` is an integer, or `a` and `b` are
/// positive integers
/// etc.
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();
        let mut current_factor_idx = 0;

        /// Utility function to extract the base and exponent of an expression. If the expression
        /// is not [`SymExpr::Exp`], the exponent is `1`.
        ///
        /// - `a^b` -> `(a, b)`
        /// - `a` -> `(a, 1)`
        fn get_exp(expr: &SymExpr) -> (SymExpr, SymExpr) {
            match expr {
                SymExpr::Exp(lhs, rhs) => (*lhs.clone(), *rhs.clone()),
                expr => (expr.clone(), SymExpr::Primary(Primary::Integer(int(1)))),
            }
        }

        // this is O(n^2) worst case, due to scanning the whole vec for each factor
        while current_factor_idx < new_factors.len() {
            let (mut current_factor, mut current_factor_exp) = get_exp(&new_factors[current_factor_idx]);
            let mut combined = false;

            // look at every factor after `current_factor`
            let mut next_factor_idx = current_factor_idx + 1;
            while next_factor_idx < new_factors.len() {
                let (next_factor, next_factor_exp) = get_exp(&new_factors[next_factor_idx]);

                let same_number_kind = current_factor.is_integer() && next_factor.is_integer()
                    || current_factor.is_float() && next_factor.is_float();
                let mergeable_bases = current_factor_exp.is_integer()
                    || is_positive_integer(&current_factor) && is_positive_integer(&next_factor);

                if current_factor_exp == next_factor_exp && same_number_kind && mergeable_bases {
                    // degrees must be strictly equal
                    // if they are, apply a^c*b^c = (a*b)^c
                    current_factor *= next_factor;
                    new_factors.swap_remove(next_factor_idx);
                    combined = true;
                } else if current_factor == next_factor
                    && (!current_factor.is_integer()
                        || can_merge_integer_powers(&current_factor_exp, &next_factor_exp))
                {
                    // bases must be strictly equal
                    // if they are, apply a^b*a^c = a^(b+c)
                    current_factor_exp += next_factor_exp;
                    new_factors.swap_remove(next_factor_idx);
                    combined = true;
                } else {
                    next_factor_idx += 1;
                }
            }

            // after all combining, update the current factor
            if combined {
                if current_factor_exp.as_integer().map(|n| n == &1).unwrap_or(false) {
                    new_factors[current_factor_idx] = current_factor;
                } else {
                    new_factors[current_factor_idx] = SymExpr::Exp(
                        Box::new(current_factor),
                        Box::new(current_factor_exp),
                    );
                }
            }

            current_factor_idx += 1;
        }

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Returns the numeric coefficient of a product, and the remaining factors.
///
/// - `3x` -> `(3, x)`
/// - `-x/2` -> `(-1/2, x)`
/// - `x` -> `(1, x)`
pub(crate) fn split_coefficient(expr: &SymExpr) -> (Rational, SymExpr) {
    match expr {
        SymExpr::Mul(factors) => {
            let mut coeff = Rational::from(1);
            let mut rest = Vec::new();
            for factor in factors {
                match factor.as_rational() {
                    Some(value) => coeff *= value,
                    None => rest.push(factor.clone()),
                }
            }
            (coeff, SymExpr::Mul(rest).downgrade())
        },
        expr => match expr.as_rational() {
            Some(value) => (value, SymExpr::Primary(Primary::Integer(int(1)))),
            None => (Rational::from(1), expr.clone()),
        },
    }
}

/// Applies all multiplication rules.
///
/// All multiplication rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten_product(expr, step_collector)
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| reduce_numerical_fraction(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn reduce_fraction() {
        let expr = make_fraction(SymExpr::integer(3), SymExpr::integer(12));
        assert_eq!(
            reduce_numerical_fraction(&expr, &mut ()),
            Some(make_fraction(SymExpr::integer(1), SymExpr::integer(4))),
        );
    }

    #[test]
    fn negative_denominator() {
        let expr = make_fraction(SymExpr::integer(1), SymExpr::integer(-2));
        assert_eq!(
            reduce_numerical_fraction(&expr, &mut ()),
            Some(make_fraction(SymExpr::integer(-1), SymExpr::integer(2))),
        );
    }

    #[test]
    fn like_factors() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::Mul(vec![
            x.clone(),
            SymExpr::Exp(Box::new(x.clone()), Box::new(SymExpr::integer(2))),
        ]);
        assert_eq!(
            combine_like_factors(&expr, &mut ()),
            Some(SymExpr::Exp(
                Box::new(x),
                Box::new(SymExpr::integer(3)),
            )),
        );
    }

    #[test]
    fn keeps_extracted_root() {
        // 2 * 2^(1/2) must not merge back into 2^(3/2)
        let two = SymExpr::integer(2);
        let expr = SymExpr::Mul(vec![two.clone(), two.root(SymExpr::integer(2))]);
        assert_eq!(combine_like_factors(&expr, &mut ()), None);
    }

    #[test]
    fn coefficient() {
        let expr = SymExpr::Mul(vec![
            SymExpr::integer(-1),
            SymExpr::symbol("x"),
            SymExpr::Exp(Box::new(SymExpr::integer(2)), Box::new(SymExpr::integer(-1))),
        ]);
        let (coeff, rest) = split_coefficient(&expr);
        assert_eq!(coeff, Rational::from((-1, 2)));
        assert_eq!(rest, SymExpr::symbol("x"));
    }
}
