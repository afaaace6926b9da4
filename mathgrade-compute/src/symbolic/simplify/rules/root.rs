//! Simplification rules for square, cube, and higher roots of integers.
//!
//! Roots are represented as powers with a fractional exponent, so `\sqrt{8}` is `8^(1/2)`. The
//! rules here write such powers in a canonical form: the exponent is split into its integer
//! part and a fraction between 0 and 1, and perfect powers are moved out of the root.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Constant, SymExpr, Primary},
    simplify::{fraction::make_fraction, rules::do_power, step::Step},
    step_collector::StepCollector,
};
use rug::{ops::Pow, Integer, Rational};

/// The largest integer whose roots are simplified. Factoring larger integers by trial division
/// is too slow.
const MAX_FACTORED: u64 = 1_000_000_000_000;

/// Returns the prime factorization of the given positive integer, as a list of primes and their
/// multiplicities, in increasing order of the primes.
fn prime_factorization(mut n: Integer) -> Vec<(Integer, u32)> {
    let mut factors = Vec::new();
    let mut i = Integer::from(2);
    while Integer::from(&i * &i) <= n {
        let mut count = 0;
        while n.is_divisible(&i) {
            n /= &i;
            count += 1;
        }
        if count > 0 {
            factors.push((i.clone(), count));
        }
        i += 1;
    }

    if n > 1 {
        factors.push((n, 1));
    }

    factors
}

/// Builds `n^(p/q)` with no simplification.
fn rational_power(base: Integer, exp: Rational) -> SymExpr {
    let (numer, denom) = exp.into_numer_denom();
    let exp = if denom == 1 {
        SymExpr::Primary(Primary::Integer(numer))
    } else {
        make_fraction(SymExpr::Primary(Primary::Integer(numer)), SymExpr::Primary(Primary::Integer(denom)))
    };
    SymExpr::Exp(Box::new(SymExpr::Primary(Primary::Integer(base))), Box::new(exp))
}

/// `n^(p/q) = n^k * n^(r/q)`, where `p = kq + r` and `0 < r < q`
///
/// `2^(3/2) = 2 * 2^(1/2)`
/// `2^(-1/2) = 2^-1 * 2^(1/2)`
pub fn split_exponent(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_integer()?;
        let exp = rhs.as_rational()?;
        if *exp.denom() == 1 || (exp > 0 && exp < 1) || *base <= 0 {
            return None;
        }

        let whole = exp.clone().floor();
        let fraction = exp - &whole;
        let whole = whole.into_numer_denom().0;
        Some(
            SymExpr::Exp(
                Box::new(lhs.clone()),
                Box::new(SymExpr::Primary(Primary::Integer(whole))),
            ) * rational_power(base.clone(), fraction)
        )
    })?;

    step_collector.push(Step::Root);
    Some(opt)
}

/// Moves perfect powers out of the root of a positive integer.
///
/// `8^(1/2) = 2 * 2^(1/2)`
/// `16^(1/4) = 2`
/// `4^(1/4) = 2^(1/2)`
pub fn perfect_root(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_integer()?;
        let exp = rhs.as_rational()?;
        if *base <= 1 || base.to_u64().map_or(true, |n| n > MAX_FACTORED) || !(exp > 0 && exp < 1) {
            return None;
        }

        // n^(r/q) = prod p^(e*r/q)
        let (r, q) = exp.into_numer_denom();
        let r = r.to_u32()?;
        let q = q.to_u32()?;
        let factorization = prime_factorization(base.clone());

        let mut outside = Integer::from(1);
        let mut inside = Vec::new();
        for (prime, multiplicity) in factorization {
            let total = multiplicity.checked_mul(r)?;
            outside *= Integer::from(prime.clone().pow(total / q));
            if total % q != 0 {
                inside.push((prime, total % q));
            }
        }

        // reduce the index of the remaining root by the common factor of the multiplicities
        let common = inside.iter().fold(q, |acc, (_, m)| gcd(acc, *m));
        let index = q / common;
        let radicand = inside.into_iter().fold(Integer::from(1), |acc, (prime, m)| {
            acc * Integer::from(prime.pow(m / common))
        });

        if outside == 1 && index == q && r == 1 {
            return None;
        }

        let outside = SymExpr::Primary(Primary::Integer(outside));
        if radicand == 1 {
            Some(outside)
        } else {
            Some(outside * rational_power(radicand, Rational::from((1, index))))
        }
    })?;

    step_collector.push(Step::Root);
    Some(opt)
}

/// `(-n)^(1/2) = i * n^(1/2)`, `n > 0`
pub fn sqrt_negative(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_integer()?;
        if *base >= 0 || rhs.as_rational()? != Rational::from((1, 2)) {
            return None;
        }

        let positive = Integer::from(-base);
        let root = if positive == 1 {
            SymExpr::Primary(Primary::Integer(int(1)))
        } else {
            rational_power(positive, Rational::from((1, 2)))
        };
        Some(SymExpr::constant(Constant::I) * root)
    })?;

    step_collector.push(Step::SqrtNegative);
    Some(opt)
}

/// Greatest common divisor of two small integers.
fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Applies all root rules.
///
/// Root simplification may or may not reduce the complexity of the expression, since it can
/// introduce additional operations. However, it may be necessary for future rules to apply.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    split_exponent(expr, step_collector)
        .or_else(|| perfect_root(expr, step_collector))
        .or_else(|| sqrt_negative(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn root(n: i32, index: i32) -> SymExpr {
        SymExpr::integer(n).root(SymExpr::integer(index))
    }

    #[test]
    fn factorization() {
        assert_eq!(
            prime_factorization(int(360)),
            vec![(int(2), 3), (int(3), 2), (int(5), 1)],
        );
        assert_eq!(prime_factorization(int(97)), vec![(int(97), 1)]);
    }

    #[test]
    fn perfect_square() {
        assert_eq!(perfect_root(&root(16, 2), &mut ()), Some(SymExpr::integer(4)));
        assert_eq!(perfect_root(&root(16, 4), &mut ()), Some(SymExpr::integer(2)));
    }

    #[test]
    fn partial_root() {
        assert_eq!(
            perfect_root(&root(8, 2), &mut ()),
            Some(SymExpr::integer(2) * rational_power(int(2), Rational::from((1, 2)))),
        );
        assert_eq!(
            perfect_root(&root(4, 4), &mut ()),
            Some(SymExpr::integer(1) * rational_power(int(2), Rational::from((1, 2)))),
        );
    }

    #[test]
    fn irreducible() {
        assert_eq!(perfect_root(&root(6, 2), &mut ()), None);
    }

    #[test]
    fn negative_radicand() {
        assert_eq!(
            sqrt_negative(&root(-4, 2), &mut ()),
            Some(SymExpr::constant(Constant::I) * rational_power(int(4), Rational::from((1, 2)))),
        );
    }
}
