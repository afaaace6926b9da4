use rug::{Float, Integer, Rational};
use std::cmp::Ordering;
use super::primitive::float;

/// The maximum number of continued fraction terms to compute.
const MAX_TERMS: usize = 128;

/// Computes the [`Rational`] from the continued fraction form of a float.
fn rational_from_continued_fraction(continued_fraction_form: &[Integer]) -> Rational {
    let mut rational = Rational::new();
    for (i, integer) in continued_fraction_form.iter().rev().enumerate() {
        if i == 0 {
            if integer.cmp0() == Ordering::Equal {
                continue;
            }
            rational += Rational::from(Rational::ONE / integer);
        } else {
            rational = (rational + integer).recip();
        }
    }

    if rational.cmp0() == Ordering::Equal {
        rational
    } else {
        rational.recip()
    }
}

/// Approximates the given float as a rational fraction.
///
/// This function applies the continued fraction algorithm to the given float until the error is
/// less than `1e-60`. Returns [`None`] if the float is not finite.
///
/// We don't use [`Float::to_rational`] because a decimal such as `0.1` has no exact binary
/// representation, and the exact rational of its binary approximation is useless. The continued
/// fraction algorithm recovers `1/10` instead.
///
/// See
/// [Wikipedia](https://en.wikipedia.org/wiki/Continued_fraction#Calculating_continued_fraction_representations)
/// for more information.
pub fn approximate_rational(n: &Float) -> Option<Rational> {
    let orig = n;

    let mut continued_fraction_form = Vec::new();
    let mut n = n.clone();
    while continued_fraction_form.len() < MAX_TERMS {
        let (integer, fractional) = n.trunc_fract(float(0));
        continued_fraction_form.push(integer.to_integer()?);

        // check how close we are to the original number
        let rational = rational_from_continued_fraction(&continued_fraction_form);
        let error = float(orig - rational).abs();

        if fractional.is_zero() || error < 1e-60 {
            break;
        }

        n = fractional.recip();
    }

    Some(rational_from_continued_fraction(&continued_fraction_form))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::primitive::float_from_str;

    fn approx(s: &str) -> Option<(i64, i64)> {
        let rational = approximate_rational(&float_from_str(s)?)?;
        let (numer, denom) = rational.into_numer_denom();
        Some((numer.to_i64()?, denom.to_i64()?))
    }

    #[test]
    fn decimals() {
        assert_eq!(approx("0.1"), Some((1, 10)));
        assert_eq!(approx("3.14"), Some((157, 50)));
        assert_eq!(approx("2.5"), Some((5, 2)));
        assert_eq!(approx("-0.75"), Some((-3, 4)));
        assert_eq!(approx("4"), Some((4, 1)));
        assert_eq!(approx("0"), Some((0, 1)));
    }

    #[test]
    fn non_finite() {
        assert_eq!(approximate_rational(&float(rug::float::Special::Nan)), None);
    }
}
