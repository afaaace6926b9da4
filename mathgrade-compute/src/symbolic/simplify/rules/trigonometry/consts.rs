//! Exact values of the trigonometric functions at well-known angles.
//!
//! The sine of certain angles can be represented exactly in terms of square roots. We take
//! advantage of this by creating a lookup table of these angles to their sine. Angles are stored
//! as fractions of `pi` between `0` and `pi/2`; every other angle is reduced to this range using
//! the symmetries of the unit circle, and the cosine is derived from the sine.

use crate::symbolic::{
    expr::SymExpr,
    simplify::fraction::make_fraction,
};
use once_cell::sync::Lazy;
use rug::Rational;

fn sqrt(n: i32) -> SymExpr {
    SymExpr::integer(n).root(SymExpr::integer(2))
}

fn half_of(expr: SymExpr) -> SymExpr {
    make_fraction(expr, SymExpr::integer(2))
}

fn quarter_of(expr: SymExpr) -> SymExpr {
    make_fraction(expr, SymExpr::integer(4))
}

/// The sine of `n/d * pi`, keyed by `(n, d)`, for `0 <= n/d <= 1/2`.
static SIN_TABLE: Lazy<Vec<((u32, u32), SymExpr)>> = Lazy::new(|| vec![
    // 0 rad = 0 deg
    ((0, 1), SymExpr::integer(0)),
    // pi/12 rad = 15 deg
    ((1, 12), quarter_of(sqrt(6) - sqrt(2))),
    // pi/8 rad = 22.5 deg
    ((1, 8), half_of((SymExpr::integer(2) - sqrt(2)).root(SymExpr::integer(2)))),
    // pi/6 rad = 30 deg
    ((1, 6), half_of(SymExpr::integer(1))),
    // pi/4 rad = 45 deg
    ((1, 4), half_of(sqrt(2))),
    // pi/3 rad = 60 deg
    ((1, 3), half_of(sqrt(3))),
    // 3pi/8 rad = 67.5 deg
    ((3, 8), half_of((SymExpr::integer(2) + sqrt(2)).root(SymExpr::integer(2)))),
    // 5pi/12 rad = 75 deg
    ((5, 12), quarter_of(sqrt(6) + sqrt(2))),
    // pi/2 rad = 90 deg
    ((1, 2), SymExpr::integer(1)),
]);

/// Reduces the angle `t * pi` into the range `[0, 2pi)`, returning the new `t`.
fn normalize_turn(t: Rational) -> Rational {
    let two = Rational::from(2);
    let turns = Rational::from(&t / &two).floor();
    t - turns * two
}

/// Returns the exact sine of `t * pi`, if it is in the table.
pub fn sin_of_pi_multiple(t: Rational) -> Option<SymExpr> {
    let t = normalize_turn(t);
    if t >= 1 {
        // sin(x + pi) = -sin(x)
        return sin_of_pi_multiple(t - 1).map(|value| -value);
    }
    if t > Rational::from((1, 2)) {
        // sin(pi - x) = sin(x)
        return sin_of_pi_multiple(Rational::from(1) - t);
    }

    let (numer, denom) = t.into_numer_denom();
    let key = (numer.to_u32()?, denom.to_u32()?);
    SIN_TABLE.iter()
        .find(|(angle, _)| *angle == key)
        .map(|(_, value)| value.clone())
}

/// Returns the exact cosine of `t * pi`, if it is in the table.
pub fn cos_of_pi_multiple(t: Rational) -> Option<SymExpr> {
    // cos(x) = sin(pi/2 - x)
    sin_of_pi_multiple(Rational::from((1, 2)) - t)
}
