//! Conversion of decimal literals to exact fractions.

use crate::approx::approximate_rational;
use crate::symbolic::{
    expr::{SymExpr, Primary},
    simplify::step::Step,
    step_collector::StepCollector,
};

/// `0.25 = 1/4`
///
/// Decimals typed by students are exact values, so they are replaced by the fraction they
/// represent before any other rule sees them.
pub fn decimal_to_fraction(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Float(float)) = expr else {
        return None;
    };
    let rational = approximate_rational(float)?;

    step_collector.push(Step::Decimal);
    Some(SymExpr::rational(rational))
}

/// Applies all decimal rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    decimal_to_fraction(expr, step_collector)
}

#[cfg(test)]
mod tests {
    use crate::primitive::float_from_str;
    use crate::symbolic::simplify::fraction::make_fraction;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn quarter() {
        let expr = SymExpr::Primary(Primary::Float(float_from_str("0.25").unwrap()));
        assert_eq!(
            decimal_to_fraction(&expr, &mut ()),
            Some(make_fraction(SymExpr::integer(1), SymExpr::integer(4))),
        );
    }

    #[test]
    fn whole() {
        let expr = SymExpr::Primary(Primary::Float(float_from_str("3.0").unwrap()));
        assert_eq!(decimal_to_fraction(&expr, &mut ()), Some(SymExpr::integer(3)));
    }
}
