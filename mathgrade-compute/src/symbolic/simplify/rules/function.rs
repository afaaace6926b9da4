//! Simplification rules for the factorial and absolute value functions.

use crate::symbolic::{
    expr::{SymExpr, Primary},
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};
use rug::Integer;

/// The largest argument for which factorials are evaluated.
const MAX_FACTORIAL: u32 = 100;

/// `n! = 1*2*...*n`, for a small non-negative integer `n`
pub fn factorial(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "factorial", |args| {
        let [arg] = args else {
            return None;
        };
        let n = arg.as_integer()?.to_u32().filter(|n| *n <= MAX_FACTORIAL)?;
        Some(SymExpr::Primary(Primary::Integer(Integer::from(Integer::factorial(n)))))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Factorial);
    Some(opt)
}

/// `|q| = q` or `-q`, for a rational number `q`
pub fn abs(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "abs", |args| {
        let [arg] = args else {
            return None;
        };
        let value = arg.as_rational()?;
        Some(SymExpr::rational(value.abs()))
    })?;

    step_collector.push(Step::Abs);
    Some(opt)
}

/// Applies all function rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    factorial(expr, step_collector)
        .or_else(|| abs(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use crate::symbolic::simplify::fraction::make_fraction;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn small_factorial() {
        let expr = SymExpr::call("factorial", vec![SymExpr::integer(5)]);
        assert_eq!(factorial(&expr, &mut ()), Some(SymExpr::integer(120)));
    }

    #[test]
    fn abs_of_fraction() {
        let expr = SymExpr::call("abs", vec![make_fraction(SymExpr::integer(-3), SymExpr::integer(4))]);
        assert_eq!(abs(&expr, &mut ()), Some(make_fraction(SymExpr::integer(3), SymExpr::integer(4))));
        assert_eq!(abs(&SymExpr::call("abs", vec![SymExpr::symbol("x")]), &mut ()), None);
    }
}
