//! Simplification rules for expressions involving the imaginary unit.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Constant, SymExpr, Primary},
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};

// i^..
// 0 1 2  3
// 1 i -1 -i
//
// 4 5 6  7
// 1 i -1 -i

/// `i^(4n) = 1`
/// `i^(4n+1) = i`
/// `i^(4n+2) = -1`
/// `i^(4n+3) = -i`
pub fn i_pow(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.as_constant()? != Constant::I {
            return None;
        }

        let i = || SymExpr::constant(Constant::I);
        match rhs.as_integer()?.mod_u(4) {
            0 => Some(SymExpr::Primary(Primary::Integer(int(1)))),
            1 => Some(i()),
            2 => Some(SymExpr::Primary(Primary::Integer(int(-1)))),
            _ => Some(-i()),
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::ImaginaryPower);
    Some(opt)
}

/// Applies all imaginary unit rules.
///
/// All imaginary unit rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    i_pow(expr, step_collector)
}
