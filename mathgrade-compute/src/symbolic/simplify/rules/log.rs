//! Simplification rules for logarithms and the exponential function.
//!
//! Every logarithm is rewritten in terms of the natural logarithm first, so that the remaining
//! rules only need to handle `ln`.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Constant, SymExpr, Primary},
    simplify::{fraction::make_fraction, rules::{do_call, do_power}, step::Step, SimplifyOptions},
    step_collector::StepCollector,
};

fn ln(arg: SymExpr) -> SymExpr {
    SymExpr::call("ln", vec![arg])
}

/// Returns true if the expression is known to be a positive real number.
pub(crate) fn is_positive(expr: &SymExpr) -> bool {
    match expr {
        SymExpr::Primary(Primary::Const(Constant::E | Constant::Pi | Constant::Infinity)) => true,
        SymExpr::Primary(Primary::Float(float)) => *float > 0,
        SymExpr::Mul(factors) => factors.iter().all(is_positive),
        SymExpr::Add(terms) => terms.iter().all(is_positive),
        SymExpr::Exp(base, exp) => is_positive(base) && exp.as_rational().is_some(),
        expr => expr.as_rational().map_or(false, |value| value > 0),
    }
}

/// `log(x) = ln(x)/ln(10)`
/// `log(x, b) = ln(x)/ln(b)`
pub fn log_base(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "log", |args| {
        match args {
            [arg] => Some(make_fraction(ln(arg.clone()), ln(SymExpr::integer(10)))),
            [arg, base] => Some(make_fraction(ln(arg.clone()), ln(base.clone()))),
            _ => None,
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::LogBase);
    Some(opt)
}

/// `ln(1) = 0`
pub fn log_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "ln", |args| {
        if *args.first()?.as_integer()? == 1 {
            Some(SymExpr::Primary(Primary::Integer(int(0))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::LogOne);
    Some(opt)
}

/// `ln(e) = 1`
pub fn log_e(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "ln", |args| {
        if args.first()?.as_constant()? == Constant::E {
            Some(SymExpr::Primary(Primary::Integer(int(1))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::LogE);
    Some(opt)
}

/// `e^(ln(x)) = x`
/// `e^(n*ln(x)) = x^n`
pub fn exp_log(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.as_constant()? != Constant::E {
            return None;
        }

        if let Some([arg]) = rhs.as_call("ln") {
            return Some(arg.clone());
        }

        let SymExpr::Mul(factors) = rhs else {
            return None;
        };
        let idx = factors.iter().position(|factor| factor.as_call("ln").map_or(false, |args| args.len() == 1))?;
        let mut rest = factors.clone();
        let log = rest.swap_remove(idx);
        let arg = log.as_call("ln")?.first()?.clone();
        Some(SymExpr::Exp(Box::new(arg), Box::new(SymExpr::Mul(rest).downgrade())))
    })?;

    step_collector.push(Step::ExpLog);
    Some(opt)
}

/// `ln(a*b) = ln(a) + ln(b)`, `a, b > 0`
pub fn log_product(expr: &SymExpr, force: bool, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "ln", |args| {
        let [SymExpr::Mul(factors)] = args else {
            return None;
        };
        if !force && !factors.iter().all(is_positive) {
            return None;
        }

        Some(SymExpr::Add(factors.iter().cloned().map(ln).collect()))
    })?;

    step_collector.push(Step::LogProduct);
    Some(opt)
}

/// `ln(a^n) = n*ln(a)`, `a > 0`
pub fn log_power(expr: &SymExpr, force: bool, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "ln", |args| {
        let [SymExpr::Exp(base, exp)] = args else {
            return None;
        };
        if base.as_constant() == Some(Constant::E) {
            return None;
        }
        if !force && !is_positive(base) {
            return None;
        }

        Some((**exp).clone() * ln((**base).clone()))
    })?;

    step_collector.push(Step::LogPower);
    Some(opt)
}

/// `ln(e^x) = x`, `x` real
pub fn log_exp(expr: &SymExpr, force: bool, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "ln", |args| {
        let [SymExpr::Exp(base, exp)] = args else {
            return None;
        };
        if base.as_constant()? != Constant::E {
            return None;
        }
        if !force && exp.as_rational().is_none() {
            return None;
        }

        Some((**exp).clone())
    })?;

    step_collector.push(Step::LogExp);
    Some(opt)
}

/// Applies all logarithm rules. The expansion rules are only applied if
/// [`SimplifyOptions::expand_log`] is set.
pub fn all(
    expr: &SymExpr,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<SymExpr> {
    let always = log_base(expr, step_collector)
        .or_else(|| log_one(expr, step_collector))
        .or_else(|| log_e(expr, step_collector))
        .or_else(|| exp_log(expr, step_collector));
    if always.is_some() || !options.expand_log {
        return always;
    }

    log_product(expr, options.force, step_collector)
        .or_else(|| log_power(expr, options.force, step_collector))
        .or_else(|| log_exp(expr, options.force, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn change_of_base() {
        let expr = SymExpr::call("log", vec![SymExpr::symbol("x"), SymExpr::integer(2)]);
        assert_eq!(
            log_base(&expr, &mut ()),
            Some(make_fraction(ln(SymExpr::symbol("x")), ln(SymExpr::integer(2)))),
        );
    }

    #[test]
    fn product_requires_positive_factors() {
        let expr = ln(SymExpr::Mul(vec![SymExpr::integer(2), SymExpr::symbol("x")]));
        assert_eq!(log_product(&expr, false, &mut ()), None);
        assert_eq!(
            log_product(&expr, true, &mut ()),
            Some(SymExpr::Add(vec![ln(SymExpr::integer(2)), ln(SymExpr::symbol("x"))])),
        );
    }

    #[test]
    fn exp_of_log() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::Exp(
            Box::new(SymExpr::constant(Constant::E)),
            Box::new(SymExpr::Mul(vec![SymExpr::integer(2), ln(x.clone())])),
        );
        assert_eq!(
            exp_log(&expr, &mut ()),
            Some(SymExpr::Exp(Box::new(x), Box::new(SymExpr::integer(2)))),
        );
    }
}
