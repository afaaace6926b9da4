//! Simplification rules for powers.

use crate::primitive::int;
use crate::symbolic::{
    expr::{SymExpr, Primary},
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};
use rug::{ops::Pow, Integer};

/// The largest exponent for which integer powers are evaluated.
const MAX_EVALUATED_EXPONENT: u32 = 256;

/// The largest estimated size, in bits, of an evaluated integer power.
const MAX_EVALUATED_BITS: u64 = 4096;

/// The largest exponent for which a power of a sum is expanded.
const MAX_EXPANDED_EXPONENT: u32 = 6;

/// `a^0 = 1`
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.as_integer()?.is_zero() {
            Some(SymExpr::Primary(Primary::Integer(int(1))))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if *rhs.as_integer()? == 1 {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `1^a = 1`
pub fn one_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, _| {
        if *lhs.as_integer()? == 1 {
            Some(SymExpr::Primary(Primary::Integer(int(1))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::OnePower);
    Some(opt)
}

/// `0^a = 0`, `a > 0`
pub fn zero_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.as_integer()?.is_zero() && rhs.as_rational()? > 0 {
            Some(SymExpr::Primary(Primary::Integer(int(0))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::ZeroPower);
    Some(opt)
}

/// Evaluates integer powers of integers.
///
/// `2^3 = 8`
/// `2^-3 = 8^-1`
///
/// Powers whose value would exceed [`MAX_EVALUATED_BITS`] are left unevaluated.
pub fn evaluate_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_integer()?;
        let exp = rhs.as_integer()?;
        if *exp == -1 || base.is_zero() {
            return None;
        }

        let magnitude = exp.clone().abs().to_u32().filter(|n| *n <= MAX_EVALUATED_EXPONENT)?;
        if u64::from(base.significant_bits()) * u64::from(magnitude) > MAX_EVALUATED_BITS {
            return None;
        }
        let value = SymExpr::Primary(Primary::Integer(Integer::from(base.pow(magnitude))));
        if *exp < 0 {
            Some(SymExpr::Exp(Box::new(value), Box::new(SymExpr::Primary(Primary::Integer(int(-1))))))
        } else {
            Some(value)
        }
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// `(a^b)^c = a^(b*c)`, `c` is an integer
pub fn power_of_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if !rhs.is_integer() {
            return None;
        }

        if let SymExpr::Exp(base, inner_exp) = lhs {
            return Some(SymExpr::Exp(
                base.clone(),
                Box::new((**inner_exp).clone() * rhs.clone()),
            ));
        }

        None
    })?;

    step_collector.push(Step::PowerOfPower);
    Some(opt)
}

/// Multiplies two sums together, term by term.
fn multiply_sums(lhs: &[SymExpr], rhs: &[SymExpr]) -> Vec<SymExpr> {
    lhs.iter()
        .flat_map(|a| rhs.iter().map(move |b| a.clone() * b.clone()))
        .collect()
}

/// `(a+b)^2 = a^2 + 2ab + b^2`, and other small positive integer powers of sums
pub fn expand_binomial(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let SymExpr::Add(terms) = lhs else {
            return None;
        };
        let exp = rhs.as_integer()?.to_u32().filter(|n| (2..=MAX_EXPANDED_EXPONENT).contains(n))?;

        let mut product = terms.clone();
        for _ in 1..exp {
            product = multiply_sums(&product, terms);
        }
        Some(SymExpr::Add(product))
    })?;

    step_collector.push(Step::ExpandBinomial);
    Some(opt)
}

/// Applies all power rules.
///
/// All power rules except [`expand_binomial`] will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    power_zero(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| one_power(expr, step_collector))
        .or_else(|| zero_power(expr, step_collector))
        .or_else(|| evaluate_power(expr, step_collector))
        .or_else(|| power_of_power(expr, step_collector))
        .or_else(|| expand_binomial(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn pow(base: SymExpr, exp: SymExpr) -> SymExpr {
        SymExpr::Exp(Box::new(base), Box::new(exp))
    }

    #[test]
    fn evaluate() {
        assert_eq!(
            evaluate_power(&pow(SymExpr::integer(2), SymExpr::integer(10)), &mut ()),
            Some(SymExpr::integer(1024)),
        );
        assert_eq!(
            evaluate_power(&pow(SymExpr::integer(-3), SymExpr::integer(-2)), &mut ()),
            Some(pow(SymExpr::integer(9), SymExpr::integer(-1))),
        );
        assert_eq!(evaluate_power(&pow(SymExpr::integer(5), SymExpr::integer(-1)), &mut ()), None);
    }

    #[test]
    fn large_powers_stay_unevaluated() {
        let big = Integer::from(10).pow(256u32);
        assert_eq!(
            evaluate_power(&pow(SymExpr::Primary(Primary::Integer(big)), SymExpr::integer(256)), &mut ()),
            None,
        );
        assert!(evaluate_power(&pow(SymExpr::integer(10), SymExpr::integer(256)), &mut ()).is_some());
    }

    #[test]
    fn nested_power() {
        let x = SymExpr::symbol("x");
        let expr = pow(pow(x.clone(), SymExpr::integer(2)), SymExpr::integer(3));
        assert_eq!(
            power_of_power(&expr, &mut ()),
            Some(pow(x, SymExpr::integer(6))),
        );
    }

    #[test]
    fn binomial() {
        let sum = SymExpr::Add(vec![SymExpr::symbol("a"), SymExpr::symbol("b")]);
        let expanded = expand_binomial(&pow(sum, SymExpr::integer(2)), &mut ()).unwrap();
        let SymExpr::Add(terms) = expanded else {
            panic!("expected a sum");
        };
        assert_eq!(terms.len(), 4);
    }
}
