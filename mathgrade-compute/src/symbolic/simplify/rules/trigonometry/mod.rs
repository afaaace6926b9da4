//! Simplification rules for trigonometric functions.

mod consts;

use crate::primitive::int;
use crate::symbolic::{
    expr::{Constant, SymExpr, Primary},
    simplify::{
        fraction::make_fraction,
        rules::{do_add, do_call, multiply::split_coefficient},
        step::Step,
        SimplifyOptions,
    },
    step_collector::StepCollector,
};
use consts::{cos_of_pi_multiple, sin_of_pi_multiple};
use rug::Rational;

/// The largest multiple `n` for which `sin(nx)` and `cos(nx)` are expanded.
const MAX_MULTIPLE: u32 = 12;

fn sin(arg: SymExpr) -> SymExpr {
    SymExpr::call("sin", vec![arg])
}

fn cos(arg: SymExpr) -> SymExpr {
    SymExpr::call("cos", vec![arg])
}

/// If the expression is a rational multiple of `pi`, returns the multiple.
///
/// - `0` -> `0`
/// - `pi` -> `1`
/// - `3pi/4` -> `3/4`
fn pi_multiple(expr: &SymExpr) -> Option<Rational> {
    match expr {
        SymExpr::Primary(Primary::Integer(n)) if n.is_zero() => Some(Rational::new()),
        SymExpr::Primary(Primary::Const(Constant::Pi)) => Some(Rational::from(1)),
        SymExpr::Mul(factors) => {
            let mut has_pi = false;
            let mut multiple = Rational::from(1);
            for factor in factors {
                if factor.as_constant() == Some(Constant::Pi) && !has_pi {
                    has_pi = true;
                } else {
                    multiple *= factor.as_rational()?;
                }
            }
            has_pi.then_some(multiple)
        },
        _ => None,
    }
}

/// Returns the single argument of a call to the given function.
fn single_arg<'a>(expr: &'a SymExpr, name: &str) -> Option<&'a SymExpr> {
    match expr.as_call(name)? {
        [arg] => Some(arg),
        _ => None,
    }
}

/// `sin(pi/6) = 1/2`, and other exact values
pub fn sin_exact(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "sin", |args| {
        let [arg] = args else {
            return None;
        };
        sin_of_pi_multiple(pi_multiple(arg)?)
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::Sin);
    Some(opt)
}

/// `cos(pi/3) = 1/2`, and other exact values
pub fn cos_exact(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "cos", |args| {
        let [arg] = args else {
            return None;
        };
        cos_of_pi_multiple(pi_multiple(arg)?)
    })?;

    step_collector.push(Step::Cos);
    Some(opt)
}

/// `tan(pi/4) = 1`, and the exact values of `cot`, `sec`, and `csc`
///
/// No value is produced where the function is undefined, such as `tan(pi/2)`.
pub fn tan_exact(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else {
        return None;
    };
    let [arg] = args.as_slice() else {
        return None;
    };
    let t = pi_multiple(arg)?;
    let sin = sin_of_pi_multiple(t.clone())?;
    let cos = cos_of_pi_multiple(t)?;
    let is_zero = |expr: &SymExpr| expr.as_integer().map_or(false, |n| n.is_zero());

    let (numerator, denominator) = match name.as_str() {
        "tan" => (sin, cos),
        "cot" => (cos, sin),
        "sec" => (SymExpr::integer(1), cos),
        "csc" => (SymExpr::integer(1), sin),
        _ => return None,
    };
    if is_zero(&denominator) {
        return None;
    }

    step_collector.push(Step::Tan);
    Some(make_fraction(numerator, denominator))
}

/// `sin(-x) = -sin(x)`
/// `cos(-x) = cos(x)`
/// `tan(-x) = -tan(x)`
pub fn parity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else {
        return None;
    };
    let [arg] = args.as_slice() else {
        return None;
    };
    let odd = match name.as_str() {
        "sin" | "tan" | "cot" | "csc" => true,
        "cos" | "sec" => false,
        _ => return None,
    };

    let (coeff, rest) = split_coefficient(arg);
    if coeff >= 0 {
        return None;
    }

    let positive = SymExpr::call(name.clone(), vec![SymExpr::rational(-coeff) * rest]);
    step_collector.push(Step::Parity);
    if odd {
        Some(-positive)
    } else {
        Some(positive)
    }
}

/// If the term is `c*sin(u)^2*R` (or the same with `cos`), returns `(c, u, R, is_sin)`.
fn squared_trig_term(term: &SymExpr) -> Option<(Rational, SymExpr, SymExpr, bool)> {
    let (coeff, rest) = split_coefficient(term);
    let mut factors = match rest {
        SymExpr::Mul(factors) => factors,
        other => vec![other],
    };

    let idx = factors.iter().position(|factor| match factor {
        SymExpr::Exp(base, exp) => exp.as_integer().map_or(false, |n| *n == 2)
            && (single_arg(base, "sin").is_some() || single_arg(base, "cos").is_some()),
        _ => false,
    })?;
    let SymExpr::Exp(base, _) = factors.swap_remove(idx) else {
        return None;
    };
    let (arg, is_sin) = match single_arg(&base, "sin") {
        Some(arg) => (arg.clone(), true),
        None => (single_arg(&base, "cos")?.clone(), false),
    };

    Some((coeff, arg, SymExpr::Mul(factors).downgrade(), is_sin))
}

/// `sin(x)^2 + cos(x)^2 = 1`
///
/// The identity also applies to terms with a common coefficient and common factors, such as
/// `3y*sin(x)^2 + 3y*cos(x)^2 = 3y`.
pub fn pythagorean(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let parsed = terms.iter().map(squared_trig_term).collect::<Vec<_>>();
        for (i, lhs) in parsed.iter().enumerate() {
            let Some((coeff, arg, rest, is_sin)) = lhs else {
                continue;
            };
            let found = parsed.iter().enumerate().skip(i + 1).find(|(_, rhs)| match rhs {
                Some((other_coeff, other_arg, other_rest, other_is_sin)) => {
                    other_is_sin != is_sin
                        && other_coeff == coeff
                        && other_arg == arg
                        && other_rest == rest
                },
                None => false,
            });

            if let Some((j, _)) = found {
                let mut new_terms = terms.iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != i && *idx != j)
                    .map(|(_, term)| term.clone())
                    .collect::<Vec<_>>();
                new_terms.push(SymExpr::rational(coeff.clone()) * rest.clone());
                return Some(SymExpr::Add(new_terms).downgrade());
            }
        }

        None
    })?;

    step_collector.push(Step::Pythagorean);
    Some(opt)
}

/// `tan(x) = sin(x)/cos(x)`
/// `cot(x) = cos(x)/sin(x)`
/// `sec(x) = 1/cos(x)`
/// `csc(x) = 1/sin(x)`
pub fn to_sin_cos(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else {
        return None;
    };
    let [arg] = args.as_slice() else {
        return None;
    };
    let one = || SymExpr::Primary(Primary::Integer(int(1)));
    let rewritten = match name.as_str() {
        "tan" => make_fraction(sin(arg.clone()), cos(arg.clone())),
        "cot" => make_fraction(cos(arg.clone()), sin(arg.clone())),
        "sec" => make_fraction(one(), cos(arg.clone())),
        "csc" => make_fraction(one(), sin(arg.clone())),
        _ => return None,
    };

    step_collector.push(Step::TrigToSinCos);
    Some(rewritten)
}

/// `sin(a+b) = sin(a)cos(b) + cos(a)sin(b)`
/// `cos(a+b) = cos(a)cos(b) - sin(a)sin(b)`
pub fn angle_sum(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else {
        return None;
    };
    let [SymExpr::Add(terms)] = args.as_slice() else {
        return None;
    };
    let (a, rest) = terms.split_first()?;
    let a = a.clone();
    let b = SymExpr::Add(rest.to_vec()).downgrade();

    let expanded = match name.as_str() {
        "sin" => sin(a.clone()) * cos(b.clone()) + cos(a) * sin(b),
        "cos" => cos(a.clone()) * cos(b.clone()) - sin(a) * sin(b),
        _ => return None,
    };

    step_collector.push(Step::AngleSum);
    Some(expanded)
}

/// `sin(nx) = sin((n-1)x)cos(x) + cos((n-1)x)sin(x)`
/// `cos(nx) = cos((n-1)x)cos(x) - sin((n-1)x)sin(x)`
pub fn multiple_angle(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else {
        return None;
    };
    let [arg] = args.as_slice() else {
        return None;
    };
    let (coeff, x) = split_coefficient(arg);
    if *coeff.denom() != 1 || x.is_integer() {
        return None;
    }
    let n = coeff.numer().to_u32().filter(|n| (2..=MAX_MULTIPLE).contains(n))?;
    let rest = SymExpr::integer(n - 1) * x.clone();

    let expanded = match name.as_str() {
        "sin" => sin(rest.clone()) * cos(x.clone()) + cos(rest) * sin(x),
        "cos" => cos(rest.clone()) * cos(x.clone()) - sin(rest) * sin(x),
        _ => return None,
    };

    step_collector.push(Step::MultipleAngle);
    Some(expanded)
}

/// Applies all trigonometric rules. The expansion rules are only applied if
/// [`SimplifyOptions::expand_trig`] is set.
pub fn all(
    expr: &SymExpr,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<SymExpr> {
    let always = sin_exact(expr, step_collector)
        .or_else(|| cos_exact(expr, step_collector))
        .or_else(|| tan_exact(expr, step_collector))
        .or_else(|| parity(expr, step_collector))
        .or_else(|| pythagorean(expr, step_collector));
    if always.is_some() || !options.expand_trig {
        return always;
    }

    to_sin_cos(expr, step_collector)
        .or_else(|| angle_sum(expr, step_collector))
        .or_else(|| multiple_angle(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn pi_times(n: i32, d: i32) -> SymExpr {
        make_fraction(SymExpr::integer(n), SymExpr::integer(d)) * SymExpr::constant(Constant::Pi)
    }

    #[test]
    fn multiples_of_pi() {
        assert_eq!(pi_multiple(&pi_times(3, 4)), Some(Rational::from((3, 4))));
        assert_eq!(pi_multiple(&SymExpr::constant(Constant::Pi)), Some(Rational::from(1)));
        assert_eq!(pi_multiple(&SymExpr::symbol("x")), None);
    }

    #[test]
    fn exact_sine() {
        let expr = sin(pi_times(1, 6));
        assert_eq!(sin_exact(&expr, &mut ()), Some(make_fraction(SymExpr::integer(1), SymExpr::integer(2))));
    }

    #[test]
    fn undefined_tangent() {
        let expr = SymExpr::call("tan", vec![pi_times(1, 2)]);
        assert_eq!(tan_exact(&expr, &mut ()), None);
    }

    #[test]
    fn cosine_is_even() {
        let x = SymExpr::symbol("x");
        let expr = cos(-x.clone());
        assert_eq!(parity(&expr, &mut ()), Some(cos(SymExpr::integer(1) * x)));
    }

    #[test]
    fn pythagorean_identity() {
        let x = SymExpr::symbol("x");
        let square = |f: SymExpr| SymExpr::Exp(Box::new(f), Box::new(SymExpr::integer(2)));
        let expr = SymExpr::Add(vec![square(sin(x.clone())), square(cos(x))]);
        assert_eq!(pythagorean(&expr, &mut ()), Some(SymExpr::integer(1) * SymExpr::integer(1)));
    }
}
