//! Numeric evaluation of symbolic expressions.
//!
//! Every value is computed as a [`Complex`] number at [`PRECISION`](crate::primitive::PRECISION)
//! bits. An expression can only be evaluated if it is
//! [closed](crate::symbolic::SymExpr::is_closed); free variables and unknown functions are
//! reported as errors.

pub mod func;

use crate::consts::{E, INFINITY, PI};
use crate::error::EvalError;
use crate::primitive::complex;
use crate::symbolic::expr::{Constant, Primary, SymExpr};
use rug::{ops::Pow, Complex, Float};

/// Values smaller than this in magnitude are considered zero.
pub const ZERO_THRESHOLD: f64 = 1e-100;

fn eval_primary(primary: &Primary) -> Result<Complex, EvalError> {
    Ok(match primary {
        Primary::Integer(n) => complex(n),
        Primary::Float(n) => complex(n),
        Primary::Symbol(name) => return Err(EvalError::FreeSymbol(name.clone())),
        Primary::Const(Constant::E) => complex(&*E),
        Primary::Const(Constant::Pi) => complex(&*PI),
        Primary::Const(Constant::I) => complex((0, 1)),
        Primary::Const(Constant::Infinity) => complex(&*INFINITY),
        Primary::Call(name, args) => {
            let args = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            let mut iter = args.into_iter();
            match (name.as_str(), iter.next(), iter.next()) {
                ("factorial", Some(arg), None) => func::factorial(arg)?,
                ("log", Some(arg), Some(base)) => func::log_base(arg, base),
                (name, Some(arg), None) => func::eval_unary(name, arg)
                    .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?,
                (name, _, _) => return Err(EvalError::UnknownFunction(name.to_string())),
            }
        },
    })
}

/// Evaluates the expression to a complex number.
///
/// Returns [`EvalError::Undefined`] if the result is not a number, such as `0/0`.
pub fn eval(expr: &SymExpr) -> Result<Complex, EvalError> {
    let value = match expr {
        SymExpr::Primary(primary) => eval_primary(primary)?,
        SymExpr::Add(terms) => terms.iter().try_fold(complex(0), |acc, term| {
            eval(term).map(|value| acc + value)
        })?,
        SymExpr::Mul(factors) => factors.iter().try_fold(complex(1), |acc, factor| {
            eval(factor).map(|value| acc * value)
        })?,
        SymExpr::Exp(base, exp) => {
            let base = eval(base)?;
            let exp = eval(exp)?;
            if base.is_zero() && exp.real().is_sign_negative() {
                return Err(EvalError::Undefined);
            }
            base.pow(&exp)
        },
    };

    if value.real().is_nan() || value.imag().is_nan() {
        return Err(EvalError::Undefined);
    }
    Ok(value)
}

/// Evaluates the expression, requiring the result to be a real number (an imaginary part of
/// magnitude below [`ZERO_THRESHOLD`] is ignored).
pub fn eval_real(expr: &SymExpr) -> Result<Float, EvalError> {
    let value = eval(expr)?;
    if value.imag().clone().abs() >= ZERO_THRESHOLD {
        return Err(EvalError::Undefined);
    }
    let (real, _) = value.into_real_imag();
    Ok(real)
}

/// Returns true if the value is zero within [`ZERO_THRESHOLD`].
pub fn is_negligible(value: &Complex) -> bool {
    let magnitude = value.clone().abs();
    magnitude.real().is_finite() && *magnitude.real() < ZERO_THRESHOLD
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn constants() {
        let expr = SymExpr::Mul(vec![SymExpr::integer(2), SymExpr::constant(Constant::Pi)]);
        assert_float_absolute_eq!(eval_real(&expr).unwrap().to_f64(), std::f64::consts::TAU);
    }

    #[test]
    fn euler_identity() {
        // e^(i*pi) + 1 = 0
        let expr = SymExpr::Add(vec![
            SymExpr::Exp(
                Box::new(SymExpr::constant(Constant::E)),
                Box::new(SymExpr::Mul(vec![
                    SymExpr::constant(Constant::I),
                    SymExpr::constant(Constant::Pi),
                ])),
            ),
            SymExpr::integer(1),
        ]);
        assert!(is_negligible(&eval(&expr).unwrap()));
    }

    #[test]
    fn free_symbol() {
        let expr = SymExpr::Add(vec![SymExpr::symbol("x"), SymExpr::integer(1)]);
        assert_eq!(eval(&expr), Err(EvalError::FreeSymbol("x".to_string())));
    }

    #[test]
    fn unknown_function() {
        let expr = SymExpr::call("f", vec![SymExpr::integer(1)]);
        assert_eq!(eval(&expr), Err(EvalError::UnknownFunction("f".to_string())));
    }

    #[test]
    fn division_by_zero() {
        let expr = SymExpr::Exp(Box::new(SymExpr::integer(0)), Box::new(SymExpr::integer(-1)));
        assert_eq!(eval(&expr), Err(EvalError::Undefined));
    }
}
