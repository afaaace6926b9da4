//! Numeric definitions of the functions that can appear in an answer.

use rug::Complex;
use crate::error::EvalError;
use crate::primitive::{complex, float};

/// Builds the table of functions that take a single argument.
macro_rules! unary_functions {
    ($($name:literal => $func:expr),* $(,)?) => {
        /// Evaluates the single-argument function with the given name.
        ///
        /// Returns [`None`] if no such function exists.
        pub fn eval_unary(name: &str, arg: Complex) -> Option<Complex> {
            match name {
                $(
                    // NOTE: the closure call is contained within the macro
                    #[allow(clippy::redundant_closure_call)]
                    $name => Some(($func)(arg)),
                )*
                _ => None,
            }
        }
    };
}

unary_functions! {
    "sin" => Complex::sin,
    "cos" => Complex::cos,
    "tan" => Complex::tan,
    "cot" => |n: Complex| n.tan().recip(), // cot, sec and csc have no `Complex` implementation
    "sec" => |n: Complex| n.cos().recip(),
    "csc" => |n: Complex| n.sin().recip(),
    "arcsin" => Complex::asin,
    "arccos" => Complex::acos,
    "arctan" => Complex::atan,
    "sinh" => Complex::sinh,
    "cosh" => Complex::cosh,
    "tanh" => Complex::tanh,
    "exp" => Complex::exp,
    "ln" => Complex::ln,
    "log" => |n: Complex| n.log10(),
    "abs" => Complex::abs,
}

/// Evaluates `n!` as `gamma(n + 1)`. The argument must be real.
pub fn factorial(arg: Complex) -> Result<Complex, EvalError> {
    if !arg.imag().is_zero() {
        return Err(EvalError::Undefined);
    }
    let n = float(arg.real() + 1u32);
    Ok(complex(n.gamma()))
}

/// Evaluates the logarithm of `arg` to the given base.
pub fn log_base(arg: Complex, base: Complex) -> Complex {
    let numerator = arg.ln();
    let denominator = base.ln();
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use super::*;

    #[test]
    fn trig_table() {
        let value = eval_unary("sec", complex(0)).unwrap();
        assert_float_absolute_eq!(value.real().to_f64(), 1.0);
        assert!(eval_unary("f", complex(0)).is_none());
    }

    #[test]
    fn gamma_factorial() {
        let value = factorial(complex(5)).unwrap();
        assert_float_absolute_eq!(value.real().to_f64(), 120.0, 1e-9);
        assert_eq!(factorial(complex((1, 1))), Err(EvalError::Undefined));
    }
}
