//! Numeric constants at [`PRECISION`](super::primitive::PRECISION) bits, used when evaluating
//! expressions.

use once_cell::sync::Lazy;
use rug::{Complex, Float};
use super::primitive::{complex, float};

pub static ZERO: Lazy<Float> = Lazy::new(|| float(0));

pub static ONE: Lazy<Float> = Lazy::new(|| float(1));

pub static TEN: Lazy<Float> = Lazy::new(|| float(10));

/// The imaginary unit.
pub static I: Lazy<Complex> = Lazy::new(|| complex((0, 1)));

/// Euler's number.
pub static E: Lazy<Float> = Lazy::new(|| float(1).exp());

pub static PI: Lazy<Float> = Lazy::new(|| float(-1).acos());

/// Positive infinity, the value of an unbounded interval end.
pub static INFINITY: Lazy<Float> = Lazy::new(|| float(rug::float::Special::Infinity));
