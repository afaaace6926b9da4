//! Functions to construct [`Integer`]s, [`Float`]s, and [`Complex`] numbers from various types.

use rug::{Assign, Complex, Float, Integer};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string of decimal digits.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Float`] from a decimal string, such as `3.14` or `.5`.
pub fn float_from_str(s: &str) -> Option<Float> {
    Float::parse(s).ok().map(|parsed| Float::with_val(PRECISION, parsed))
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(PRECISION, n)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_numbers() {
        assert_eq!(int_from_str("1072"), Some(int(1072)));
        assert_eq!(int_from_str("10x"), None);
        assert_eq!(float_from_str(".5"), Some(float(0.5)));
        assert_eq!(float_from_str("2.25").map(|f| f.to_f64()), Some(2.25));
    }
}
