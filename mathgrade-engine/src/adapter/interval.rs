//! Intervals and unions of intervals, written as `[0,2)\cup[5,\infty)`.
//!
//! Parsed intervals are kept in a canonical form: empty pieces are removed, and the pieces whose
//! bounds are numbers are sorted and merged where they overlap or touch. Pieces with a symbolic
//! bound, such as `[0,k)`, cannot be ordered against the others; they follow the numeric pieces,
//! sorted by their written form. Two interval sets describe the same set of real numbers when
//! their canonical forms match piece by piece.

use crate::error::ParseFailure;
use mathgrade_compute::{
    numerical::{eval_real, ZERO_THRESHOLD},
    primitive::float,
    symbolic::{Constant, Primary, SymExpr},
};
use mathgrade_parser::{normalize::normalize, parser::fmt::Latex};
use rug::{float::Special, Float};
use std::{cmp::Ordering, fmt::{self, Formatter}};
use super::{parse_scalar, split_top_level};

/// Spellings of the empty set.
const EMPTY: &[&str] = &["\\emptyset", "\\{\\}", "{}", "\\{ \\}"];

/// One end of an interval.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// The bound as written.
    pub expr: SymExpr,

    /// The numeric value of the bound, possibly infinite. [`None`] if the bound contains free
    /// variables.
    value: Option<Float>,

    /// True if the bound belongs to the interval.
    pub closed: bool,
}

impl Endpoint {
    /// Parses a bound. A bound is a real number, a multiple of `\infty`, or an expression in free
    /// variables.
    fn parse(source: &str, closed: bool) -> Result<Self, ParseFailure> {
        let expr = parse_scalar(source)?;
        let not_real = || ParseFailure::new(format!(
            "interval bounds must be real numbers, found `{}`",
            source.trim(),
        ));

        let value = if is_infinite(&expr) {
            Some(infinite_value(&expr).ok_or_else(not_real)?)
        } else if expr.is_closed() {
            Some(eval_real(&expr).map_err(|_| not_real())?)
        } else {
            None
        };

        // an infinite end never belongs to the interval
        let closed = closed && value.as_ref().map_or(true, Float::is_finite);
        Ok(Self { expr, value, closed })
    }

    /// The numeric value of the bound, if it has one.
    pub fn value(&self) -> Option<&Float> {
        self.value.as_ref()
    }

    /// Returns true if the bound contains free variables.
    pub fn is_symbolic(&self) -> bool {
        self.value.is_none()
    }

    /// Compares the values of both bounds. Values closer than [`ZERO_THRESHOLD`] are equal.
    ///
    /// Returns [`None`] if either bound is symbolic.
    fn cmp_value(&self, other: &Self) -> Option<Ordering> {
        let (lhs, rhs) = (self.value.as_ref()?, other.value.as_ref()?);
        if lhs.is_infinite() || rhs.is_infinite() {
            return Some(lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal));
        }
        let difference = float(lhs - rhs);
        Some(if difference.clone().abs() < ZERO_THRESHOLD {
            Ordering::Equal
        } else if difference < 0 {
            Ordering::Less
        } else {
            Ordering::Greater
        })
    }

    /// Returns true if both bounds are the same. Symbolic bounds are compared with `same_expr`.
    fn same_bound<E>(
        &self,
        other: &Self,
        same_expr: &mut impl FnMut(&SymExpr, &SymExpr) -> Result<bool, E>,
    ) -> Result<bool, E> {
        if self.closed != other.closed {
            return Ok(false);
        }
        match (self.cmp_value(other), self.is_symbolic() && other.is_symbolic()) {
            (Some(ordering), _) => Ok(ordering == Ordering::Equal),
            (None, true) => same_expr(&self.expr, &other.expr),
            (None, false) => Ok(false),
        }
    }
}

/// Strict equality of the written bounds.
impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.closed == other.closed && self.expr == other.expr
    }
}

impl Eq for Endpoint {}

fn is_infinite(expr: &SymExpr) -> bool {
    expr.post_order_iter()
        .any(|expr| expr.as_constant() == Some(Constant::Infinity))
}

/// Maps a multiple of `\infty` to an infinite value of the same sign.
fn infinite_value(expr: &SymExpr) -> Option<Float> {
    let sign = eval_real(&expr.map_primaries(&mut |primary| match primary {
        Primary::Const(Constant::Infinity) => Some(SymExpr::integer(1)),
        _ => None,
    })).ok()?;
    match sign.cmp0()? {
        Ordering::Greater => Some(float(Special::Infinity)),
        Ordering::Less => Some(float(Special::NegInfinity)),
        Ordering::Equal => None,
    }
}

/// A single interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub lower: Endpoint,
    pub upper: Endpoint,
}

impl Interval {
    /// Parses an interval such as `[a,b)`, `]a,b[`, or `[a]`.
    ///
    /// `(` and `)` mark an open end, as do the reversed brackets `]a` and `b[`. A missing bracket
    /// marks a closed end.
    fn parse(source: &str) -> Result<Self, ParseFailure> {
        let source = source.trim();
        let (lower_closed, rest) = match source.chars().next() {
            Some('(' | ']') => (false, &source[1..]),
            Some('[') => (true, &source[1..]),
            _ => (true, source),
        };
        let (upper_closed, inner) = match rest.chars().last() {
            Some(')' | '[') => (false, &rest[..rest.len() - 1]),
            Some(']') => (true, &rest[..rest.len() - 1]),
            _ => (true, rest),
        };

        match split_top_level(inner, ",").as_slice() {
            [point] if lower_closed && upper_closed => {
                let endpoint = Endpoint::parse(point, true)?;
                Ok(Self { lower: endpoint.clone(), upper: endpoint })
            },
            [lower, upper] => Ok(Self {
                lower: Endpoint::parse(lower, lower_closed)?,
                upper: Endpoint::parse(upper, upper_closed)?,
            }),
            bounds => Err(ParseFailure::new(format!(
                "an interval needs two bounds separated by `,`, found {} in `{}`",
                bounds.len(),
                source,
            ))),
        }
    }

    /// Returns true if both bounds are numbers.
    fn is_numeric(&self) -> bool {
        !self.lower.is_symbolic() && !self.upper.is_symbolic()
    }

    /// Returns true if the interval is known to contain no numbers.
    pub fn is_empty(&self) -> bool {
        let degenerate = !(self.lower.closed && self.upper.closed);
        match self.lower.cmp_value(&self.upper) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => degenerate,
            Some(Ordering::Less) => false,
            None => degenerate && self.lower.expr == self.upper.expr,
        }
    }

    /// Compares the lower ends of two numeric intervals, a closed end coming before an open end
    /// at the same value.
    fn cmp_lower(&self, other: &Self) -> Ordering {
        self.lower.cmp_value(&other.lower)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.lower.closed.cmp(&self.lower.closed))
    }

    /// Returns true if `next`, which starts no earlier than `self`, overlaps or touches `self`.
    fn touches(&self, next: &Self) -> bool {
        match next.lower.cmp_value(&self.upper) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.upper.closed || next.lower.closed,
            Some(Ordering::Greater) | None => false,
        }
    }

    /// Extends the upper end of `self` to cover `next`.
    fn merge(&mut self, next: Interval) {
        match next.upper.cmp_value(&self.upper) {
            Some(Ordering::Greater) => self.upper = next.upper,
            Some(Ordering::Equal) => self.upper.closed |= next.upper.closed,
            Some(Ordering::Less) | None => {},
        }
    }

    fn same_interval<E>(
        &self,
        other: &Self,
        same_expr: &mut impl FnMut(&SymExpr, &SymExpr) -> Result<bool, E>,
    ) -> Result<bool, E> {
        Ok(self.lower.same_bound(&other.lower, same_expr)?
            && self.upper.same_bound(&other.upper, same_expr)?)
    }
}

/// A union of disjoint intervals, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSet {
    pieces: Vec<Interval>,
}

impl IntervalSet {
    /// Parses a union of intervals joined by `\cup`, or an empty set.
    pub fn parse(source: &str) -> Result<Self, ParseFailure> {
        let normalized = normalize(source);
        let source = normalized.trim();
        if EMPTY.contains(&source) {
            return Ok(Self { pieces: Vec::new() });
        }

        let pieces = source.split("\\cup")
            .map(Interval::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_pieces(pieces))
    }

    /// Builds the canonical union of the given intervals.
    pub fn from_pieces(pieces: Vec<Interval>) -> Self {
        let (mut numeric, mut symbolic): (Vec<_>, Vec<_>) = pieces.into_iter()
            .filter(|piece| !piece.is_empty())
            .partition(Interval::is_numeric);
        numeric.sort_by(Interval::cmp_lower);
        symbolic.sort_by_cached_key(Interval::to_string);

        let mut merged: Vec<Interval> = Vec::with_capacity(numeric.len() + symbolic.len());
        for piece in numeric {
            match merged.last_mut() {
                Some(last) if last.touches(&piece) => last.merge(piece),
                _ => merged.push(piece),
            }
        }
        merged.extend(symbolic);
        Self { pieces: merged }
    }

    /// The disjoint intervals, sorted.
    pub fn pieces(&self) -> &[Interval] {
        &self.pieces
    }

    /// Returns true if the set contains no numbers.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns true if both sets contain the same numbers.
    ///
    /// Numeric bounds are compared by value. Symbolic bounds are compared with `same_expr`,
    /// whose error, if any, is returned.
    pub fn same_set<E>(
        &self,
        other: &Self,
        mut same_expr: impl FnMut(&SymExpr, &SymExpr) -> Result<bool, E>,
    ) -> Result<bool, E> {
        if self.pieces.len() != other.pieces.len() {
            return Ok(false);
        }
        for (a, b) in self.pieces.iter().zip(&other.pieces) {
            if !a.same_interval(b, &mut same_expr)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Latex for Interval {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", if self.lower.closed { "\\left[" } else { "\\left(" })?;
        self.lower.expr.fmt_latex(f)?;
        write!(f, ", ")?;
        self.upper.expr.fmt_latex(f)?;
        write!(f, "{}", if self.upper.closed { "\\right]" } else { "\\right)" })
    }
}

impl Latex for IntervalSet {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        if self.pieces.is_empty() {
            return write!(f, "\\emptyset");
        }
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                write!(f, " \\cup ")?;
            }
            piece.fmt_latex(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower.closed { '[' } else { '(' },
            self.lower.expr,
            self.upper.expr,
            if self.upper.closed { ']' } else { ')' },
        )
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.pieces.is_empty() {
            return write!(f, "EmptySet");
        }
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                write!(f, " U ")?;
            }
            write!(f, "{}", piece)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> IntervalSet {
        IntervalSet::parse(source).unwrap()
    }

    /// Compares two interval sets, comparing symbolic bounds strictly.
    fn same(a: &str, b: &str) -> bool {
        parse(a).same_set(&parse(b), |a, b| Ok::<_, ()>(a == b)).unwrap()
    }

    #[test]
    fn brackets() {
        let set = parse("(0,2]");
        let piece = &set.pieces()[0];
        assert!(!piece.lower.closed);
        assert!(piece.upper.closed);

        assert!(same("]0,2[", "(0,2)"));
    }

    #[test]
    fn infinite_ends_are_open() {
        let set = parse(r"[-\infty,3]");
        let piece = &set.pieces()[0];
        assert!(!piece.lower.closed);
        assert!(piece.lower.value().map_or(false, |value| value.is_infinite()));
    }

    #[test]
    fn union_order_does_not_matter() {
        assert!(same(r"[0,2]\cup[5,\infty)", r"[5,\infty)\cup[0,2]"));
    }

    #[test]
    fn touching_pieces_merge() {
        assert!(same(r"[0,1)\cup[1,2]", "[0,2]"));
        assert!(!same(r"[0,1)\cup(1,2]", "[0,2]"));
        assert!(same(r"[0,3]\cup[1,2]", "[0,3]"));
    }

    #[test]
    fn single_point() {
        assert!(same("[4]", "[4,4]"));
        assert!(IntervalSet::parse("(4)").is_err());
    }

    #[test]
    fn sized_brackets() {
        assert!(same(r"\left[0,1\right)", "[0,1)"));
        assert!(parse(r"\varnothing").is_empty());
    }

    #[test]
    fn empty() {
        assert!(parse(r"\emptyset").is_empty());
        assert!(parse("(1,1)").is_empty());
        assert!(same("(2,1)", r"\emptyset"));
    }

    #[test]
    fn constant_bounds() {
        assert!(same(r"[0,\sqrt{4}]", "[0,2]"));
        assert!(same(r"[0,\pi)", r"[0,\pi)"));
    }

    #[test]
    fn symbolic_bounds() {
        let set = parse("[0,k)");
        let piece = &set.pieces()[0];
        assert!(piece.upper.is_symbolic());
        assert!(!piece.upper.closed);

        assert!(same("[a,b]", "[a,b]"));
        assert!(!same("[a,b]", "[a,b)"));
        assert!(!same("[0,k)", "[0,2)"));
        assert!(same(r"[0,k)\cup[5,6]", r"[5,6]\cup[0,k)"));
        assert!(parse("(a,a)").is_empty());
        assert!(!parse("[a,a]").is_empty());
    }

    #[test]
    fn symbolic_bounds_use_the_given_comparison() {
        let (a, b) = (parse("[0,2k)"), parse("[0,k+k)"));
        assert!(!a.same_set(&b, |a, b| Ok::<_, ()>(a == b)).unwrap());
        assert!(a.same_set(&b, |_, _| Ok::<_, ()>(true)).unwrap());
        assert_eq!(a.same_set(&b, |_, _| Err("failed")), Err("failed"));
    }

    #[test]
    fn malformed() {
        assert!(IntervalSet::parse("[1,2,3]").is_err());
        assert!(IntervalSet::parse("[i,2]").is_err());
    }

    #[test]
    fn latex() {
        assert_eq!(parse(r"[0,2)\cup(3,\infty)").as_display().to_string(), r"\left[0, 2\right) \cup \left(3, \infty\right)");
    }
}
