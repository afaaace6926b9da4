//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](mathgrade_parser::parser::ast::Expr) type from `mathgrade_parser` is a recursive
//! `enum` that represents the AST of an answer. It's convenient for parsing, but not so much for
//! algebraic manipulation.
//!
//! This module defines a separate [`SymExpr`], which recursively flattens the AST into a list of
//! terms or factors, depending on the operation, normalizing the expression into a sum of
//! products. Subtraction becomes addition of a term multiplied by `-1`, and division becomes
//! multiplication by a factor raised to the power of `-1`.
//!
//! # Strict equality
//!
//! Deciding if two expressions are mathematically equal is hard, since there are infinitely many
//! ways to write the same value: `x^2 + 2x + 1` and `(x + 1)^2`, or `\cos 2x` and
//! `\cos^2 x - \sin^2 x`.
//!
//! We define a subset of semantic equality, called **strict equality**. Two expressions are
//! strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//! [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//! terms / factors, in any order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives, and it does not depend on any
//! simplification to work. Simplifying both sides first, then comparing them strictly, is the
//! basis of answer comparison.
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`SymExpr`] implement **strict equality**.

mod iter;
pub mod latex;

use crate::{
    error::ConvertError,
    primitive::{float_from_str, int, int_from_str},
};
use mathgrade_parser::parser::{
    ast::{Expr as AstExpr, Literal},
    token::op::{BinOpKind, Precedence, UnaryOpKind},
};
use iter::ExprIter;
use rug::{Float, Integer, Rational};
use std::{cmp::Ordering, ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub}};
use super::simplify::fraction::make_fraction;

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Constant {
    /// Euler's number, `e`.
    E,

    /// The ratio of a circle's circumference to its diameter, `\pi`.
    Pi,

    /// The imaginary unit, `i`.
    I,

    /// Positive infinity, `\infty`.
    Infinity,
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::E => write!(f, "e"),
            Self::Pi => write!(f, "pi"),
            Self::I => write!(f, "i"),
            Self::Infinity => write!(f, "infinity"),
        }
    }
}

/// Identifiers that always name a [`Constant`], and never a free variable.
pub const RESERVED: &[(&str, Constant)] = &[
    ("e", Constant::E),
    ("i", Constant::I),
    ("pi", Constant::Pi),
    ("infty", Constant::Infinity),
];

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A decimal number, such as `3.14` or `0.5`.
    Float(Float),

    /// A variable, such as `x` or `x_{1}`.
    Symbol(String),

    /// A named constant, such as `e` or `\pi`.
    Const(Constant),

    /// A function call, such as `sin(x)` or `f(x, y)`.
    Call(String, Vec<SymExpr>),
}

/// [`Eq`] is implemented manually to allow comparing [`Primary::Float`]s. This module never
/// produces non-normal [`Float`]s (such as `NaN`).
impl Eq for Primary {}

impl std::fmt::Display for Primary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Float(num) => write!(f, "{}", num.to_f64()),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Const(constant) => write!(f, "{}", constant),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Adds two [`Primary`]s together. If both are the **same numeric type**, the numbers are added
/// together. Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs + rhs))
            },
            (Primary::Float(lhs), Primary::Float(rhs)) => {
                SymExpr::Primary(Primary::Float(lhs + rhs))
            },
            (lhs, rhs) => SymExpr::Add(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// Multiplies two [`Primary`]s together. If both are the **same numeric type**, the numbers are
/// multiplied together. Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Mul`].
impl Mul<Primary> for Primary {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs * rhs))
            },
            (Primary::Float(lhs), Primary::Float(rhs)) => {
                SymExpr::Primary(Primary::Float(lhs * rhs))
            },
            (lhs, rhs) => SymExpr::Mul(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// This type should be distinguished from the [`mathgrade_parser::parser::ast::Expr`] type. The
/// main difference is that this type **flattens** out the tree structure. For example, the
/// expression `x + (y + z)` is represented as a single [`SymExpr::Add`] node with _three_
/// children, `x`, `y`, and `z`.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

/// Returns the children sorted by their printed form, so that printing does not depend on the
/// order in which terms or factors were collected. Numbers sort before everything else.
fn sorted(children: &[SymExpr]) -> Vec<&SymExpr> {
    let mut keyed = children.iter()
        .map(|child| (!child.is_number_literal(), child.to_string(), child))
        .collect::<Vec<_>>();
    keyed.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    keyed.into_iter().map(|(_, _, child)| child).collect()
}

impl std::fmt::Display for SymExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = sorted(terms).into_iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = sorted(factors).into_iter();
                if let Some(factor) = iter.next() {
                    if matches!(factor.cmp_precedence(self), Ordering::Less) {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                    for factor in iter {
                        if matches!(factor.cmp_precedence(self), Ordering::Less) {
                            write!(f, " * ({})", factor)?;
                        } else {
                            write!(f, " * {}", factor)?;
                        }
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                if matches!(base.cmp_precedence(self), Ordering::Less | Ordering::Equal) {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "^")?;
                if matches!(exp.cmp_precedence(self), Ordering::Less | Ordering::Equal) {
                    write!(f, "({})", exp)?;
                } else {
                    write!(f, "{}", exp)?;
                }
                Ok(())
            },
        }
    }
}

impl SymExpr {
    /// Creates an integer expression.
    pub fn integer<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// Creates a variable.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Creates a named constant.
    pub fn constant(constant: Constant) -> Self {
        Self::Primary(Primary::Const(constant))
    }

    /// Creates a function call.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Creates the exact expression for the given rational number.
    pub fn rational(rational: Rational) -> Self {
        let (numer, denom) = rational.into_numer_denom();
        if denom == 1 {
            Self::Primary(Primary::Integer(numer))
        } else {
            make_fraction(Self::Primary(Primary::Integer(numer)), Self::Primary(Primary::Integer(denom)))
        }
    }

    /// Returns the precedence of the expression.
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Primary(_) => None,
            Self::Add(_) => Some(BinOpKind::Add.precedence()),
            Self::Mul(_) => Some(BinOpKind::Mul.precedence()),
            Self::Exp(_, _) => Some(BinOpKind::Exp.precedence()),
        }
    }

    /// Compares the precedence of this expression with the given expression.
    ///
    /// This is used to determine if parentheses are needed around the given expression when
    /// printing.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        #[derive(PartialEq, Eq)]
        enum PrecedenceExt {
            Primary,
            Op(Precedence),
        }

        impl PartialOrd for PrecedenceExt {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for PrecedenceExt {
            fn cmp(&self, other: &Self) -> Ordering {
                match (self, other) {
                    (Self::Primary, Self::Primary) => Ordering::Equal,
                    (Self::Primary, Self::Op(_)) => Ordering::Greater,
                    (Self::Op(_), Self::Primary) => Ordering::Less,
                    (Self::Op(lhs), Self::Op(rhs)) => lhs.cmp(rhs),
                }
            }
        }

        let lhs = self.precedence().map(PrecedenceExt::Op).unwrap_or(PrecedenceExt::Primary);
        let rhs = other.precedence().map(PrecedenceExt::Op).unwrap_or(PrecedenceExt::Primary);
        lhs.cmp(&rhs)
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns the contained integer.
    pub fn into_integer(self) -> Option<Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// Returns true if the expression is a [`Primary::Integer`] raised to the power of -1.
    pub fn is_integer_recip(&self) -> bool {
        self.as_integer_recip().is_some()
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns a reference to
    /// the contained integer (the denominator of the fraction).
    pub fn as_integer_recip(&self) -> Option<&Integer> {
        if let Self::Exp(base, exp) = self {
            if exp.as_integer().map_or(false, |exp| *exp == -1) {
                return base.as_integer();
            }
        }

        None
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns the contained
    /// integer (the denominator of the fraction).
    pub fn into_integer_recip(self) -> Option<Integer> {
        if let Self::Exp(base, exp) = self {
            if exp.as_integer().map_or(false, |exp| *exp == -1) {
                return base.into_integer();
            }
        }

        None
    }

    /// Returns true if the expression is a [`Primary::Float`].
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Primary(Primary::Float(_)))
    }

    /// Returns true if the expression is a numeric literal, a [`Primary::Integer`] or a
    /// [`Primary::Float`].
    pub fn is_number_literal(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_) | Primary::Float(_)))
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Const`], returns the contained constant.
    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            Self::Primary(Primary::Const(constant)) => Some(*constant),
            _ => None,
        }
    }

    /// If the expression is a call to the function with the given name, returns its arguments.
    pub fn as_call(&self, name: &str) -> Option<&[SymExpr]> {
        match self {
            Self::Primary(Primary::Call(call_name, args)) if call_name == name => Some(args),
            _ => None,
        }
    }

    /// If the expression is an exact rational number, such as `3`, `1/4`, or `-2/3`, returns its
    /// value.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(Rational::from(int)),
            Self::Exp(..) => self.as_integer_recip()
                .filter(|denom| !denom.is_zero())
                .map(|denom| Rational::from((Integer::from(1), denom.clone()))),
            Self::Mul(factors) => factors.iter().try_fold(Rational::from(1), |acc, factor| {
                factor.as_rational().map(|value| acc * value)
            }),
            _ => None,
        }
    }

    /// Returns true if the expression contains no free variables and no unknown functions, so
    /// it can be evaluated to a number.
    pub fn is_closed(&self) -> bool {
        self.post_order_iter().all(|expr| match expr {
            Self::Primary(Primary::Symbol(_)) => false,
            Self::Primary(Primary::Call(name, _)) => !matches!(name.as_str(), "f" | "g" | "h"),
            _ => true,
        })
    }

    /// Returns true if the given variable appears anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(name))
    }

    /// Returns the names of the free variables in the expression, sorted and deduplicated.
    pub fn free_symbols(&self) -> Vec<&str> {
        let mut symbols = self.post_order_iter()
            .filter_map(|expr| expr.as_symbol())
            .collect::<Vec<_>>();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    /// Replaces every occurrence of the given variable with the given expression. No
    /// simplification is done.
    pub fn substitute(&self, name: &str, value: &SymExpr) -> SymExpr {
        self.map_primaries(&mut |primary| match primary {
            Primary::Symbol(sym) if sym == name => Some(value.clone()),
            _ => None,
        })
    }

    /// Replaces every reserved identifier, such as `e` or `pi`, with its [`Constant`].
    ///
    /// This is applied once, right after a parsed expression is converted.
    pub fn substitute_reserved(&self) -> SymExpr {
        self.map_primaries(&mut |primary| match primary {
            Primary::Symbol(sym) => RESERVED.iter()
                .find(|(name, _)| name == sym)
                .map(|(_, constant)| SymExpr::constant(*constant)),
            _ => None,
        })
    }

    /// Rebuilds the expression, replacing every [`Primary`] for which the given function returns
    /// a replacement. Function call arguments are visited as well.
    pub fn map_primaries(&self, f: &mut impl FnMut(&Primary) -> Option<SymExpr>) -> SymExpr {
        match self {
            Self::Primary(primary) => {
                if let Some(replacement) = f(primary) {
                    return replacement;
                }
                match primary {
                    Primary::Call(name, args) => Self::call(
                        name.clone(),
                        args.iter().map(|arg| arg.map_primaries(f)).collect(),
                    ),
                    primary => Self::Primary(primary.clone()),
                }
            },
            Self::Add(terms) => Self::Add(terms.iter().map(|term| term.map_primaries(f)).collect()),
            Self::Mul(factors) => Self::Mul(factors.iter().map(|factor| factor.map_primaries(f)).collect()),
            Self::Exp(base, exp) => Self::Exp(
                Box::new(base.map_primaries(f)),
                Box::new(exp.map_primaries(f)),
            ),
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or an [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::Primary(Primary::Integer(int(0)))
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::Primary(Primary::Integer(int(1)))
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns the `n`-th root of this expression, `self^(1/n)`. No simplification is done.
    pub fn root(self, n: SymExpr) -> Self {
        Self::Exp(
            Box::new(self),
            Box::new(make_fraction(Self::Primary(Primary::Integer(int(1))), n)),
        )
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the number of nodes in the expression tree.
    pub fn complexity(&self) -> usize {
        self.post_order_iter().count()
    }
}

/// Returns true if both lists contain strictly equal elements, in any order, counting
/// duplicates.
fn same_multiset(lhs: &[SymExpr], rhs: &[SymExpr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|item| {
        let found = rhs.iter()
            .enumerate()
            .find(|(idx, candidate)| !used[*idx] && *candidate == item)
            .map(|(idx, _)| idx);
        match found {
            Some(idx) => {
                used[idx] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                same_multiset(lhs, rhs)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

/// Splits a sum into its terms, or returns the expression unchanged.
fn as_terms(expr: SymExpr) -> Result<Vec<SymExpr>, SymExpr> {
    match expr {
        SymExpr::Add(terms) => Ok(terms),
        expr => Err(expr),
    }
}

/// Splits a product into its factors, or returns the expression unchanged.
fn as_factors(expr: SymExpr) -> Result<Vec<SymExpr>, SymExpr> {
    match expr {
        SymExpr::Mul(factors) => Ok(factors),
        expr => Err(expr),
    }
}

/// Joins two operands into one flat sum or product. Unlike the [`Add`] and [`Mul`] operators,
/// numbers are never combined, so the result keeps the written form of the input.
fn join(
    lhs: SymExpr,
    rhs: SymExpr,
    wrap: fn(Vec<SymExpr>) -> SymExpr,
    split: fn(SymExpr) -> Result<Vec<SymExpr>, SymExpr>,
) -> SymExpr {
    let mut children = Vec::new();
    for operand in [lhs, rhs] {
        match split(operand) {
            Ok(inner) => children.extend(inner),
            Err(operand) => children.push(operand),
        }
    }
    wrap(children)
}

impl TryFrom<&AstExpr> for SymExpr {
    type Error = ConvertError;

    fn try_from(expr: &AstExpr) -> Result<Self, Self::Error> {
        Ok(match expr {
            AstExpr::Literal(literal) => match literal {
                Literal::Integer(int) => Self::Primary(Primary::Integer(
                    int_from_str(&int.value).ok_or_else(|| ConvertError::InvalidNumber(int.value.clone()))?,
                )),
                Literal::Float(float) => Self::Primary(Primary::Float(
                    float_from_str(&float.value).ok_or_else(|| ConvertError::InvalidNumber(float.value.clone()))?,
                )),
                Literal::Symbol(sym) => Self::symbol(sym.name.clone()),
            },
            AstExpr::Paren(paren) => Self::try_from(paren.innermost())?,
            AstExpr::Call(call) => {
                let args = call.args.iter().map(Self::try_from).collect::<Result<Vec<_>, _>>()?;
                let mut iter = args.into_iter();
                match (call.name.as_str(), iter.next(), iter.next()) {
                    ("sqrt", Some(radicand), None) => radicand.root(Self::integer(2)),
                    ("sqrt", Some(radicand), Some(index)) => radicand.root(index),
                    ("exp", Some(arg), None) => Self::Exp(
                        Box::new(Self::constant(Constant::E)),
                        Box::new(arg),
                    ),
                    (name, first, second) => Self::call(
                        name,
                        first.into_iter().chain(second).chain(iter).collect(),
                    ),
                }
            },
            AstExpr::Unary(unary) => {
                let operand = Self::try_from(&*unary.operand)?;
                match unary.op.kind {
                    // treat this as -1 * operand
                    UnaryOpKind::Neg => operand.neg(),
                    UnaryOpKind::Pos => operand,
                    UnaryOpKind::Factorial => Self::call("factorial", vec![operand]),
                }
            },
            AstExpr::Binary(bin) => {
                let lhs = Self::try_from(&*bin.lhs)?;
                let rhs = Self::try_from(&*bin.rhs)?;
                match bin.op.kind {
                    BinOpKind::Exp => Self::Exp(Box::new(lhs), Box::new(rhs)),
                    BinOpKind::Mul => join(lhs, rhs, SymExpr::Mul, as_factors),
                    // treat this as lhs * rhs^-1
                    BinOpKind::Div => make_fraction(lhs, rhs),
                    BinOpKind::Add => join(lhs, rhs, SymExpr::Add, as_terms),
                    // treat this as lhs + -1 * rhs
                    BinOpKind::Sub => join(lhs, rhs.neg(), SymExpr::Add, as_terms),
                    BinOpKind::Eq
                        | BinOpKind::NotEq
                        | BinOpKind::Less
                        | BinOpKind::LessEq
                        | BinOpKind::Greater
                        | BinOpKind::GreaterEq => return Err(ConvertError::NestedRelation),
                }
            },
        })
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case both are combined in
/// one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) | (other, Self::Add(mut terms)) => {
                terms.push(other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Adds two [`SymExpr`]s together. The behavior is the same as [`Add`], except we can reuse the
/// allocated memory of `self` if possible.
impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs += rhs;
            },
            (Self::Primary(Primary::Float(lhs)), Self::Primary(Primary::Float(rhs))) => {
                *lhs += rhs;
            },
            (Self::Add(terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
            },
            (Self::Add(terms), other) => {
                terms.push(other);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::Add(Vec::new()));
                *lhs = owned + rhs;
            },
        }
    }
}

/// Subtracts two [`SymExpr`]s, adding `rhs` multiplied by `-1`. No simplification is done.
impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.neg()
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Mul`], in which case both are combined in
/// one list of factors (flattening).
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) | (other, Self::Mul(mut factors)) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs *= rhs;
            },
            (Self::Primary(Primary::Float(lhs)), Self::Primary(Primary::Float(rhs))) => {
                *lhs *= rhs;
            },
            (Self::Mul(factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
            },
            (Self::Mul(factors), other) => {
                factors.push(other);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::Mul(Vec::new()));
                *lhs = owned * rhs;
            },
        }
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a numeric [`Primary`], in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(int)) => Self::Primary(Primary::Integer(-int)),
            Self::Primary(Primary::Float(float)) => Self::Primary(Primary::Float(-float)),
            expr => Self::Primary(Primary::Integer(int(-1))) * expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use mathgrade_parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    /// Parse the given expression and return the [`SymExpr`] representation.
    fn parse(input: &str) -> SymExpr {
        let expr = parse_expr(input).unwrap();
        SymExpr::try_from(&expr).unwrap().substitute_reserved()
    }

    #[test]
    fn strict_equality() {
        let a = parse("2(x + (y - 5))");
        let b = parse("(y - 5 + x) * 2");
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_2() {
        // these are NOT strictly equal (but are semantically equal)
        let a = parse("2(x + (y - 5))");
        let b = parse("2x + 2y - 10");
        assert_ne!(a, b);
    }

    #[test]
    fn strict_equality_counts_duplicates() {
        assert_ne!(parse("x + x + y"), parse("x + y + y"));
    }

    #[test]
    fn simple_expr() {
        let expr = parse("x^2 + 5x + 6");
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::integer(6),
            SymExpr::Mul(vec![SymExpr::symbol("x"), SymExpr::integer(5)]),
            SymExpr::Exp(Box::new(SymExpr::symbol("x")), Box::new(SymExpr::integer(2))),
        ]));
    }

    #[test]
    fn factors_only() {
        let expr = parse(r"\frac{2x^2}{5}");
        assert_eq!(expr, SymExpr::Mul(vec![
            SymExpr::Exp(Box::new(SymExpr::symbol("x")), Box::new(SymExpr::integer(2))),
            SymExpr::integer(2),
            SymExpr::Exp(Box::new(SymExpr::integer(5)), Box::new(SymExpr::integer(-1))),
        ]));
    }

    #[test]
    fn numbers_keep_written_form() {
        assert_eq!(parse("2+3"), SymExpr::Add(vec![SymExpr::integer(2), SymExpr::integer(3)]));
        assert_eq!(parse("3-2"), SymExpr::Add(vec![SymExpr::integer(3), SymExpr::integer(-2)]));
        assert_eq!(parse(r"2\cdot 3"), SymExpr::Mul(vec![SymExpr::integer(2), SymExpr::integer(3)]));
        assert_ne!(parse("2+3"), parse("5"));
    }

    #[test]
    fn reserved_constants() {
        let expr = parse(r"e^{i\pi}");
        assert_eq!(expr, SymExpr::Exp(
            Box::new(SymExpr::constant(Constant::E)),
            Box::new(SymExpr::Mul(vec![
                SymExpr::constant(Constant::I),
                SymExpr::constant(Constant::Pi),
            ])),
        ));
        assert!(expr.is_closed());
    }

    #[test]
    fn roots_and_calls() {
        assert_eq!(parse(r"\sqrt{x}"), SymExpr::Exp(
            Box::new(SymExpr::symbol("x")),
            Box::new(make_fraction(SymExpr::integer(1), SymExpr::integer(2))),
        ));
        assert_eq!(parse(r"\log_{2}x"), SymExpr::call("log", vec![SymExpr::symbol("x"), SymExpr::integer(2)]));
        assert_eq!(parse("n!"), SymExpr::call("factorial", vec![SymExpr::symbol("n")]));
        assert!(!parse("f(2)").is_closed());
    }

    #[test]
    fn nested_relation() {
        let expr = mathgrade_parser::parse_expr("x = 1").unwrap();
        assert_eq!(SymExpr::try_from(&expr), Err(ConvertError::NestedRelation));
    }

    #[test]
    fn free_symbols() {
        assert_eq!(parse(r"x_{1} + y \sin(x_{1})").free_symbols(), vec!["x_{1}", "y"]);
    }

    #[test]
    fn fmt_expr() {
        assert_eq!(parse("x^2 + 5x + 6").to_string(), "6 + 5 * x + x^2");
        assert_eq!(parse("(a + b)^2").to_string(), "(a + b)^2");
        assert_eq!(parse("2(x+1)").to_string(), "2 * (1 + x)");
    }
}
