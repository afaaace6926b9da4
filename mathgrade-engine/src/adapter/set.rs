//! Sets, written either explicitly as `\{1, 2\}\cup\{3\}` or implicitly as
//! `\{x | x \ge 0 \& x < 5 | \mathbb{Z}\}`.
//!
//! Explicit sets may combine braced lists with `\cup` and `\cap`. The input is split on `\cap`
//! first and each piece on `\cup`, so intersection binds more loosely than union in the markup.
//!
//! An implicit set has exactly three `|`-separated parts: the bound variable, the conditions on
//! it joined with `\&`, and the domain the variable ranges over.

use crate::error::ParseFailure;
use mathgrade_compute::{
    numerical::{eval_real, ZERO_THRESHOLD},
    symbolic::{is_zero, simplify, Budget, Relation, RelationKind, SimplifyOptions, SymExpr},
    EvalError,
};
use mathgrade_parser::{normalize::normalize, parser::fmt::Latex};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};
use super::{parse_scalar, parse_statement, split_top_level, strip_delimiters};

/// Name given to the bound variable of every condition set before comparison.
const BOUND_VARIABLE: &str = "__bound";

/// Largest number of candidates tried when enumerating a condition set.
const MAX_ENUMERATED: i64 = 1000;

/// Spellings of the empty set.
const EMPTY: &[&str] = &["\\emptyset", ""];

/// The format a set problem expects its answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetFormat {
    Explicit,
    Implicit,
}

impl SetFormat {
    /// An example answer in this format, shown when an answer fails to parse.
    pub fn hint(format: Option<Self>) -> &'static str {
        match format {
            Some(Self::Explicit) => "Explicit: {1,2,3}",
            Some(Self::Implicit) => "Implicit: {x|x<4|N}",
            None => "Explicit: {1,2,3}  Implicit: {x|x<4|N}",
        }
    }
}

/// The domain a condition set's variable ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberDomain {
    /// `N`, the integers from 1.
    Naturals,

    /// `Z+`, the integers from 0.
    Naturals0,

    /// `Z-`, the integers that are not natural numbers, up to and including 0.
    NonPositiveIntegers,

    /// `Z`
    Integers,

    /// `Q`
    Rationals,

    /// `R`
    Reals,
}

impl NumberDomain {
    /// Reads a domain token, such as `Z`, `Z+`, or `Z^{+}`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.chars()
            .filter(|c| !matches!(c, ' ' | '^' | '_' | '{' | '}'))
            .collect::<String>();
        Some(match token.as_str() {
            "N" => Self::Naturals,
            "Z+" => Self::Naturals0,
            "Z-" => Self::NonPositiveIntegers,
            "Z" => Self::Integers,
            "Q" => Self::Rationals,
            "R" => Self::Reals,
            _ => return None,
        })
    }

    /// Returns true if the domain only contains integers.
    pub fn is_discrete(self) -> bool {
        !matches!(self, Self::Rationals | Self::Reals)
    }

    fn lower_bound(self) -> Option<Integer> {
        match self {
            Self::Naturals => Some(Integer::from(1)),
            Self::Naturals0 => Some(Integer::from(0)),
            _ => None,
        }
    }

    fn upper_bound(self) -> Option<Integer> {
        match self {
            Self::NonPositiveIntegers => Some(Integer::from(0)),
            _ => None,
        }
    }

    fn latex(self) -> &'static str {
        match self {
            Self::Naturals => "\\mathbb{N}",
            Self::Naturals0 => "\\mathbb{Z}^+",
            Self::NonPositiveIntegers => "\\mathbb{Z}^-",
            Self::Integers => "\\mathbb{Z}",
            Self::Rationals => "\\mathbb{Q}",
            Self::Reals => "\\mathbb{R}",
        }
    }

    fn token(self) -> &'static str {
        match self {
            Self::Naturals => "N",
            Self::Naturals0 => "Z+",
            Self::NonPositiveIntegers => "Z-",
            Self::Integers => "Z",
            Self::Rationals => "Q",
            Self::Reals => "R",
        }
    }
}

/// A set given by a bound variable, conditions on it, and a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet {
    pub variable: String,
    pub conditions: Vec<Relation>,
    pub domain: NumberDomain,
}

impl ConditionSet {
    fn parse(segments: &[&str]) -> Result<Self, ParseFailure> {
        let [variable, conditions, domain] = segments else {
            return Err(ParseFailure::new(
                "For implicit set, please follow the format {variable|condition|domain}",
            ));
        };

        let variable = parse_scalar(variable)?
            .as_symbol()
            .map(str::to_string)
            .ok_or_else(|| ParseFailure::new(format!(
                "the bound variable of a set must be a single variable, found `{}`",
                variable.trim(),
            )))?;

        let conditions = split_top_level(conditions, "\\&")
            .into_iter()
            .map(|condition| {
                let condition = condition.trim();
                let condition = condition.strip_prefix('(')
                    .and_then(|inner| inner.strip_suffix(')'))
                    .unwrap_or(condition);
                parse_statement(condition)?
                    .as_relation()
                    .cloned()
                    .ok_or_else(|| ParseFailure::new(format!(
                        "a set condition must be an equation or inequality, found `{}`",
                        condition,
                    )))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let domain = NumberDomain::parse(domain).ok_or_else(|| ParseFailure::new(format!(
            "unknown domain `{}`, expected one of N, Z+, Z-, Z, Q, R",
            domain.trim(),
        )))?;

        Ok(Self { variable, conditions, domain })
    }

    /// The conditions with the bound variable renamed, normalized, and both sides simplified.
    fn canonical_conditions(
        &self,
        options: &SimplifyOptions,
        budget: &mut Budget,
    ) -> Result<Vec<Relation>, EvalError> {
        let bound = SymExpr::symbol(BOUND_VARIABLE);
        self.conditions.iter()
            .map(|condition| {
                let condition = condition.normalized();
                Ok(Relation {
                    kind: condition.kind,
                    lhs: simplify(&condition.lhs.substitute(&self.variable, &bound), options, budget)?,
                    rhs: simplify(&condition.rhs.substitute(&self.variable, &bound), options, budget)?,
                })
            })
            .collect()
    }

    /// Lists the elements of the set, if it is a bounded subset of the integers.
    fn enumerate(&self, conditions: &[Relation]) -> Option<Vec<SymExpr>> {
        if !self.domain.is_discrete() {
            return None;
        }

        let mut lower = self.domain.lower_bound();
        let mut upper = self.domain.upper_bound();
        for condition in conditions {
            let (var_lower, var_upper) = variable_bounds(condition);
            if let Some(bound) = var_lower {
                lower = Some(lower.map_or(bound.clone(), |current| current.max(bound)));
            }
            if let Some(bound) = var_upper {
                upper = Some(upper.map_or(bound.clone(), |current| current.min(bound)));
            }
        }

        let (lower, upper) = (lower?.to_i64()?, upper?.to_i64()?);
        if upper.checked_sub(lower)? >= MAX_ENUMERATED {
            return None;
        }

        Some((lower..=upper)
            .map(SymExpr::integer)
            .filter(|candidate| conditions.iter().all(|condition| satisfies(condition, candidate)))
            .collect())
    }
}

/// Returns the integer bounds a normalized condition places on the bound variable, if it has the
/// form `variable ~ constant` or `constant ~ variable`.
fn variable_bounds(condition: &Relation) -> (Option<Integer>, Option<Integer>) {
    let is_variable = |expr: &SymExpr| expr.as_symbol() == Some(BOUND_VARIABLE);
    let value = |expr: &SymExpr| {
        if !expr.is_closed() {
            return None;
        }
        eval_real(expr).ok().filter(|value| value.is_finite())
    };

    match condition.kind {
        RelationKind::Eq if is_variable(&condition.lhs) => {
            let bound = value(&condition.rhs).and_then(|value| value.to_integer());
            (bound.clone(), bound)
        },
        RelationKind::Eq if is_variable(&condition.rhs) => {
            let bound = value(&condition.lhs).and_then(|value| value.to_integer());
            (bound.clone(), bound)
        },
        RelationKind::Less | RelationKind::LessEq if is_variable(&condition.lhs) => {
            let upper = value(&condition.rhs).and_then(|value| {
                if condition.kind == RelationKind::Less {
                    value.ceil().to_integer().map(|n| n - 1u32)
                } else {
                    value.floor().to_integer()
                }
            });
            (None, upper)
        },
        RelationKind::Less | RelationKind::LessEq if is_variable(&condition.rhs) => {
            let lower = value(&condition.lhs).and_then(|value| {
                if condition.kind == RelationKind::Less {
                    value.floor().to_integer().map(|n| n + 1u32)
                } else {
                    value.ceil().to_integer()
                }
            });
            (lower, None)
        },
        _ => (None, None),
    }
}

/// Returns true if the condition holds with the bound variable set to the candidate.
fn satisfies(condition: &Relation, candidate: &SymExpr) -> bool {
    let difference = condition.difference().substitute(BOUND_VARIABLE, candidate);
    let Ok(value) = eval_real(&difference) else {
        return false;
    };
    let is_zero = value.clone().abs() < ZERO_THRESHOLD;
    match condition.kind {
        RelationKind::Eq => is_zero,
        RelationKind::NotEq => !is_zero,
        RelationKind::Less => !is_zero && value < 0,
        RelationKind::LessEq => is_zero || value < 0,
        RelationKind::Greater => !is_zero && value > 0,
        RelationKind::GreaterEq => is_zero || value > 0,
    }
}

/// A set, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetExpr {
    /// The intersection of unions of finite sets. `\{1\}\cup\{2\}\cap\{2\}` is
    /// `[[[1], [2]], [[2]]]`.
    Explicit(Vec<Vec<Vec<SymExpr>>>),

    /// A set given by conditions on a bound variable.
    Condition(ConditionSet),
}

/// A set after evaluating its unions and intersections.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    /// A finite set of simplified, distinct elements.
    Finite(Vec<SymExpr>),

    /// A condition set that could not be enumerated, with canonical conditions.
    Condition(Vec<Relation>, NumberDomain),
}

impl SetExpr {
    /// Parses an explicit or implicit set. Any `|` in the input makes it an implicit set.
    pub fn parse(source: &str) -> Result<Self, ParseFailure> {
        let normalized = normalize(source);
        if normalized.contains('|') {
            let inner = strip_delimiters(&normalized, &["\\{", "{"], &["\\}", "}"]);
            let segments = inner.split('|').collect::<Vec<_>>();
            return Ok(Self::Condition(ConditionSet::parse(&segments)?));
        }

        let groups = split_top_level(&normalized, "\\cap")
            .into_iter()
            .map(|union| {
                split_top_level(union, "\\cup")
                    .into_iter()
                    .map(parse_finite)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Explicit(groups))
    }

    /// Evaluates unions and intersections, and enumerates bounded condition sets over the
    /// integers.
    fn resolve(&self, options: &SimplifyOptions, budget: &mut Budget) -> Result<Resolved, EvalError> {
        match self {
            Self::Explicit(groups) => {
                let mut result: Option<Vec<SymExpr>> = None;
                for union in groups {
                    let mut elements = Vec::new();
                    for element in union.iter().flatten() {
                        let element = simplify(element, options, budget)?;
                        if !contains(&elements, &element, options, budget)? {
                            elements.push(element);
                        }
                    }

                    result = Some(match result {
                        None => elements,
                        Some(previous) => {
                            let mut kept = Vec::new();
                            for element in previous {
                                if contains(&elements, &element, options, budget)? {
                                    kept.push(element);
                                }
                            }
                            kept
                        },
                    });
                }
                Ok(Resolved::Finite(result.unwrap_or_default()))
            },
            Self::Condition(set) => {
                let conditions = set.canonical_conditions(options, budget)?;
                Ok(match set.enumerate(&conditions) {
                    Some(elements) => Resolved::Finite(elements),
                    None => Resolved::Condition(conditions, set.domain),
                })
            },
        }
    }

    /// Returns true if both sets have the same elements.
    ///
    /// A condition set equals a finite set only if it can be enumerated. Otherwise, two condition
    /// sets are equal if they range over the same domain and their conditions are pairwise
    /// equivalent.
    pub fn same_set(
        &self,
        other: &Self,
        options: &SimplifyOptions,
        budget: &mut Budget,
    ) -> Result<bool, EvalError> {
        if self == other {
            return Ok(true);
        }

        match (self.resolve(options, budget)?, other.resolve(options, budget)?) {
            (Resolved::Finite(a), Resolved::Finite(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for element in &a {
                    if !contains(&b, element, options, budget)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            },
            (Resolved::Condition(a, a_domain), Resolved::Condition(b, b_domain)) => {
                if a_domain != b_domain || a.len() != b.len() {
                    return Ok(false);
                }
                let mut used = vec![false; b.len()];
                for condition in &a {
                    let mut found = false;
                    for (idx, other) in b.iter().enumerate() {
                        if !used[idx] && condition.equivalent(other, options, budget)? {
                            used[idx] = true;
                            found = true;
                            break;
                        }
                    }
                    if !found {
                        return Ok(false);
                    }
                }
                Ok(true)
            },
            _ => Ok(false),
        }
    }
}

/// Parses one braced list of elements, or the empty set.
fn parse_finite(source: &str) -> Result<Vec<SymExpr>, ParseFailure> {
    let source = source.trim();
    if EMPTY.contains(&source) {
        return Ok(Vec::new());
    }

    let inner = strip_delimiters(source, &["\\{", "{"], &["\\}", "}"]);
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(inner, ",")
        .into_iter()
        .map(parse_scalar)
        .collect()
}

/// Returns true if an element of the list is equivalent to the given element.
fn contains(
    elements: &[SymExpr],
    element: &SymExpr,
    options: &SimplifyOptions,
    budget: &mut Budget,
) -> Result<bool, EvalError> {
    for other in elements {
        if other == element || is_zero(&(other.clone() - element.clone()), options, budget)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn fmt_list_latex(elements: &[SymExpr], f: &mut Formatter) -> fmt::Result {
    if elements.is_empty() {
        return write!(f, "\\emptyset");
    }
    write!(f, "\\left\\{{")?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        element.fmt_latex(f)?;
    }
    write!(f, "\\right\\}}")
}

impl Latex for SetExpr {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Explicit(groups) => {
                for (i, union) in groups.iter().enumerate() {
                    if i > 0 {
                        write!(f, " \\cap ")?;
                    }
                    for (j, list) in union.iter().enumerate() {
                        if j > 0 {
                            write!(f, " \\cup ")?;
                        }
                        fmt_list_latex(list, f)?;
                    }
                }
                Ok(())
            },
            Self::Condition(set) => {
                write!(f, "\\left\\{{{} \\mid ", set.variable)?;
                for (i, condition) in set.conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, " \\land ")?;
                    }
                    condition.fmt_latex(f)?;
                }
                write!(f, " \\mid {}\\right\\}}", set.domain.latex())
            },
        }
    }
}

impl fmt::Display for SetExpr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Explicit(groups) => {
                let groups = groups.iter()
                    .map(|union| {
                        union.iter()
                            .map(|list| {
                                let elements = list.iter()
                                    .map(ToString::to_string)
                                    .collect::<Vec<_>>();
                                format!("{{{}}}", elements.join(", "))
                            })
                            .collect::<Vec<_>>()
                            .join(" U ")
                    })
                    .collect::<Vec<_>>();
                write!(f, "{}", groups.join(" n "))
            },
            Self::Condition(set) => {
                let conditions = set.conditions.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                write!(f, "{{{} | {} | {}}}", set.variable, conditions.join(" & "), set.domain.token())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> SetExpr {
        SetExpr::parse(source).unwrap()
    }

    fn same(a: &str, b: &str) -> bool {
        parse(a)
            .same_set(&parse(b), &SimplifyOptions::default(), &mut Budget::new(20_000))
            .unwrap()
    }

    #[test]
    fn domains() {
        assert_eq!(NumberDomain::parse("N"), Some(NumberDomain::Naturals));
        assert_eq!(NumberDomain::parse("Z^{+}"), Some(NumberDomain::Naturals0));
        assert_eq!(NumberDomain::parse(" Z- "), Some(NumberDomain::NonPositiveIntegers));
        assert_eq!(NumberDomain::parse("C"), None);
    }

    #[test]
    fn explicit_order_and_duplicates() {
        assert!(same(r"\{1,2,3\}", r"\{3,2,1\}"));
        assert!(same(r"\{1,2,2\}", r"\{1,2\}"));
        assert!(same(r"\{\frac{1}{2}\}", r"\{0.5\}"));
        assert!(!same(r"\{1,2\}", r"\{1,2,3\}"));
    }

    #[test]
    fn unions_and_intersections() {
        assert!(same(r"\{1,2\}\cup\{3\}", r"\{1,2,3\}"));
        assert!(same(r"\{1,2,3\}\cap\{2,3,4\}", r"\{2,3\}"));
        assert!(same(r"\{1\}\cap\{2\}", r"\emptyset"));
    }

    #[test]
    fn empty_only_equals_empty() {
        assert!(same(r"\emptyset", r"\{\}"));
        assert!(!same(r"\emptyset", r"\{0\}"));
    }

    #[test]
    fn implicit_format() {
        let SetExpr::Condition(set) = parse(r"\left\{ x \mid x \geq 0 \land x < 5 \mid \mathbb{Z} \right\}") else {
            panic!("expected a condition set");
        };
        assert_eq!(set.variable, "x");
        assert_eq!(set.conditions.len(), 2);
        assert_eq!(set.domain, NumberDomain::Integers);

        assert!(SetExpr::parse(r"\{x | x > 0\}").is_err());
        assert!(SetExpr::parse(r"\{x | x + 1 | R\}").is_err());
    }

    #[test]
    fn parenthesized_conditions() {
        assert!(same(r"\{x | (x > 0) \& (x < 3) | N\}", r"\{1,2\}"));
    }

    #[test]
    fn bound_variable_is_renamed() {
        assert!(same(r"\{x | x > 2 | R\}", r"\{y | y > 2 | R\}"));
        assert!(same(r"\{x | 2x > 4 | R\}", r"\{t | t > 2 | R\}"));
        assert!(!same(r"\{x | x > 2 | R\}", r"\{x | x > 2 | Q\}"));
    }

    #[test]
    fn enumerated_condition_sets() {
        assert!(same(r"\{x | x < 4 | N\}", r"\{1,2,3\}"));
        assert!(same(r"\{x | x \ge -2 | Z-\}", r"\{-2,-1,0\}"));
        assert!(same(r"\{n | n \le 2 | Z+\}", r"\{x | x < 3 | Z+\}"));
        assert!(!same(r"\{x | x > 0 | Z\}", r"\{1,2,3\}"));
    }

    #[test]
    fn latex() {
        assert_eq!(parse(r"\{1,2\}\cup\{3\}").as_display().to_string(), r"\left\{1, 2\right\} \cup \left\{3\right\}");
        assert_eq!(parse(r"\{x|x<4|N\}").as_display().to_string(), r"\left\{x \mid x<4 \mid \mathbb{N}\right\}");
    }
}
