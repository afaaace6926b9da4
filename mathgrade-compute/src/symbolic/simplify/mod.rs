//! Rewriting of expressions into a canonical form.
//!
//! [`simplify`] repeatedly applies the rules in [`rules`] until none of them apply. Children are
//! always simplified before their parent, so each rule only has to look at the root of the
//! expression it receives.
//!
//! Two answers that simplify to [strictly equal](crate::symbolic::expr) expressions are
//! equivalent. The converse does not hold: the rule set is not complete, and some equivalent
//! expressions keep different canonical forms.
//!
//! Every rule application is counted against a [`Budget`]. Once the budget is exhausted,
//! simplification stops with [`EvalError::BudgetExceeded`] instead of running forever on a
//! pathological input.

pub mod fraction;
pub mod rules;
pub mod step;

pub use super::expr::{Primary, SymExpr};

use crate::error::EvalError;
use step::Step;
use super::step_collector::StepCollector;
use tracing::{trace, warn};

/// Which optional rule families to apply.
///
/// The default options only apply rules that hold for every value of the free variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifyOptions {
    /// Expand `tan`, `cot`, `sec` and `csc` into `sin` and `cos`, and expand angle sums and
    /// multiple angles.
    pub expand_trig: bool,

    /// Expand logarithms of products and powers.
    pub expand_log: bool,

    /// Apply expansions even when the positivity of their arguments cannot be proven, such as
    /// `ln(xy) = ln(x) + ln(y)`.
    pub force: bool,
}

/// A limit on the amount of work a simplification may do.
///
/// A budget is shared by every simplification done while comparing one pair of answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    limit: usize,
    used: usize,
}

impl Budget {
    /// Creates a budget allowing the given number of steps.
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// The number of steps allowed.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The number of steps taken so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Returns true if no steps remain.
    pub fn exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Returns an error if more steps were taken than allowed.
    pub fn check(&self) -> Result<(), EvalError> {
        if self.used > self.limit {
            warn!(target: "mathgrade::simplify", limit = self.limit, "simplification budget exceeded");
            Err(EvalError::BudgetExceeded { limit: self.limit })
        } else {
            Ok(())
        }
    }

    /// Takes one step, returning an error if the budget is exceeded.
    pub fn charge(&mut self) -> Result<(), EvalError> {
        self.used = self.used.saturating_add(1);
        self.check()
    }
}

/// Every applied rule counts as one step.
impl StepCollector<Step> for Budget {
    fn push(&mut self, _: Step) {
        self.used = self.used.saturating_add(1);
    }
}

/// Counts steps against a [`Budget`], optionally recording them as well.
struct Collector<'a> {
    budget: &'a mut Budget,
    steps: Option<&'a mut Vec<Step>>,
}

impl StepCollector<Step> for Collector<'_> {
    fn push(&mut self, step: Step) {
        self.budget.push(step);
        if let Some(steps) = self.steps.as_mut() {
            steps.push(step);
        }
    }
}

/// Simplifies every child of the expression, including the arguments of function calls.
fn simplify_children(
    expr: &SymExpr,
    options: &SimplifyOptions,
    collector: &mut Collector<'_>,
) -> Result<SymExpr, EvalError> {
    let mut all = |exprs: &[SymExpr]| {
        exprs.iter()
            .map(|child| simplify_inner(child, options, collector))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(match expr {
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::call(name.clone(), all(args)?),
        SymExpr::Primary(primary) => SymExpr::Primary(primary.clone()),
        SymExpr::Add(terms) => SymExpr::Add(all(terms)?),
        SymExpr::Mul(factors) => SymExpr::Mul(all(factors)?),
        SymExpr::Exp(base, exp) => {
            let base = simplify_inner(base, options, collector)?;
            let exp = simplify_inner(exp, options, collector)?;
            SymExpr::Exp(Box::new(base), Box::new(exp))
        },
    })
}

fn simplify_inner(
    expr: &SymExpr,
    options: &SimplifyOptions,
    collector: &mut Collector<'_>,
) -> Result<SymExpr, EvalError> {
    collector.budget.charge()?;
    let mut current = simplify_children(expr, options, collector)?;
    while let Some(next) = rules::all(&current, options, collector) {
        collector.budget.check()?;
        current = simplify_children(&next, options, collector)?;
    }
    Ok(current)
}

/// Simplifies the expression by applying rules until none apply.
///
/// Returns [`EvalError::BudgetExceeded`] if the budget runs out first.
pub fn simplify(
    expr: &SymExpr,
    options: &SimplifyOptions,
    budget: &mut Budget,
) -> Result<SymExpr, EvalError> {
    let simplified = simplify_inner(expr, options, &mut Collector { budget: &mut *budget, steps: None })?;
    trace!(target: "mathgrade::simplify", %expr, %simplified, used = budget.used());
    Ok(simplified)
}

/// Simplifies the expression, recording the rules that were applied into `steps`.
pub fn simplify_with_steps(
    expr: &SymExpr,
    options: &SimplifyOptions,
    budget: &mut Budget,
    steps: &mut Vec<Step>,
) -> Result<SymExpr, EvalError> {
    simplify_inner(expr, options, &mut Collector { budget, steps: Some(steps) })
}

#[cfg(test)]
mod tests {
    use mathgrade_parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        let expr = parse_expr(input).unwrap();
        SymExpr::try_from(&expr).unwrap().substitute_reserved()
    }

    fn simplified(input: &str) -> SymExpr {
        simplify(&parse(input), &SimplifyOptions::default(), &mut Budget::new(20_000)).unwrap()
    }

    #[test]
    fn combine_terms() {
        assert_eq!(simplified("x + x + 1"), SymExpr::Add(vec![
            SymExpr::Mul(vec![SymExpr::integer(2), SymExpr::symbol("x")]),
            SymExpr::integer(1),
        ]));
    }

    #[test]
    fn numbers_fold() {
        assert_eq!(simplified("2 + 3 * 4"), SymExpr::integer(14));
        assert_eq!(simplified(r"\frac{6}{4}"), simplified(r"\frac{3}{2}"));
        assert_eq!(simplified("0.5"), simplified(r"\frac{1}{2}"));
    }

    #[test]
    fn expand_square() {
        assert_eq!(simplified("(x+1)^2"), simplified("x^2 + 2x + 1"));
    }

    #[test]
    fn distribute() {
        assert_eq!(simplified("2(x + y) - 2y"), simplified("2x"));
    }

    #[test]
    fn roots() {
        assert_eq!(simplified(r"\sqrt{8}"), simplified(r"2\sqrt{2}"));
        assert_eq!(simplified(r"\sqrt{4}"), SymExpr::integer(2));
    }

    #[test]
    fn exact_trig() {
        assert_eq!(simplified(r"\sin(\pi/6)"), simplified(r"\frac{1}{2}"));
        assert_eq!(simplified(r"\cos(\pi)"), SymExpr::integer(-1));
    }

    #[test]
    fn collects_steps() {
        let mut steps = Vec::new();
        let result = simplify_with_steps(
            &parse("x + 0"),
            &SimplifyOptions::default(),
            &mut Budget::new(100),
            &mut steps,
        ).unwrap();
        assert_eq!(result, SymExpr::symbol("x"));
        assert_eq!(steps, vec![Step::AddZero]);
    }

    #[test]
    fn budget_exhaustion() {
        let result = simplify(&parse("(x+1)^6 - (x-1)^6"), &SimplifyOptions::default(), &mut Budget::new(5));
        assert_eq!(result, Err(EvalError::BudgetExceeded { limit: 5 }));
    }

    #[test]
    fn nested_powers_stay_bounded() {
        let expr = parse("(((10^{256})^{256})^{256})^{256}");
        match simplify(&expr, &SimplifyOptions::default(), &mut Budget::new(20_000)) {
            Ok(simplified) => assert!(!simplified.is_integer(), "evaluated to {}", simplified),
            Err(err) => assert!(matches!(err, EvalError::BudgetExceeded { .. })),
        }
    }
}
