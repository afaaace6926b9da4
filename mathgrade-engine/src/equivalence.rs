//! Deciding whether two parsed answers are equal.
//!
//! [`is_equal`] dispatches on the domain of both values. Values of different domains are never
//! equal: a scalar is not equal to a relation even if both evaluate to the same number, and an
//! interval is not equal to a finite set.
//!
//! Within the scalar domain, the answers are first compared as written, then after
//! simplification, and finally by deciding whether their difference is zero. With a tolerance,
//! answers without free variables are instead compared numerically.

use crate::config::ComparisonConfig;
use crate::value::ParsedValue;
use mathgrade_compute::{
    numerical::eval,
    symbolic::{is_zero, simplify, Budget, Relation, Statement, SymExpr},
    EvalError,
};
use tracing::debug;

/// Number of decimal places the difference and the tolerance are rounded to before they are
/// compared.
const TOLERANCE_DECIMALS: i32 = 10;

/// Logs the rule that decided a comparison.
fn decided(rule: &'static str, equal: bool) -> bool {
    debug!(target: "mathgrade::equivalence", rule, equal);
    equal
}

fn round_decimals(value: f64) -> f64 {
    let scale = 10f64.powi(TOLERANCE_DECIMALS);
    (value * scale).round() / scale
}

/// Compares two answers of any domain.
///
/// Returns an error only if the simplification budget runs out.
pub fn is_equal(
    a: &ParsedValue,
    b: &ParsedValue,
    config: &ComparisonConfig,
    budget: &mut Budget,
) -> Result<bool, EvalError> {
    if config.is_perfect_match() {
        return Ok(decided("perfect_match", a == b));
    }

    match (a, b) {
        (ParsedValue::Scalar(a), ParsedValue::Scalar(b)) => scalars_equal(a, b, config, budget),
        (ParsedValue::Relation(a), ParsedValue::Relation(b)) => relations_equal(a, b, config, budget),
        (ParsedValue::Matrix(a), ParsedValue::Matrix(b)) => {
            let Some(pairs) = a.zip(b) else {
                return Ok(decided("matrix_shape", false));
            };
            for (a, b) in pairs {
                if !statements_equal(a, b, config, budget)? {
                    return Ok(decided("matrix_element", false));
                }
            }
            Ok(decided("matrix_element", true))
        },
        (ParsedValue::Interval(a), ParsedValue::Interval(b)) => {
            let equal = a.same_set(b, |a, b| scalars_equal(a, b, config, budget))?;
            Ok(decided("interval", equal))
        },
        (ParsedValue::Set(a), ParsedValue::Set(b)) => {
            let equal = a.same_set(b, &config.simplify_options(), budget)?;
            Ok(decided("set", equal))
        },
        _ => Ok(decided("domain_mismatch", false)),
    }
}

/// Compares two matrix elements.
fn statements_equal(
    a: &Statement,
    b: &Statement,
    config: &ComparisonConfig,
    budget: &mut Budget,
) -> Result<bool, EvalError> {
    match (a, b) {
        (Statement::Scalar(a), Statement::Scalar(b)) => scalars_equal(a, b, config, budget),
        (Statement::Relation(a), Statement::Relation(b)) => relations_equal(a, b, config, budget),
        _ => Ok(decided("domain_mismatch", false)),
    }
}

/// Compares two expressions.
pub fn scalars_equal(
    a: &SymExpr,
    b: &SymExpr,
    config: &ComparisonConfig,
    budget: &mut Budget,
) -> Result<bool, EvalError> {
    if a == b {
        return Ok(decided("structural", true));
    }

    let options = config.simplify_options();
    let a = simplify(a, &options, budget)?;
    let b = simplify(b, &options, budget)?;
    if a == b {
        return Ok(decided("simplified", true));
    }

    let difference = a - b;
    match config.tolerance {
        Some(tolerance) if difference.is_closed() => {
            let equal = match eval(&difference) {
                Ok(value) => {
                    let distance = value.abs().real().to_f64();
                    round_decimals(distance) <= round_decimals(tolerance)
                },
                Err(_) => false,
            };
            Ok(decided("tolerance", equal))
        },
        _ => Ok(decided("zero_difference", is_zero(&difference, &options, budget)?)),
    }
}

/// Compares two equations or inequalities.
pub fn relations_equal(
    a: &Relation,
    b: &Relation,
    config: &ComparisonConfig,
    budget: &mut Budget,
) -> Result<bool, EvalError> {
    if a == b {
        return Ok(decided("structural", true));
    }
    let equal = a.equivalent(b, &config.simplify_options(), budget)?;
    Ok(decided("relation", equal))
}

#[cfg(test)]
mod tests {
    use crate::config::ComparisonMode;
    use crate::value::ProblemKind;
    use pretty_assertions::assert_eq;
    use super::*;

    fn equal_with(kind: ProblemKind, a: &str, b: &str, config: &ComparisonConfig) -> bool {
        let a = kind.parse(a).unwrap();
        let b = kind.parse(b).unwrap();
        is_equal(&a, &b, config, &mut Budget::new(config.budget)).unwrap()
    }

    fn equal(a: &str, b: &str) -> bool {
        equal_with(ProblemKind::Math, a, b, &ComparisonConfig::default())
    }

    fn tolerance(tolerance: f64) -> ComparisonConfig {
        ComparisonConfig {
            tolerance: Some(tolerance),
            ..ComparisonConfig::default()
        }
    }

    #[test]
    fn algebraic_equivalence() {
        assert!(equal("2x+1", "x+x+1"));
        assert!(equal("(x+1)^2", "x^2+2x+1"));
        assert!(equal(r"\frac{x^2-1}{x-1}", "x+1"));
        assert!(!equal("2x+1", "2x-1"));
    }

    #[test]
    fn reserved_constants() {
        assert!(equal(r"e^{i\pi}", "-1"));
        assert!(equal(r"\sin(\pi)", "0"));
        assert!(!equal(r"\pi", "3.14"));
    }

    #[test]
    fn numeric_tolerance() {
        let config = tolerance(0.01);
        assert!(equal_with(ProblemKind::Math, "3.14", "3.1405", &config));
        assert!(!equal_with(ProblemKind::Math, "3.14", "3.20", &config));
        assert!(equal_with(ProblemKind::Math, r"\pi", "3.14", &config));
    }

    #[test]
    fn exact_without_tolerance() {
        assert!(!equal("1", "1+10^{-200}"));
        assert!(equal_with(ProblemKind::Math, "1", "1+10^{-200}", &tolerance(0.001)));
    }

    #[test]
    fn log_expansion_flags() {
        let use_log = ComparisonConfig {
            use_log: true,
            ..ComparisonConfig::default()
        };
        let forced = ComparisonConfig {
            use_log: true,
            allow_complex: true,
            ..ComparisonConfig::default()
        };
        let complex_only = ComparisonConfig {
            allow_complex: true,
            ..ComparisonConfig::default()
        };

        for (a, b) in [(r"\ln(2x)", r"\ln(2)+\ln(x)"), (r"\ln(x^2)", r"2\ln(x)")] {
            assert!(!equal(a, b), "{} = {} by default", a, b);
            assert!(!equal_with(ProblemKind::Math, a, b, &use_log), "{} = {} with use_log", a, b);
            assert!(!equal_with(ProblemKind::Math, a, b, &complex_only), "{} = {} with allow_complex", a, b);
            assert!(equal_with(ProblemKind::Math, a, b, &forced), "{} != {} when forced", a, b);
        }
    }

    #[test]
    fn tolerance_is_inclusive() {
        assert!(equal_with(ProblemKind::Math, "1", "1.5", &tolerance(0.5)));
    }

    #[test]
    fn tolerance_with_variables() {
        let config = tolerance(0.1);
        assert!(equal_with(ProblemKind::Math, "2x", "x+x", &config));
        assert!(!equal_with(ProblemKind::Math, "2x", "2.05x", &config));
    }

    #[test]
    fn perfect_match() {
        let config = ComparisonConfig {
            mode: ComparisonMode::PerfectMatch,
            ..ComparisonConfig::default()
        };
        assert!(equal_with(ProblemKind::Math, "x+1", "1+x", &config));
        assert!(!equal_with(ProblemKind::Math, "x+1", "x+2-1", &config));
        assert!(!equal_with(ProblemKind::Math, "5", "2+3", &config));
        assert!(!equal_with(ProblemKind::Math, "6", r"2\cdot3", &config));
        assert!(equal("5", "2+3"));
        assert!(equal("6", r"2\cdot3"));
    }

    #[test]
    fn symbolic_interval_bounds() {
        let interval = |a, b| equal_with(ProblemKind::Interval, a, b, &ComparisonConfig::default());
        assert!(interval("[0,2k)", "[0,k+k)"));
        assert!(interval(r"[a,b]\cup[5,6]", r"[5,6]\cup[a,b]"));
        assert!(!interval("[0,k)", "[0,k]"));
        assert!(!interval("[0,k)", "[0,2)"));
    }

    #[test]
    fn relations() {
        assert!(equal("y = 2x+1", "2x+1 = y"));
        assert!(equal("x < 3", "3 > x"));
        assert!(!equal(r"x \le 3", "x < 3"));
    }

    #[test]
    fn domains_do_not_mix() {
        assert!(!equal("x = 1", "1"));
        let interval = ProblemKind::Interval.parse("[1]").unwrap();
        let set = ProblemKind::Set.parse(r"\{1\}").unwrap();
        let config = ComparisonConfig::default();
        assert!(!is_equal(&interval, &set, &config, &mut Budget::new(config.budget)).unwrap());
    }

    #[test]
    fn matrices() {
        let config = ComparisonConfig::default();
        assert!(equal_with(ProblemKind::Matrix, "[1,2:3,4]", r"[\frac{2}{2},2:3,2+2]", &config));
        assert!(!equal_with(ProblemKind::Matrix, "[1,2:3,4]", "[1,2,3,4]", &config));
        assert!(!equal_with(ProblemKind::Matrix, "[1,2:3,4]", "[1,2:4,3]", &config));
    }

    #[test]
    fn trigonometric_expansion() {
        let config = ComparisonConfig {
            use_trigonometric: true,
            ..ComparisonConfig::default()
        };
        assert!(equal_with(ProblemKind::Math, r"\tan(x)", r"\frac{\sin(x)}{\cos(x)}", &config));
    }

    #[test]
    fn symmetric() {
        let pairs = [("2x+1", "x+x+1"), ("x", "y"), ("3.14", r"\pi"), (r"\sqrt{8}", r"2\sqrt{2}")];
        for (a, b) in pairs {
            assert_eq!(equal(a, b), equal(b, a), "{} vs {}", a, b);
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_decimals(0.30000000000000004), 0.3);
    }
}
