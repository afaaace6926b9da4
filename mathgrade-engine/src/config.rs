//! Flags that control how answers are compared.

use mathgrade_compute::symbolic::SimplifyOptions;
use serde::{Deserialize, Serialize};

/// Default number of simplification steps allowed per grading call.
pub const DEFAULT_BUDGET: usize = 20_000;

/// How two answers are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Answers are simplified and compared for equivalence.
    #[default]
    Symbolic,

    /// Answers must be written identically, up to the order of terms and factors.
    PerfectMatch,
}

/// The comparison flags of a problem. Immutable once the problem is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Maximum absolute difference between two numeric answers.
    pub tolerance: Option<f64>,

    pub mode: ComparisonMode,

    /// Expand logarithms of products and powers before comparing.
    pub use_log: bool,

    /// Rewrite trigonometric functions in terms of `sin` and `cos` and expand angle sums
    /// before comparing.
    pub use_trigonometric: bool,

    /// Apply expansions that only hold for positive arguments even when positivity is unknown.
    pub allow_complex: bool,

    /// Number of simplification steps allowed per grading call.
    pub budget: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            tolerance: None,
            mode: ComparisonMode::Symbolic,
            use_log: false,
            use_trigonometric: false,
            allow_complex: false,
            budget: DEFAULT_BUDGET,
        }
    }
}

impl ComparisonConfig {
    /// The simplifier options implied by the flags.
    pub fn simplify_options(&self) -> SimplifyOptions {
        SimplifyOptions {
            expand_trig: self.use_trigonometric,
            expand_log: self.use_log,
            force: self.use_log && self.allow_complex,
        }
    }

    /// Returns true if answers must match structurally.
    pub fn is_perfect_match(&self) -> bool {
        self.mode == ComparisonMode::PerfectMatch
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn forced_expansion_needs_both_flags() {
        let options = |use_log, allow_complex| ComparisonConfig {
            use_log,
            allow_complex,
            ..ComparisonConfig::default()
        }.simplify_options();

        assert_eq!((options(false, false).expand_log, options(false, false).force), (false, false));
        assert_eq!((options(true, false).expand_log, options(true, false).force), (true, false));
        assert_eq!((options(false, true).expand_log, options(false, true).force), (false, false));
        assert_eq!((options(true, true).expand_log, options(true, true).force), (true, true));
    }
}
