//! Errors produced while converting, simplifying, or evaluating expressions.

use thiserror::Error;

/// An error that occurs when converting a parsed expression into a [`SymExpr`].
///
/// [`SymExpr`]: crate::symbolic::SymExpr
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A relation appeared inside another expression, such as `2(x = 1)`.
    #[error("a relation cannot appear inside another expression")]
    NestedRelation,

    /// A numeric literal could not be read.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

/// An error that occurs when simplifying or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Simplification did not finish within the step budget.
    #[error("simplification exceeded the budget of {limit} steps")]
    BudgetExceeded {
        /// The number of steps that were allowed.
        limit: usize,
    },

    /// The expression contains a free variable, so it has no numeric value.
    #[error("cannot evaluate the free variable `{0}`")]
    FreeSymbol(String),

    /// The expression calls a function with no numeric definition, such as `f(x)`.
    #[error("cannot evaluate the function `{0}`")]
    UnknownFunction(String),

    /// The value is undefined, such as `1/0`.
    #[error("the expression is undefined")]
    Undefined,
}
