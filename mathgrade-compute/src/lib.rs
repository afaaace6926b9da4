//! Symbolic algebra and numeric evaluation for graded math answers.
//!
//! Parsed answers from [`mathgrade_parser`] are converted into [`SymExpr`](symbolic::SymExpr)s,
//! simplified into a canonical form, and compared. Expressions without free variables can also
//! be evaluated numerically with [`numerical::eval`].

pub mod approx;
pub mod consts;
pub mod error;
pub mod numerical;
pub mod primitive;
pub mod symbolic;

pub use error::{ConvertError, EvalError};
