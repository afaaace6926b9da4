//! Algebraic manipulation of answers.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`SymExpr`] nodes. It's
//! similar to the [`Expr`](mathgrade_parser::parser::ast::Expr) nodes produced by
//! [`mathgrade_parser`], with the main difference being that [`SymExpr`] nodes **flatten** out
//! the tree structure.
//!
//! For example, the expression `x + (y + z)` would be represented internally as a single
//! [`SymExpr::Add`] node with _three_ children, `x`, `y`, and `z`, where as the parsed node
//! would have two children, `x` and `(y + z)`.
//!
//! This is done to make it easier to perform algebraic manipulations on the expression. A common
//! step in simplifying an expression is to combine "like terms", that is, to combine terms that
//! share the same factors (e.g. `x + x = 2x`). This is much easier to do when the terms in
//! question are all at the same level in the tree.
//!
//! A parsed answer is converted with [`TryFrom`]. Answers that contain a relational operator
//! become a [`Relation`] instead; see [`Statement`].
//!
//! ```
//! use mathgrade_compute::symbolic::{Statement, SymExpr};
//! use mathgrade_parser::parse_expr;
//!
//! let ast_expr = parse_expr("x + (y + z)").unwrap();
//! let statement = Statement::try_from(&ast_expr).unwrap();
//! assert_eq!(statement, Statement::Scalar(SymExpr::Add(vec![
//!     SymExpr::symbol("x"),
//!     SymExpr::symbol("y"),
//!     SymExpr::symbol("z"),
//! ])));
//! ```
//!
//! # Simplification
//!
//! Two answers are compared by reducing both to a canonical form with [`simplify()`], then
//! checking the results for strict equality. Simplification applies the rules in
//! [`simplify::rules`] until none apply, counting every application against a [`Budget`].
//!
//! ```
//! use mathgrade_compute::symbolic::{simplify, Budget, SimplifyOptions, Statement};
//! use mathgrade_parser::parse_expr;
//!
//! let parse = |source| match Statement::try_from(&parse_expr(source).unwrap()).unwrap() {
//!     Statement::Scalar(expr) => expr,
//!     Statement::Relation(_) => unreachable!(),
//! };
//! let options = SimplifyOptions::default();
//! let mut budget = Budget::new(1000);
//!
//! let lhs = simplify(&parse("x + x + x"), &options, &mut budget).unwrap();
//! let rhs = simplify(&parse("3x"), &options, &mut budget).unwrap();
//! assert_eq!(lhs, rhs);
//! ```
//!
//! When simplification is not enough, [`is_zero`] also clears symbolic denominators and falls
//! back to numeric evaluation.

pub mod expr;
pub mod relation;
pub mod simplify;
pub mod step_collector;
pub mod zero;

pub use expr::{Constant, Primary, SymExpr};
pub use relation::{Relation, RelationKind, Statement};
pub use simplify::{simplify, simplify_with_steps, Budget, SimplifyOptions};
pub use step_collector::StepCollector;
pub use zero::is_zero;
