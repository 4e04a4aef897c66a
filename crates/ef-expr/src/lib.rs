//! ef-expr: symbolic expression engine for edge cost functions.
//!
//! Cost, loss and risk functions enter the system as strings in a single
//! flow variable. This crate turns them into something a solver can use:
//!
//! - `parse`      — string to AST
//! - `diff`       — structural differentiation with respect to one variable
//! - `simplify`   — constant folding and identity elimination
//! - `substitute` — capture-free variable replacement
//! - `compile`    — resolve variables to slot indices, yielding a `Program`
//!   evaluable over a flat `&[Real]` without allocation
//!
//! The stages are independent and composable; each is testable in isolation.

pub mod ast;
pub mod compile;
pub mod diff;
pub mod error;
pub mod parse;
pub mod simplify;

pub use ast::{BinOp, Expr, Func};
pub use compile::{Program, compile};
pub use diff::diff;
pub use error::{ExprError, ExprResult};
pub use parse::parse;
pub use simplify::simplify;
