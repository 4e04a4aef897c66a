//! Equilibrium solver for tiered supply networks.
//!
//! This crate turns a validated network into a gradient mapping F: ℝⁿ → ℝⁿ
//! over the path-flow variables (marginal edge cost/loss/risk plus
//! demand-node penalty terms) and solves the associated box-constrained
//! variational inequality with three fixed-step projection methods:
//! Korpelevich extragradient, Popov extrapolation-from-the-past, and
//! projected reflection.

pub mod error;
pub mod flow;
pub mod mapping;
pub mod methods;
pub mod problem;
pub mod projection;
pub mod solve;
pub mod terms;

pub use error::{SolverError, SolverResult};
pub use mapping::GradientMapping;
pub use methods::{
    CancelToken, DEFAULT_MAX_ITER, IterParams, Method, POPOV_DEFAULT_MAX_ITER, SolveReport,
    korpelevich, popov, reflection,
};
pub use problem::EquilibriumProblem;
pub use projection::BoxConstraint;
pub use solve::{SolveOutput, SolveRequest, solve};
