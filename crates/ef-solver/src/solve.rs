//! High-level solve dispatch.

use std::collections::BTreeMap;

use ef_core::Real;
use nalgebra::DVector;
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::methods::{CancelToken, IterParams, Method, SolveReport, korpelevich, popov, reflection};
use crate::problem::EquilibriumProblem;
use crate::projection::BoxConstraint;

/// A solve request: method plus the shared iteration inputs.
#[derive(Debug, Clone)]
pub struct SolveRequest {
    pub method: Method,
    /// Lower box bound C_min.
    pub c_min: Real,
    /// Upper box bound C_max.
    pub c_max: Real,
    /// Scalar seed; the starting vector is this value in every component.
    pub initial_x: Real,
    /// Fixed step size λ.
    pub step: Real,
    /// Convergence tolerance ε.
    pub epsilon: Real,
    /// Iteration cap; None uses each method's default.
    pub max_iter: Option<usize>,
}

impl SolveRequest {
    pub fn validate(&self) -> SolverResult<()> {
        let bad = |what: String| Err(SolverError::Request { what });
        if !self.step.is_finite() || self.step <= 0.0 {
            return bad(format!("step size must be positive, got {}", self.step));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return bad(format!("tolerance must be positive, got {}", self.epsilon));
        }
        if !self.initial_x.is_finite() {
            return bad(format!("initial value must be finite, got {}", self.initial_x));
        }
        if self.max_iter == Some(0) {
            return bad("iteration cap must be at least 1".to_string());
        }
        // Box bounds are checked by BoxConstraint::new.
        Ok(())
    }

    fn iter_params(&self, method: Method) -> IterParams {
        IterParams {
            step: self.step,
            epsilon: self.epsilon,
            max_iter: self.max_iter.unwrap_or_else(|| method.default_max_iter()),
        }
    }
}

/// Result of a solve: one report, or one per method for "all".
#[derive(Debug)]
pub enum SolveOutput {
    Single(SolveReport),
    /// Keyed by method name; deterministic iteration order.
    All(BTreeMap<String, SolveReport>),
}

impl SolveOutput {
    /// The single report, if this was a single-method solve.
    pub fn as_single(&self) -> Option<&SolveReport> {
        match self {
            SolveOutput::Single(report) => Some(report),
            SolveOutput::All(_) => None,
        }
    }
}

/// Dispatch a request against a constructed problem.
///
/// "all" runs the three methods as a rayon fan-out over the shared read-only
/// mapping; they touch no common mutable state, and the joined map is keyed
/// by method name.
pub fn solve(
    problem: &EquilibriumProblem,
    request: &SolveRequest,
    cancel: Option<&CancelToken>,
) -> SolverResult<SolveOutput> {
    request.validate()?;
    let constraint = BoxConstraint::new(request.c_min, request.c_max)?;
    let n = problem.n_paths();
    let x0 = DVector::from_element(n, request.initial_x);
    let f = |x: &DVector<Real>| problem.mapping().eval(x);

    debug!(method = %request.method, n, "solve dispatched");

    let run = |method: Method| -> SolveReport {
        let params = request.iter_params(method);
        match method {
            Method::Korpelevich => korpelevich(f, &constraint, x0.clone(), &params, cancel),
            Method::Popov => popov(f, &constraint, x0.clone(), &params, cancel),
            Method::Reflection => reflection(f, &constraint, x0.clone(), &params, cancel),
            Method::All => unreachable!("All is expanded before dispatch"),
        }
    };

    match request.method {
        Method::All => {
            let (k, (p, r)) = rayon::join(
                || run(Method::Korpelevich),
                || rayon::join(|| run(Method::Popov), || run(Method::Reflection)),
            );
            let mut results = BTreeMap::new();
            for (method, report) in [
                (Method::Korpelevich, k),
                (Method::Popov, p),
                (Method::Reflection, r),
            ] {
                results.insert(method.as_str().to_string(), report);
            }
            Ok(SolveOutput::All(results))
        }
        method => Ok(SolveOutput::Single(run(method))),
    }
}
