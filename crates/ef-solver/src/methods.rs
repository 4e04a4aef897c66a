//! The three fixed-step projection methods.
//!
//! Each takes the mapping as a plain evaluation closure, the box, a starting
//! vector and fixed iteration parameters, and runs to its cap. Running out
//! of iterations is a normal termination, reported with `converged: false`
//! and the last iterate; only the caller decides whether that is a problem.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use ef_core::Real;
use nalgebra::DVector;
use tracing::debug;

use crate::error::SolverError;
use crate::projection::BoxConstraint;

/// Iteration cap for Korpelevich and reflection.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Iteration cap for Popov, which trades cheaper iterations for more of
/// them.
pub const POPOV_DEFAULT_MAX_ITER: usize = 10_000;

/// Solve method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Korpelevich,
    Popov,
    Reflection,
    All,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Korpelevich => "korpelevich",
            Method::Popov => "popov",
            Method::Reflection => "reflection",
            Method::All => "all",
        }
    }

    /// The three concrete methods, in reporting order.
    pub const SINGLE: [Method; 3] = [Method::Korpelevich, Method::Popov, Method::Reflection];

    /// Per-method default iteration cap.
    pub fn default_max_iter(self) -> usize {
        match self {
            Method::Popov => POPOV_DEFAULT_MAX_ITER,
            _ => DEFAULT_MAX_ITER,
        }
    }
}

impl FromStr for Method {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "korpelevich" => Ok(Method::Korpelevich),
            "popov" => Ok(Method::Popov),
            "reflection" => Ok(Method::Reflection),
            "all" => Ok(Method::All),
            other => Err(SolverError::UnknownMethod {
                name: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed iteration parameters shared by all methods.
#[derive(Debug, Clone, Copy)]
pub struct IterParams {
    /// Fixed step size λ.
    pub step: Real,
    /// Convergence tolerance ε.
    pub epsilon: Real,
    /// Iteration cap.
    pub max_iter: usize,
}

/// Cooperative cancellation flag, checked once per iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Outcome of one method run.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Final iterate, always inside the box.
    pub x: DVector<Real>,
    /// Iterations run, 1-based; equals the cap when the tolerance was never
    /// met.
    pub iterations: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    pub converged: bool,
    pub cancelled: bool,
}

fn cancelled(token: Option<&CancelToken>) -> bool {
    token.is_some_and(CancelToken::is_cancelled)
}

/// Korpelevich extragradient: extrapolate through y, step from x.
pub fn korpelevich<F>(
    f: F,
    constraint: &BoxConstraint,
    x0: DVector<Real>,
    params: &IterParams,
    cancel: Option<&CancelToken>,
) -> SolveReport
where
    F: Fn(&DVector<Real>) -> DVector<Real>,
{
    let start = Instant::now();
    let mut x = constraint.project(x0);
    for iter in 1..=params.max_iter {
        if cancelled(cancel) {
            return report(Method::Korpelevich, x, iter, start, false, true);
        }
        let y = constraint.project(&x - f(&x) * params.step);
        if (&y - &x).norm() < params.epsilon {
            return report(Method::Korpelevich, x, iter, start, true, false);
        }
        x = constraint.project(&x - f(&y) * params.step);
    }
    report(Method::Korpelevich, x, params.max_iter, start, false, false)
}

/// Popov extrapolation from the past: reuse F(y) for both updates, stop only
/// when all three pairwise gaps close simultaneously.
pub fn popov<F>(
    f: F,
    constraint: &BoxConstraint,
    x0: DVector<Real>,
    params: &IterParams,
    cancel: Option<&CancelToken>,
) -> SolveReport
where
    F: Fn(&DVector<Real>) -> DVector<Real>,
{
    let start = Instant::now();
    let mut x = constraint.project(x0.clone());
    let mut y = constraint.project(x0);
    for iter in 1..=params.max_iter {
        if cancelled(cancel) {
            return report(Method::Popov, x, iter, start, false, true);
        }
        let step_fy = f(&y) * params.step;
        let x_next = constraint.project(&x - &step_fy);
        let y_next = constraint.project(&x_next - &step_fy);
        let done = (&x - &y).norm() < params.epsilon
            && (&x - &x_next).norm() < params.epsilon
            && (&y - &x_next).norm() < params.epsilon;
        x = x_next;
        y = y_next;
        if done {
            return report(Method::Popov, x, iter, start, true, false);
        }
    }
    report(Method::Popov, x, params.max_iter, start, false, false)
}

/// Projected reflection: the stop check compares against the previous
/// reflected point before the next one is formed.
pub fn reflection<F>(
    f: F,
    constraint: &BoxConstraint,
    x0: DVector<Real>,
    params: &IterParams,
    cancel: Option<&CancelToken>,
) -> SolveReport
where
    F: Fn(&DVector<Real>) -> DVector<Real>,
{
    let start = Instant::now();
    let mut x = constraint.project(x0.clone());
    let mut y = constraint.project(x0);
    for iter in 1..=params.max_iter {
        if cancelled(cancel) {
            return report(Method::Reflection, x, iter, start, false, true);
        }
        let x_next = constraint.project(&x - f(&x) * params.step);
        if (&y - &x).norm() < params.epsilon && (&x_next - &x).norm() < params.epsilon {
            return report(Method::Reflection, x, iter, start, true, false);
        }
        y = constraint.project(&x_next * 2.0 - &x);
        x = x_next;
    }
    report(Method::Reflection, x, params.max_iter, start, false, false)
}

fn report(
    method: Method,
    x: DVector<Real>,
    iterations: usize,
    start: Instant,
    converged: bool,
    cancelled: bool,
) -> SolveReport {
    let elapsed = start.elapsed();
    debug!(
        %method,
        iterations,
        converged,
        cancelled,
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        "method finished"
    );
    SolveReport {
        x,
        iterations,
        elapsed,
        converged,
        cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Affine strongly monotone mapping F(x) = x − c with solution c.
    fn shifted_identity(c: Real) -> impl Fn(&DVector<Real>) -> DVector<Real> + Copy {
        move |x: &DVector<Real>| x.map(|v| v - c)
    }

    fn params() -> IterParams {
        IterParams {
            step: 0.5,
            epsilon: 1e-9,
            max_iter: DEFAULT_MAX_ITER,
        }
    }

    fn run_all(
        f: impl Fn(&DVector<Real>) -> DVector<Real> + Copy,
        constraint: &BoxConstraint,
        x0: DVector<Real>,
    ) -> [SolveReport; 3] {
        [
            korpelevich(f, constraint, x0.clone(), &params(), None),
            popov(f, constraint, x0.clone(), &params(), None),
            reflection(f, constraint, x0, &params(), None),
        ]
    }

    #[test]
    fn all_methods_find_interior_solution() {
        let constraint = BoxConstraint::new(0.0, 10.0).unwrap();
        let x0 = DVector::from_element(3, 0.0);
        for result in run_all(shifted_identity(2.0), &constraint, x0) {
            assert!(result.converged);
            assert!(result.iterations <= DEFAULT_MAX_ITER);
            assert!(constraint.contains(&result.x));
            for &v in result.x.iter() {
                assert!((v - 2.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn all_methods_respect_active_bound() {
        // Solution of F(x) = x + 5 is −5, outside the box: the projected
        // equilibrium sits on the lower bound.
        let constraint = BoxConstraint::new(0.0, 10.0).unwrap();
        let x0 = DVector::from_element(2, 4.0);
        for result in run_all(shifted_identity(-5.0), &constraint, x0) {
            assert!(result.converged);
            assert!(constraint.contains(&result.x));
            for &v in result.x.iter() {
                assert!(v.abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cap_exhaustion_is_reported_not_raised() {
        // A step far too large to converge oscillates until the cap.
        let constraint = BoxConstraint::new(-10.0, 10.0).unwrap();
        let p = IterParams {
            step: 3.0,
            epsilon: 1e-12,
            max_iter: 50,
        };
        let result = korpelevich(
            shifted_identity(0.0),
            &constraint,
            DVector::from_element(1, 8.0),
            &p,
            None,
        );
        assert!(!result.converged);
        assert_eq!(result.iterations, 50);
        assert!(constraint.contains(&result.x));
    }

    #[test]
    fn cancellation_stops_promptly() {
        let constraint = BoxConstraint::new(0.0, 10.0).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let result = popov(
            shifted_identity(2.0),
            &constraint,
            DVector::from_element(1, 0.0),
            &params(),
            Some(&token),
        );
        assert!(result.cancelled);
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn method_names_round_trip() {
        for method in [
            Method::Korpelevich,
            Method::Popov,
            Method::Reflection,
            Method::All,
        ] {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
        assert!(matches!(
            "newton".parse::<Method>(),
            Err(SolverError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn popov_cap_default_is_larger() {
        assert_eq!(Method::Popov.default_max_iter(), POPOV_DEFAULT_MAX_ITER);
        assert_eq!(Method::Korpelevich.default_max_iter(), DEFAULT_MAX_ITER);
    }
}
