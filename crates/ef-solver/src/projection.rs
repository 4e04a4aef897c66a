//! Box projection.

use ef_core::Real;
use nalgebra::DVector;

use crate::error::{SolverError, SolverResult};

/// The feasible box [lo, hi]ⁿ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxConstraint {
    lo: Real,
    hi: Real,
}

impl BoxConstraint {
    pub fn new(lo: Real, hi: Real) -> SolverResult<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(SolverError::Request {
                what: format!("box bounds must be finite with C_min < C_max, got [{lo}, {hi}]"),
            });
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> Real {
        self.lo
    }

    pub fn hi(&self) -> Real {
        self.hi
    }

    /// Componentwise max(lo, min(hi, x_i)).
    pub fn project(&self, mut x: DVector<Real>) -> DVector<Real> {
        for v in x.iter_mut() {
            *v = v.min(self.hi).max(self.lo);
        }
        x
    }

    pub fn contains(&self, x: &DVector<Real>) -> bool {
        x.iter().all(|&v| v >= self.lo && v <= self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoxConstraint {
        BoxConstraint::new(0.0, 10.0).unwrap()
    }

    #[test]
    fn clamps_componentwise() {
        let c = unit_box();
        let x = DVector::from_vec(vec![-5.0, 3.0, 42.0]);
        let y = c.project(x);
        assert_eq!(y, DVector::from_vec(vec![0.0, 3.0, 10.0]));
    }

    #[test]
    fn image_lies_in_box() {
        let c = unit_box();
        let y = c.project(DVector::from_vec(vec![-1e9, 1e9, 5.0]));
        assert!(c.contains(&y));
    }

    #[test]
    fn degenerate_or_inverted_bounds_are_rejected() {
        assert!(BoxConstraint::new(5.0, 5.0).is_err());
        assert!(BoxConstraint::new(7.0, 2.0).is_err());
        assert!(BoxConstraint::new(0.0, Real::INFINITY).is_err());
    }

    proptest::proptest! {
        #[test]
        fn projection_is_idempotent(
            values in proptest::collection::vec(-100.0_f64..100.0, 1..8),
        ) {
            let c = BoxConstraint::new(-1.0, 1.0).unwrap();
            let once = c.project(DVector::from_vec(values));
            let twice = c.project(once.clone());
            proptest::prop_assert_eq!(once.clone(), twice);
            proptest::prop_assert!(c.contains(&once));
        }
    }
}
