//! Demand-node penalty parameters.

use ef_core::Real;

use crate::error::{GraphError, GraphResult};

/// Penalty configuration for one demand node.
///
/// Excess deliveries above the [P_min, P_max] target band are penalized at
/// `lambda_excess`, shortage below it at `lambda_shortage`. The band must
/// have positive width: the gradient divides by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandNodeParams {
    pub lambda_excess: Real,
    pub lambda_shortage: Real,
    pub p_min: Real,
    pub p_max: Real,
}

impl DemandNodeParams {
    pub fn new(lambda_excess: Real, lambda_shortage: Real, p_min: Real, p_max: Real) -> Self {
        Self {
            lambda_excess,
            lambda_shortage,
            p_min,
            p_max,
        }
    }

    /// Width of the target band. Positive after validation.
    pub fn span(&self) -> Real {
        self.p_max - self.p_min
    }

    /// Validate for demand node R_{index+1}.
    pub fn validate(&self, index: u32) -> GraphResult<()> {
        for (what, value) in [
            ("lambda+", self.lambda_excess),
            ("lambda-", self.lambda_shortage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::InvalidPenalty { index, what, value });
            }
        }
        if !self.p_min.is_finite() || !self.p_max.is_finite() || self.p_max <= self.p_min {
            return Err(GraphError::DegenerateTargetRange {
                index,
                p_min: self.p_min,
                p_max: self.p_max,
            });
        }
        Ok(())
    }
}
