//! Problem setup: network + demand parameters + risk weight.

use ef_core::{Real, ensure_finite};
use ef_graph::{DemandNodeParams, Network, PathTable};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::mapping::GradientMapping;
use crate::methods::CancelToken;
use crate::solve::{SolveOutput, SolveRequest};

/// A fully constructed equilibrium problem.
///
/// Construction validates the inputs, enumerates the paths and builds the
/// gradient mapping once; the instance is immutable afterwards. Changing the
/// network or any parameter means constructing a new problem — there is no
/// partial invalidation.
#[derive(Debug)]
pub struct EquilibriumProblem {
    network: Network,
    demand: Vec<DemandNodeParams>,
    theta: Real,
    paths: PathTable,
    mapping: GradientMapping,
}

impl EquilibriumProblem {
    pub fn new(
        network: Network,
        demand: Vec<DemandNodeParams>,
        theta: Real,
    ) -> SolverResult<Self> {
        let n_r = network.topology().n_r as usize;
        if demand.len() != n_r {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "expected {n_r} demand node parameter sets, got {}",
                    demand.len()
                ),
            });
        }
        for (l, params) in demand.iter().enumerate() {
            params.validate(l as u32)?;
        }
        ensure_finite(theta, "risk weight theta").map_err(|e| SolverError::ProblemSetup {
            what: e.to_string(),
        })?;

        let paths = PathTable::enumerate(&network)?;
        let mapping = GradientMapping::build(&network, &paths, &demand, theta);
        debug!(
            n_paths = paths.len(),
            n_edges = network.edges().len(),
            "equilibrium problem constructed"
        );

        Ok(Self {
            network,
            demand,
            theta,
            paths,
            mapping,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn demand(&self) -> &[DemandNodeParams] {
        &self.demand
    }

    pub fn theta(&self) -> Real {
        self.theta
    }

    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    pub fn mapping(&self) -> &GradientMapping {
        &self.mapping
    }

    /// Dimension of the flow vector: one component per path.
    pub fn n_paths(&self) -> usize {
        self.paths.len()
    }

    /// Solve with the given request. Convenience for [`crate::solve::solve`].
    pub fn solve(&self, request: &SolveRequest) -> SolverResult<SolveOutput> {
        crate::solve::solve(self, request, None)
    }

    /// Solve with a cancellation token checked once per iteration.
    pub fn solve_with_cancel(
        &self,
        request: &SolveRequest,
        cancel: &CancelToken,
    ) -> SolverResult<SolveOutput> {
        crate::solve::solve(self, request, Some(cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ef_graph::{EdgeFunctions, NetworkBuilder, Topology};

    fn network(n_r: u32) -> Network {
        let topo = Topology::new(1, 1, 1, n_r).unwrap();
        NetworkBuilder::with_uniform_functions(topo, EdgeFunctions::default())
            .build()
            .unwrap()
    }

    fn demand() -> DemandNodeParams {
        DemandNodeParams::new(0.0, 100.0, 0.0, 5.0)
    }

    #[test]
    fn construction_caches_paths_and_mapping() {
        let problem = EquilibriumProblem::new(network(2), vec![demand(), demand()], 1.0).unwrap();
        assert_eq!(problem.n_paths(), 2);
        assert_eq!(problem.mapping().dim(), 2);
    }

    #[test]
    fn demand_count_mismatch_is_rejected() {
        let err = EquilibriumProblem::new(network(2), vec![demand()], 1.0).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    #[test]
    fn degenerate_band_is_rejected_at_construction() {
        let bad = DemandNodeParams::new(0.0, 100.0, 5.0, 5.0);
        let err = EquilibriumProblem::new(network(1), vec![bad], 1.0).unwrap_err();
        assert!(matches!(err, SolverError::Graph(_)));
    }

    #[test]
    fn non_finite_theta_is_rejected() {
        let err = EquilibriumProblem::new(network(1), vec![demand()], Real::NAN).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }
}
