//! The gradient mapping F: ℝⁿ → ℝⁿ.
//!
//! One coordinate per path. Each coordinate sums the path's retention-
//! weighted marginal edge terms and adds the penalty terms of the demand
//! node the path delivers to. Coordinates are independent scalar functions
//! sharing the per-edge compiled programs; there is no combined n-variable
//! expression anywhere.

use ef_core::Real;
use ef_graph::{DemandNodeParams, Network, PathTable};
use nalgebra::DVector;
use tracing::debug;

use crate::terms::{EdgeTerms, assemble};

/// One coordinate function F_p.
#[derive(Debug, Clone)]
struct Coordinate {
    /// (arrival share, edge arena index) for every edge on the path.
    weights: Vec<(Real, usize)>,
    /// End-to-end surviving fraction μ(p).
    survival: Real,
    /// This path's own component in the flow vector.
    slot: usize,
    lambda_excess: Real,
    lambda_shortage: Real,
    /// Width of the demand node's target band, P_max − P_min.
    span: Real,
}

impl Coordinate {
    fn eval(&self, terms: &[EdgeTerms], theta: Real, x: &[Real]) -> Real {
        let mut total = 0.0;
        for &(share, edge) in &self.weights {
            let t = &terms[edge];
            total += share
                * (t.marginal_cost.eval(x)
                    + t.marginal_loss.eval(x)
                    + theta * t.marginal_risk.eval(x));
        }
        // Delivered volume at the demand node from this path.
        let delivered = self.survival * x[self.slot];
        total += self.lambda_excess * self.survival * delivered / self.span;
        total -= self.lambda_shortage * self.survival;
        total += self.lambda_shortage * self.survival * delivered / self.span;
        total
    }
}

/// The full mapping: per-edge compiled marginals plus n coordinates.
///
/// Built once per problem; evaluation is pure and cheap relative to
/// construction. Any change to topology or parameters means building a new
/// mapping.
#[derive(Debug, Clone)]
pub struct GradientMapping {
    terms: Vec<EdgeTerms>,
    coords: Vec<Coordinate>,
    theta: Real,
}

impl GradientMapping {
    /// Build the mapping. `demand` must already be validated: one entry per
    /// demand node, positive band width.
    pub fn build(
        network: &Network,
        paths: &PathTable,
        demand: &[DemandNodeParams],
        theta: Real,
    ) -> Self {
        let terms = assemble(network, paths);
        let coords = paths
            .iter()
            .map(|path| {
                let params = &demand[path.demand as usize];
                let weights = path
                    .edges
                    .iter()
                    .map(|&e| (network.retained_share(path, e), e.index() as usize))
                    .collect();
                Coordinate {
                    weights,
                    survival: network.survival(path),
                    slot: path.id.index() as usize,
                    lambda_excess: params.lambda_excess,
                    lambda_shortage: params.lambda_shortage,
                    span: params.span(),
                }
            })
            .collect::<Vec<_>>();
        debug!(
            paths = coords.len(),
            edges = terms.len(),
            "gradient mapping built"
        );
        Self {
            terms,
            coords,
            theta,
        }
    }

    /// Dimension n of the mapping.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Evaluate one coordinate at `x`.
    pub fn eval_coord(&self, p: usize, x: &[Real]) -> Real {
        self.coords[p].eval(&self.terms, self.theta, x)
    }

    /// Evaluate all coordinates into `out`.
    pub fn eval_into(&self, x: &DVector<Real>, out: &mut DVector<Real>) {
        let slots = x.as_slice();
        for (p, coord) in self.coords.iter().enumerate() {
            out[p] = coord.eval(&self.terms, self.theta, slots);
        }
    }

    /// Evaluate all coordinates, allocating the result.
    pub fn eval(&self, x: &DVector<Real>) -> DVector<Real> {
        let mut out = DVector::zeros(self.dim());
        self.eval_into(x, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ef_graph::{EdgeFunctions, NetworkBuilder, Topology};

    /// The single-path reference network: every edge c = f^2 + 11f, one
    /// demand node with λ+ = 0, λ− = 100, band [0, 5]. Closed form:
    /// F(x) = 6·(2x + 11) − 100 + 100·x/5 = 32x − 34.
    fn reference_mapping() -> GradientMapping {
        let topo = Topology::new(1, 1, 1, 1).unwrap();
        let network = NetworkBuilder::with_uniform_functions(
            topo,
            EdgeFunctions::new("f^2+11*f", "0", "0", 1.0),
        )
        .build()
        .unwrap();
        let paths = PathTable::enumerate(&network).unwrap();
        let demand = vec![DemandNodeParams::new(0.0, 100.0, 0.0, 5.0)];
        GradientMapping::build(&network, &paths, &demand, 1.0)
    }

    #[test]
    fn single_path_closed_form() {
        let mapping = reference_mapping();
        assert_eq!(mapping.dim(), 1);
        let at = |v: f64| mapping.eval(&DVector::from_element(1, v))[0];
        assert!((at(0.0) - (-34.0)).abs() < 1e-12);
        assert!((at(1.0) - (-2.0)).abs() < 1e-12);
        assert!((at(2.0) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn risk_term_scales_with_theta() {
        let topo = Topology::new(1, 1, 1, 1).unwrap();
        let network = NetworkBuilder::with_uniform_functions(
            topo,
            EdgeFunctions::new("0", "0", "f^2", 1.0),
        )
        .build()
        .unwrap();
        let paths = PathTable::enumerate(&network).unwrap();
        let demand = vec![DemandNodeParams::new(0.0, 0.0, 0.0, 1.0)];
        // dr = 2f per edge, six edges; θ multiplies the whole risk sum.
        for theta in [0.0, 1.0, 2.5] {
            let mapping = GradientMapping::build(&network, &paths, &demand, theta);
            let got = mapping.eval(&DVector::from_element(1, 1.0))[0];
            assert!((got - theta * 12.0).abs() < 1e-12);
        }
    }

    #[test]
    fn coordinates_are_separable() {
        // Two paths: evaluating one coordinate must not involve the other
        // path's penalty, and each coordinate reads its own slot.
        let topo = Topology::new(1, 1, 1, 2).unwrap();
        let network = NetworkBuilder::with_uniform_functions(
            topo,
            EdgeFunctions::new("0", "0", "0", 1.0),
        )
        .build()
        .unwrap();
        let paths = PathTable::enumerate(&network).unwrap();
        let demand = vec![
            DemandNodeParams::new(0.0, 10.0, 0.0, 1.0),
            DemandNodeParams::new(0.0, 50.0, 0.0, 2.0),
        ];
        let mapping = GradientMapping::build(&network, &paths, &demand, 1.0);
        let x = DVector::from_vec(vec![1.0, 4.0]);
        let f = mapping.eval(&x);
        // F_0 = −10 + 10·x0/1, F_1 = −50 + 50·x1/2.
        assert!((f[0] - 0.0).abs() < 1e-12);
        assert!((f[1] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn eval_into_matches_eval() {
        let mapping = reference_mapping();
        let x = DVector::from_element(1, 1.5);
        let mut out = DVector::zeros(1);
        mapping.eval_into(&x, &mut out);
        assert_eq!(out, mapping.eval(&x));
    }
}
