//! Scenario to solver-input conversion.

use ef_graph::{DemandNodeParams, Network, NetworkBuilder, NodeRef, Topology};

use crate::ProjectResult;
use crate::defaults::tier_default;
use crate::schema::Scenario;
use crate::validate::validate_scenario;

/// Build the solver inputs from a scenario: the frozen network, the
/// per-demand-node parameters (in R order), and the risk weight.
///
/// Every pattern edge starts from its tier default; listed edges overlay
/// whichever fields they set.
pub fn scenario_inputs(
    scenario: &Scenario,
) -> ProjectResult<(Network, Vec<DemandNodeParams>, f64)> {
    validate_scenario(scenario)?;

    let t = scenario.topology;
    let topology = Topology::new(t.n_c, t.n_b, t.n_d, t.n_r)?;

    let mut builder = NetworkBuilder::new(topology);
    for (source, target) in topology.edge_endpoints() {
        builder.set_edge(source, target, tier_default(source.tier))?;
    }

    for def in &scenario.edges {
        let source = NodeRef::parse(&def.source)?;
        let target = NodeRef::parse(&def.target)?;
        let mut functions = tier_default(source.tier);
        if let Some(c) = &def.c {
            functions.cost = c.clone();
        }
        if let Some(z) = &def.z {
            functions.loss = z.clone();
        }
        if let Some(r) = &def.r {
            functions.risk = r.clone();
        }
        if let Some(alpha) = def.alpha {
            functions.alpha = alpha;
        }
        builder.set_edge(source, target, functions)?;
    }

    let network = builder.build()?;
    let demand = scenario
        .demand_nodes
        .iter()
        .map(|d| DemandNodeParams::new(d.lambda_plus, d.lambda_minus, d.p_min, d.p_max))
        .collect();

    Ok((network, demand, scenario.theta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DemandNodeDef, EdgeDef, Scenario, TopologyDef};
    use ef_graph::Tier;

    fn scenario() -> Scenario {
        Scenario {
            version: 1,
            name: "convert".to_string(),
            topology: TopologyDef {
                n_c: 1,
                n_b: 1,
                n_d: 1,
                n_r: 1,
            },
            theta: 2.0,
            edges: vec![EdgeDef {
                source: "B1".to_string(),
                target: "P1".to_string(),
                c: Some("5*f".to_string()),
                z: None,
                r: None,
                alpha: Some(0.8),
            }],
            demand_nodes: vec![DemandNodeDef {
                lambda_plus: 1.0,
                lambda_minus: 100.0,
                p_min: 0.0,
                p_max: 5.0,
            }],
        }
    }

    #[test]
    fn defaults_fill_unlisted_edges() {
        let (network, demand, theta) = scenario_inputs(&scenario()).unwrap();
        assert_eq!(network.edges().len(), 6);
        assert_eq!(demand.len(), 1);
        assert_eq!(theta, 2.0);

        // Unlisted origin edge keeps its tier default.
        let id = network
            .edge_between(NodeRef::origin(), NodeRef::new(Tier::C, 0))
            .unwrap();
        assert_eq!(network.edge(id).unwrap().functions.cost, "f^2+6*f");
        assert_eq!(network.edge(id).unwrap().functions.risk, "2*f^2");
    }

    #[test]
    fn override_merges_over_tier_default() {
        let (network, _, _) = scenario_inputs(&scenario()).unwrap();
        let id = network
            .edge_between(NodeRef::new(Tier::B, 0), NodeRef::new(Tier::P, 0))
            .unwrap();
        let functions = &network.edge(id).unwrap().functions;
        assert_eq!(functions.cost, "5*f");
        // Fields not set in the override keep the tier default.
        assert_eq!(functions.loss, "0");
        assert_eq!(functions.alpha, 0.8);
    }

    #[test]
    fn demand_params_carry_over_in_order() {
        let mut s = scenario();
        s.topology.n_r = 2;
        s.demand_nodes.push(DemandNodeDef {
            lambda_plus: 3.0,
            lambda_minus: 4.0,
            p_min: 1.0,
            p_max: 2.0,
        });
        let (_, demand, _) = scenario_inputs(&s).unwrap();
        assert_eq!(demand[0].lambda_shortage, 100.0);
        assert_eq!(demand[1].lambda_excess, 3.0);
        assert_eq!(demand[1].span(), 1.0);
    }
}
