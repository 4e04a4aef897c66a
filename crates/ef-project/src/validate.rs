//! Scenario validation logic.
//!
//! Everything structural is checked here, before any solver construction:
//! version gate, tier counts, penalty parameters (including the P_max >
//! P_min requirement the gradient divides by), and edge overrides against
//! the adjacency pattern. Function bodies are deliberately not checked — a
//! malformed body degrades its one derivative downstream instead of
//! rejecting the file.

use std::collections::HashSet;

use ef_graph::{NodeRef, Topology};

use crate::schema::{LATEST_VERSION, Scenario};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown node name: {name} in {context}")]
    UnknownNode { name: String, context: String },

    #[error("Edge {source_node}-{target} is not admitted by the tier pattern")]
    EdgeOutsidePattern { source_node: String, target: String },

    #[error("Duplicate edge override: {source_node}-{target}")]
    DuplicateEdge { source_node: String, target: String },

    #[error("Expected {expected} demand node entries (one per R node), got {got}")]
    DemandCountMismatch { expected: u32, got: usize },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let invalid = |field: &str, value: f64, reason: &str| ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let t = scenario.topology;
    let topology = Topology::new(t.n_c, t.n_b, t.n_d, t.n_r).map_err(|_| {
        ValidationError::InvalidValue {
            field: "topology".to_string(),
            value: format!("nC={} nB={} nD={} nR={}", t.n_c, t.n_b, t.n_d, t.n_r),
            reason: "every tier needs at least one node".to_string(),
        }
    })?;

    if !scenario.theta.is_finite() {
        return Err(invalid("theta", scenario.theta, "must be finite"));
    }

    if scenario.demand_nodes.len() != t.n_r as usize {
        return Err(ValidationError::DemandCountMismatch {
            expected: t.n_r,
            got: scenario.demand_nodes.len(),
        });
    }

    for (l, node) in scenario.demand_nodes.iter().enumerate() {
        let field = |name: &str| format!("demand_nodes[{l}].{name}");
        if !node.lambda_plus.is_finite() || node.lambda_plus < 0.0 {
            return Err(invalid(&field("lambda+"), node.lambda_plus, "must be >= 0"));
        }
        if !node.lambda_minus.is_finite() || node.lambda_minus < 0.0 {
            return Err(invalid(&field("lambda-"), node.lambda_minus, "must be >= 0"));
        }
        if !node.p_min.is_finite() || !node.p_max.is_finite() || node.p_max <= node.p_min {
            return Err(invalid(
                &field("P_max"),
                node.p_max,
                "target band needs P_max > P_min",
            ));
        }
    }

    let mut seen: HashSet<(NodeRef, NodeRef)> = HashSet::new();
    for (i, edge) in scenario.edges.iter().enumerate() {
        let context = format!("edges[{i}]");
        let parse = |name: &str| {
            NodeRef::parse(name).map_err(|_| ValidationError::UnknownNode {
                name: name.to_string(),
                context: context.clone(),
            })
        };
        let source = parse(&edge.source)?;
        let target = parse(&edge.target)?;
        if !topology.admits_edge(source, target) {
            return Err(ValidationError::EdgeOutsidePattern {
                source_node: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        if !seen.insert((source, target)) {
            return Err(ValidationError::DuplicateEdge {
                source_node: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        if let Some(alpha) = edge.alpha {
            if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
                return Err(invalid(
                    &format!("{context}.alpha"),
                    alpha,
                    "retention must lie in (0, 1]",
                ));
            }
        }
    }

    Ok(())
}
