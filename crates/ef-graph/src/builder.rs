//! Incremental network builder.

use std::collections::HashMap;

use ef_core::EdgeId;

use crate::edge::{Edge, EdgeFunctions, Network};
use crate::error::{GraphError, GraphResult};
use crate::topology::{NodeRef, Topology};

/// Builder for constructing a network.
///
/// Assign functions to pattern edges with `set_edge`, then call `build()` to
/// validate and freeze the result. Every edge the pattern admits must have
/// functions by build time.
#[derive(Debug)]
pub struct NetworkBuilder {
    topology: Topology,
    functions: HashMap<(NodeRef, NodeRef), EdgeFunctions>,
}

impl NetworkBuilder {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            functions: HashMap::new(),
        }
    }

    /// Start with the same functions on every edge; useful as a base layer
    /// for per-edge overrides.
    pub fn with_uniform_functions(topology: Topology, functions: EdgeFunctions) -> Self {
        let mut builder = Self::new(topology);
        for (source, target) in topology.edge_endpoints() {
            builder.functions.insert((source, target), functions.clone());
        }
        builder
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Assign (or replace) the functions on one pattern edge.
    pub fn set_edge(
        &mut self,
        source: NodeRef,
        target: NodeRef,
        functions: EdgeFunctions,
    ) -> GraphResult<&mut Self> {
        if !self.topology.admits_edge(source, target) {
            return Err(GraphError::EdgeOutsidePattern {
                source_node: source.to_string(),
                target: target.to_string(),
            });
        }
        self.functions.insert((source, target), functions);
        Ok(self)
    }

    /// Validate and freeze into an immutable `Network`.
    pub fn build(self) -> GraphResult<Network> {
        let mut edges = Vec::with_capacity(self.topology.n_edges());
        let mut lookup = HashMap::with_capacity(self.topology.n_edges());

        for (index, (source, target)) in self.topology.edge_endpoints().into_iter().enumerate() {
            let functions = self.functions.get(&(source, target)).cloned().ok_or_else(|| {
                GraphError::MissingEdge {
                    source_node: source.to_string(),
                    target: target.to_string(),
                }
            })?;

            if !functions.alpha.is_finite() || functions.alpha <= 0.0 || functions.alpha > 1.0 {
                return Err(GraphError::InvalidRetention {
                    source_node: source.to_string(),
                    target: target.to_string(),
                    alpha: functions.alpha,
                });
            }

            let id = EdgeId::from_index(index as u32);
            lookup.insert((source, target), id);
            edges.push(Edge {
                id,
                source,
                target,
                functions,
            });
        }

        Ok(Network {
            topology: self.topology,
            edges,
            lookup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Tier;

    fn topo() -> Topology {
        Topology::new(1, 1, 1, 1).unwrap()
    }

    #[test]
    fn uniform_build_covers_every_edge() {
        let network = NetworkBuilder::with_uniform_functions(topo(), EdgeFunctions::default())
            .build()
            .unwrap();
        assert_eq!(network.edges().len(), topo().n_edges());
    }

    #[test]
    fn missing_edge_fails_build() {
        let err = NetworkBuilder::new(topo()).build().unwrap_err();
        assert!(matches!(err, GraphError::MissingEdge { .. }));
    }

    #[test]
    fn override_replaces_base_functions() {
        let mut builder = NetworkBuilder::with_uniform_functions(topo(), EdgeFunctions::default());
        builder
            .set_edge(
                NodeRef::origin(),
                NodeRef::new(Tier::C, 0),
                EdgeFunctions::new("f^2", "0", "0", 0.9),
            )
            .unwrap();
        let network = builder.build().unwrap();
        let id = network
            .edge_between(NodeRef::origin(), NodeRef::new(Tier::C, 0))
            .unwrap();
        let edge = network.edge(id).unwrap();
        assert_eq!(edge.functions.cost, "f^2");
        assert_eq!(edge.functions.alpha, 0.9);
    }

    #[test]
    fn edge_outside_pattern_is_rejected() {
        let mut builder = NetworkBuilder::new(topo());
        let err = builder
            .set_edge(
                NodeRef::new(Tier::B, 0),
                NodeRef::new(Tier::R, 0),
                EdgeFunctions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::EdgeOutsidePattern { .. }));
    }

    #[test]
    fn retention_outside_unit_interval_is_rejected() {
        for alpha in [0.0, -0.5, 1.5, f64::NAN] {
            let mut functions = EdgeFunctions::default();
            functions.alpha = alpha;
            let err = NetworkBuilder::with_uniform_functions(topo(), functions)
                .build()
                .unwrap_err();
            assert!(
                matches!(err, GraphError::InvalidRetention { .. }),
                "alpha={alpha} accepted"
            );
        }
    }
}
