//! Edge arena and the frozen network.

use std::collections::HashMap;

use ef_core::{EdgeId, Real};

use crate::topology::{NodeRef, Topology};

/// The per-edge inputs: three single-variable function bodies in the flow
/// variable `f`, plus the retention coefficient.
///
/// The function bodies stay as raw strings here; parsing happens where the
/// derivatives are assembled, so a malformed body degrades that one
/// derivative instead of poisoning network construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFunctions {
    pub cost: String,
    pub loss: String,
    pub risk: String,
    pub alpha: Real,
}

impl EdgeFunctions {
    pub fn new(
        cost: impl Into<String>,
        loss: impl Into<String>,
        risk: impl Into<String>,
        alpha: Real,
    ) -> Self {
        Self {
            cost: cost.into(),
            loss: loss.into(),
            risk: risk.into(),
            alpha,
        }
    }
}

impl Default for EdgeFunctions {
    fn default() -> Self {
        Self::new("0", "0", "0", 1.0)
    }
}

/// One edge of the frozen network.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeRef,
    pub target: NodeRef,
    pub functions: EdgeFunctions,
}

/// A validated, immutable network: topology plus the edge arena.
///
/// Edges are stored in the canonical pattern order with contiguous IDs;
/// `edge_between` gives O(1) lookup by endpoints.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) topology: Topology,
    pub(crate) edges: Vec<Edge>,
    pub(crate) lookup: HashMap<(NodeRef, NodeRef), EdgeId>,
}

impl Network {
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get an edge by ID (None if the ID is out of bounds).
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index() as usize)
    }

    /// Look up the edge connecting two nodes, if the pattern has one.
    pub fn edge_between(&self, source: NodeRef, target: NodeRef) -> Option<EdgeId> {
        self.lookup.get(&(source, target)).copied()
    }
}
