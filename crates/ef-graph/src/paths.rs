//! Source-to-demand path enumeration.

use ef_core::{EdgeId, PathId};

use crate::edge::Network;
use crate::error::{GraphError, GraphResult};
use crate::topology::{NodeRef, Tier};

/// Every path crosses exactly six edges, one per tier boundary.
pub const EDGES_PER_PATH: usize = 6;

/// One complete route from the origin to a demand node, as an ordered edge
/// sequence.
#[derive(Debug, Clone)]
pub struct Path {
    pub id: PathId,
    pub edges: [EdgeId; EDGES_PER_PATH],
    /// 0-based index of the demand node this path terminates at.
    pub demand: u32,
}

impl Path {
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }
}

/// All paths of a network, enumerated once and indexed contiguously.
///
/// Enumeration nests (C, B, D, R) with C outermost and R innermost, so path
/// p = ((i·nB + j)·nD + k)·nR + l. The solver relies on this order: path
/// index and flow-vector component index are the same thing.
#[derive(Debug, Clone)]
pub struct PathTable {
    paths: Vec<Path>,
}

impl PathTable {
    pub fn enumerate(network: &Network) -> GraphResult<Self> {
        let topo = network.topology();
        let mut paths = Vec::with_capacity(topo.n_paths());

        let edge = |source: NodeRef, target: NodeRef| -> GraphResult<EdgeId> {
            network
                .edge_between(source, target)
                .ok_or_else(|| GraphError::MissingEdge {
                    source_node: source.to_string(),
                    target: target.to_string(),
                })
        };

        for i in 0..topo.n_c {
            for j in 0..topo.n_b {
                for k in 0..topo.n_d {
                    for l in 0..topo.n_r {
                        let c = NodeRef::new(Tier::C, i);
                        let b = NodeRef::new(Tier::B, j);
                        let p = NodeRef::new(Tier::P, j);
                        let s = NodeRef::new(Tier::S, j);
                        let d = NodeRef::new(Tier::D, k);
                        let r = NodeRef::new(Tier::R, l);
                        paths.push(Path {
                            id: PathId::from_index(paths.len() as u32),
                            edges: [
                                edge(NodeRef::origin(), c)?,
                                edge(c, b)?,
                                edge(b, p)?,
                                edge(p, s)?,
                                edge(s, d)?,
                                edge(d, r)?,
                            ],
                            demand: l,
                        });
                    }
                }
            }
        }

        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id.index() as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }

    /// Paths terminating at demand node R_l (0-based l).
    pub fn paths_to_demand(&self, demand: u32) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(move |p| p.demand == demand)
    }
}
