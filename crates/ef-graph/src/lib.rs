//! ef-graph: tiered supply-network model.
//!
//! A network is a fixed seven-tier layout (origin, extraction, three paired
//! processing tiers, distribution, demand) whose edge set is fully determined
//! by four tier widths. This crate owns the topology and its adjacency
//! pattern, the edge arena with per-edge cost/loss/risk functions and
//! retention coefficients, source-to-demand path enumeration, and the
//! incidence/retention arithmetic the solver builds its gradient mapping
//! from.

pub mod builder;
pub mod demand;
pub mod edge;
pub mod error;
pub mod paths;
pub mod retention;
pub mod topology;

pub use builder::NetworkBuilder;
pub use demand::DemandNodeParams;
pub use edge::{Edge, EdgeFunctions, Network};
pub use error::{GraphError, GraphResult};
pub use paths::{EDGES_PER_PATH, Path, PathTable};
pub use topology::{NodeRef, Tier, Topology};
