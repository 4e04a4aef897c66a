//! Network-specific error types.

use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Every tier needs at least one node (nC={n_c}, nB={n_b}, nD={n_d}, nR={n_r})")]
    EmptyTier {
        n_c: u32,
        n_b: u32,
        n_d: u32,
        n_r: u32,
    },

    #[error("No {source_node}-{target} edge exists in the tier adjacency pattern")]
    EdgeOutsidePattern { source_node: String, target: String },

    #[error("Edge {source_node}-{target} has no function definition")]
    MissingEdge { source_node: String, target: String },

    #[error("Retention for edge {source_node}-{target} must lie in (0, 1], got {alpha}")]
    InvalidRetention {
        source_node: String,
        target: String,
        alpha: f64,
    },

    #[error("Demand node R{index}: P_max ({p_max}) must exceed P_min ({p_min})")]
    DegenerateTargetRange {
        index: u32,
        p_min: f64,
        p_max: f64,
    },

    #[error("Demand node R{index}: {what} must be finite and non-negative, got {value}")]
    InvalidPenalty {
        index: u32,
        what: &'static str,
        value: f64,
    },

    #[error("Unknown node name: {name}")]
    UnknownNode { name: String },
}
