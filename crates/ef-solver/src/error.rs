//! Error types for solver operations.

use ef_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while setting up or dispatching a solve.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Invalid solve request: {what}")]
    Request { what: String },

    #[error("Unsupported method: {name}")]
    UnknownMethod { name: String },

    #[error("Network error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;
