//! Error types for expression handling.

use thiserror::Error;

pub type ExprResult<T> = Result<T, ExprError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Empty expression")]
    Empty,

    #[error("Parse error near '{near}'")]
    Parse { near: String },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },
}
