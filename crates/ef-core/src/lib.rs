//! ef-core: stable foundation for equiflow.
//!
//! Contains:
//! - ids (stable compact IDs for network/path objects)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{EfError, EfResult};
pub use ids::*;
pub use numeric::*;
