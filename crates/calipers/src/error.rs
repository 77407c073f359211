//! Error taxonomy for the forward geometry operations.
//!
//! No-intersection is not an error: operations return an empty polygon for it.
//! Gradient passes never fail; they trust the tags saved by a successful forward.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeomError {
    /// More points were supplied than the fixed-capacity container holds.
    #[error("polygon capacity {capacity} exceeded by {requested} points")]
    Capacity { capacity: usize, requested: usize },

    /// All four neighbours of a candidate bridge are collinear with it.
    #[error("degenerate bridge between vertex {first} of the first polygon and vertex {second} of the second")]
    CollinearBridge { first: usize, second: usize },

    /// An operation produced more vertices than its output can hold.
    /// Only reachable for non-convex or self-intersecting input.
    #[error("output overflow: more than {capacity} vertices produced")]
    Overflow { capacity: usize },
}

pub type Result<T> = std::result::Result<T, GeomError>;
