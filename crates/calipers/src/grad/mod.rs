//! Analytic gradients without a tape.
//!
//! Purpose
//! - `primitives`: vector-Jacobian products of every constructor and measure.
//! - `provenance`: rebuild intersections and hulls from saved tags and push
//!   output gradients back to the input vertices.
//!
//! Conventions
//! - All writes are additive. Zero the accumulators before the first call and
//!   size them like the inputs (`Poly::zeros_like`).
//! - Gradient passes trust the tags of a successful forward pass and do not fail.

mod primitives;
mod provenance;

pub use primitives::*;
pub(crate) use provenance::{add_vertex_grad, vertex};
pub use provenance::{intersect_grad, merge_grad, reconstruct_hull, reconstruct_intersection};

#[cfg(test)]
mod tests;
