//! Boolean operations on convex polygons with provenance tags.
//!
//! Purpose
//! - Intersection by rotating calipers (O(n + m)) or by half-plane clipping
//!   (O(n·m)); both produce the same tag dialect, so the backward pass does
//!   not care which one ran.
//! - Convex-hull merge by rotating calipers.
//! - Farthest vertex pair between two polygons.
//!
//! Capacities
//! - Outputs are `Tagged<T, M>` with `M ≥ N1 + N2` and inputs of at most
//!   `MAX_TAGGED` vertices; violations fail to compile.
//!
//! Code cross-refs: `geom2::Tag`, `grad::provenance`

mod extent;
mod hodgman;
mod merge;
mod rotating;
pub(crate) mod sweep;

pub use extent::{max_distance, FarthestPair};
pub use hodgman::intersect_hodgman;
pub use merge::merge;
pub use rotating::intersect_rotating;

use crate::error::Result;
use crate::geom2::{Poly, Tagged};
use crate::scalar::Real;

/// Intersection algorithm selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Currently the rotating-caliper algorithm.
    #[default]
    Default,
    RotatingCaliper,
    SutherlandHodgeman,
}

impl Algorithm {
    /// The concrete algorithm `Default` stands for.
    pub fn resolve(self) -> Algorithm {
        match self {
            Algorithm::Default => Algorithm::RotatingCaliper,
            other => other,
        }
    }
}

/// Intersection of two convex CCW polygons with the selected algorithm.
///
/// With `Default`/`RotatingCaliper`, inputs sharing an exactly parallel edge
/// pair are not supported (see [`intersect_rotating`]).
pub fn intersect<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    algorithm: Algorithm,
) -> Result<Tagged<T, M>> {
    match algorithm.resolve() {
        Algorithm::SutherlandHodgeman => intersect_hodgman(p1, p2),
        _ => intersect_rotating(p1, p2),
    }
}

#[cfg(test)]
mod tests;
