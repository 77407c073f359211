//! Differentiable overlap of convex polygons.
//!
//! Intersection (rotating calipers or half-plane clipping), convex-hull merge,
//! and the IoU family of overlap metrics, each with an analytic gradient with
//! respect to the input vertices. Binary operations tag every output vertex
//! with its provenance so that the backward pass can rebuild the result from
//! the inputs alone; there is no tape.
//!
//! Layout
//! - `scalar`: the `Real` trait and its tolerance table.
//! - `geom2`: fixed-capacity polygons, tags, primitives and measures.
//! - `clip`: intersection, merge and farthest pair.
//! - `grad`: primitive gradients and tag-driven propagation.
//! - `overlap`: IoU / GIoU / DIoU for polygons and boxes.
//! - `rand`: seeded random convex polygons.
//!
//! API Policy
//! - Geometry operations never allocate. Capacities are const generics and the
//!   output capacity of a binary operation must be at least `N1 + N2`.

pub mod clip;
pub mod error;
pub mod geom2;
pub mod grad;
pub mod overlap;
pub mod rand;
pub mod scalar;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use clip::{intersect, merge, Algorithm};
pub use error::{GeomError, Result};
pub use geom2::{AABox2, Poly, Tag, Tags, Tagged, Vec2, Xywhr};
pub use scalar::Real;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::clip::{
        intersect, intersect_hodgman, intersect_rotating, max_distance, merge, Algorithm,
    };
    pub use crate::error::GeomError;
    pub use crate::geom2::{
        aabox_from_poly, area, centroid, dimension, poly_from_aabox, poly_from_xywhr, AABox2,
        Poly, Tag, Tags, Tagged, Vec2, Xywhr,
    };
    pub use crate::overlap::{diou, diou_grad, giou, giou_grad, iou, iou_grad};
    pub use crate::rand::{draw_pair_radial, draw_polygon_radial, RadialCfg, ReplayToken, VertexCount};
    pub use crate::scalar::Real;
}
