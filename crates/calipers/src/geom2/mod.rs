//! Fixed-capacity 2D geometry: primitives, polygons, provenance tags, measures.
//!
//! Purpose
//! - Provide stack-allocated, `Copy` value types that the clipping, merging and
//!   gradient code can pass by reference without any heap traffic.
//! - Keep all numeric tolerances in `Real::EPS`.
//!
//! Why fixed capacity
//! - Every output size is bounded by the input capacities (`N1 + N2` for
//!   intersections and merges), so results fit in arrays chosen at compile time.
//!
//! Code cross-refs: `Poly`, `Tag`, `Tags`, `Tagged`, `Line2`, `AABox2`, `Xywhr`

pub mod measure;
mod poly;
mod types;

pub use measure::{
    area, center, centroid, dimension, distance, distance_line, distance_poly, distance_segment,
    Diameter,
};
pub(crate) use poly::Capacity;
pub use poly::{
    aabox_from_poly, poly_from_aabox, poly_from_xywhr, Poly, Tag, Tagged, Tags, MAX_TAGGED,
};
pub use types::{
    intersect_lines, line_from_pp, line_from_segment, point_from_t, segment_from_pp, t_from_point,
    AABox2, Line2, Segment2, Vec2, Xywhr,
};
