//! Overlap metrics and their gradients.
//!
//! Purpose
//! - IoU `= A∩ / (A1 + A2 − A∩)`.
//! - GIoU `= IoU + U / Am − 1`, with `U` the union area and `Am` the area of
//!   the merged hull.
//! - DIoU `= IoU − d(c1, c2)² / diam(hull)²`, with `c` the vertex centroids.
//!
//! Forward/backward split
//! - Polygon forwards return the value plus the tags the backward pass needs
//!   (`IouForward`, `GiouForward`, `DiouForward`). The backward passes take the
//!   inputs and those tags and add into zeroed accumulators.
//! - Box versions live in [`aabox`]; they need no tags.
//!
//! Code cross-refs: `clip::intersect`, `clip::merge`, `grad::intersect_grad`

pub mod aabox;
mod polygon;

pub use polygon::{
    diou, diou_grad, diou_with, giou, giou_grad, giou_with, iou, iou_grad, iou_with, DiouForward,
    GiouForward, IouForward,
};
