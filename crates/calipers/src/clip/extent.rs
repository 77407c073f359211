//! Farthest pair between two convex polygons.

use super::sweep::{bottommost, topmost, Caliper};
use crate::geom2::{distance, Poly};
use crate::scalar::Real;

/// Largest distance between a vertex of `p1` and a vertex of `p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FarthestPair<T> {
    pub length: T,
    /// Vertex of the first polygon.
    pub i: usize,
    /// Vertex of the second polygon.
    pub j: usize,
}

/// Antipodal rotating calipers: `p1` is walked from its top, `p2` from its
/// bottom with its edges read backwards, so the two calipers stay parallel
/// and on opposite sides.
pub fn max_distance<T: Real, const N1: usize, const N2: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> FarthestPair<T> {
    if p1.is_empty() || p2.is_empty() {
        return FarthestPair {
            length: T::zero(),
            i: 0,
            j: 0,
        };
    }
    let (i1, _) = topmost(p1);
    let (i2, _) = bottommost(p2);
    let mut best = FarthestPair {
        length: distance(&p1[i1], &p2[i2]),
        i: i1,
        j: i2,
    };
    if p1.len() < 2 || p2.len() < 2 {
        return best;
    }

    let mut caliper = Caliper::new(i1, i2).antipodal();
    while caliper.advance(p1, p2).is_some() {
        let (i, j) = (caliper.i1, caliper.i2);
        let d = distance(&p1[i], &p2[j]);
        if d > best.length {
            best = FarthestPair { length: d, i, j };
        }
    }
    best
}
