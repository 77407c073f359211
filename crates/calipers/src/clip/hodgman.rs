//! Convex ∩ convex by successive half-plane clipping (Sutherland–Hodgman), O(n·m).
//!
//! The first polygon is clipped by the supporting line of every edge of the
//! second. Tags ride along with the vertices through every pass, so the final
//! tags use the same intersection dialect as the rotating-caliper version.

use crate::error::Result;
use crate::geom2::{distance_line, line_from_pp, Capacity, Poly, Tag, Tagged};
use crate::scalar::Real;

/// Intersection of two convex CCW polygons with intersection-dialect tags.
///
/// Inputs with fewer than three vertices give an empty polygon.
///
/// # Errors
/// `Overflow` if a pass produces more than `M` vertices (non-convex input).
pub fn intersect_hodgman<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> Result<Tagged<T, M>> {
    let () = Capacity::<N1, N2, M>::CHECK;
    if p1.len() < 3 || p2.len() < 3 {
        return Ok(Tagged::new());
    }

    // double buffer: `cut` is the current polygon, `cur` receives the next pass
    let mut cut = Tagged::<T, M>::new();
    let mut cur = Tagged::<T, M>::new();
    for (i, v) in p1.iter().enumerate() {
        cut.push(*v, Tag::first(i))?;
    }

    let mut signs = [T::zero(); M];
    for j in 0..p2.len() {
        let edge = line_from_pp(&p2[j], &p2[p2.inc(j)]);
        let n = cut.len();
        for (s, v) in signs.iter_mut().zip(cut.poly.iter()) {
            *s = distance_line(&edge, v);
        }

        for i in 0..n {
            let inext = cut.poly.inc(i);
            if signs[i] < T::EPS {
                cur.push(cut.poly[i], cut.tags[i])?;
            }
            if signs[i] * signs[inext] < -T::EPS {
                let side = line_from_pp(&cut.poly[i], &cut.poly[inext]);
                let tag = if signs[i] < -T::EPS {
                    Tag::second(j)
                } else {
                    cut.tags[i]
                };
                cur.push(edge.intersect(&side), tag)?;
            }
        }
        std::mem::swap(&mut cut, &mut cur);
        cur.clear();
    }
    Ok(cut)
}
