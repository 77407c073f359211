//! Convex hull of the union of two convex polygons by rotating calipers.
//!
//! The sweep walks both boundaries like the intersection does. One polygon is
//! "active" at a time and contributes the vertices it passes; at every bridge
//! the active polygon emits the bridge endpoint and hands over.

use tracing::trace;

use super::sweep::{bridge, slope, topmost, Advance, Caliper};
use crate::error::Result;
use crate::geom2::{Capacity, Poly, Tag, Tagged};
use crate::scalar::Real;

/// Convex hull of `p1 ∪ p2` with merge-dialect tags (every vertex is a copy).
///
/// Inputs with fewer than three vertices give an empty polygon.
///
/// # Errors
/// `CollinearBridge` for a degenerate co-podal pair, `Overflow` if the output
/// capacity is exceeded (non-convex input).
pub fn merge<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> Result<Tagged<T, M>> {
    let () = Capacity::<N1, N2, M>::CHECK;
    if p1.len() < 3 || p2.len() < 3 {
        return Ok(Tagged::new());
    }

    let (top1, ymax1) = topmost(p1);
    let (top2, ymax2) = topmost(p2);
    let mut out = Tagged::new();

    // true: the current p1 edge is on the hull, false: the current p2 edge is.
    let mut on_first = ymax1 > ymax2;

    // The starting pair may already be a bridge; then the hull starts on
    // whichever side the bridge turns towards.
    if bridge(p1, p2, top1, top2)?.is_some() {
        if on_first {
            let to_bridge = slope(&p1[top1], &p2[top2]);
            if to_bridge < slope(&p1[top1], &p1[p1.inc(top1)]) {
                on_first = false;
            }
        } else {
            let to_bridge = slope(&p2[top2], &p1[top1]);
            if to_bridge < slope(&p2[top2], &p2[p2.inc(top2)]) {
                on_first = true;
            }
        }
    }

    let mut caliper = Caliper::new(top1, top2);
    loop {
        let (prev1, prev2) = (caliper.i1, caliper.i2);
        let Some(step) = caliper.advance(p1, p2) else {
            break;
        };
        match step {
            Advance::First if on_first => out.push(p1[prev1], Tag::first(prev1))?,
            Advance::Second if !on_first => out.push(p2[prev2], Tag::second(prev2))?,
            _ => {}
        }
        let (i1, i2) = (caliper.i1, caliper.i2);
        if bridge(p1, p2, i1, i2)?.is_some() {
            trace!(i1, i2, on_first, "bridge");
            if on_first {
                out.push(p1[i1], Tag::first(i1))?;
            } else {
                out.push(p2[i2], Tag::second(i2))?;
            }
            on_first = !on_first;
        }
    }
    Ok(out)
}
