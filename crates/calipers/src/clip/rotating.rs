//! Convex ∩ convex by rotating calipers, O(n + m).
//!
//! Model
//! - Sweep a direction from −π to π around both polygons at once, starting
//!   from their topmost vertices. Every co-podal pair whose connecting line is
//!   a common tangent (a bridge) sits above exactly one crossing of the two
//!   boundaries; `descend` locates the crossing edges.
//! - No bridge at all means one polygon contains the other.
//! - The output alternates between the two boundaries at each crossing; the
//!   first bridge decides which boundary is traced first.
//!
//! References
//! - Toussaint, "Solving geometric problems with the rotating calipers" (1983).

use tracing::{debug, trace};

use super::sweep::{bridge, descend, topmost, Caliper};
use crate::error::{GeomError, Result};
use crate::geom2::{area, line_from_pp, Capacity, Poly, Tag, Tagged};
use crate::scalar::Real;

/// Intersection of two convex CCW polygons with intersection-dialect tags.
///
/// Disjoint inputs give an empty polygon. Inputs with fewer than three
/// vertices give an empty polygon as well.
///
/// The sweep stalls when an edge of `p1` and an edge of `p2` are exactly
/// parallel, and the result then falls back to the containment answer (the
/// smaller input). Axis-aligned boxes hit this every time; use
/// [`intersect_hodgman`](super::intersect_hodgman) or
/// [`overlap::aabox`](crate::overlap::aabox) for them.
///
/// # Errors
/// `CollinearBridge` for a co-podal pair whose four neighbours are all
/// collinear with it, `Overflow` if the output capacity is exceeded (only for
/// non-convex input).
pub fn intersect_rotating<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> Result<Tagged<T, M>> {
    let () = Capacity::<N1, N2, M>::CHECK;
    if p1.len() < 3 || p2.len() < 3 {
        return Ok(Tagged::new());
    }

    let (top1, _) = topmost(p1);
    let (top2, _) = topmost(p2);
    let mut caliper = Caliper::new(top1, top2);

    // (edge on p1, edge on p2) per crossing, in sweep order.
    let mut crossings = [(0usize, 0usize); M];
    let mut nx = 0;
    let mut trace_first = false;

    while let Some(step) = caliper.advance(p1, p2) {
        let (i1, i2) = (caliper.i1, caliper.i2);
        let Some(reverse) = bridge(p1, p2, i1, i2)? else {
            continue;
        };
        let found = if reverse {
            descend(p1, p2, i1, i2)
        } else {
            descend(p2, p1, i2, i1).map(|(e2, e1)| (e1, e2))
        };
        let Some(edges) = found else {
            debug!(i1, i2, ?step, "no crossing under bridge, polygons are disjoint");
            return Ok(Tagged::new());
        };
        trace!(i1, i2, e1 = edges.0, e2 = edges.1, "crossing");
        if nx == 0 {
            trace_first = !reverse;
        }
        if nx == M {
            return Err(GeomError::Overflow { capacity: M });
        }
        crossings[nx] = edges;
        nx += 1;
    }

    let mut out = Tagged::new();
    if nx == 0 {
        debug!("no bridge found, one polygon contains the other");
        if area(p1) > area(p2) {
            for (i, v) in p2.iter().enumerate() {
                out.push(*v, Tag::second(i))?;
            }
        } else {
            for (i, v) in p1.iter().enumerate() {
                out.push(*v, Tag::first(i))?;
            }
        }
        return Ok(out);
    }

    for k in 0..nx {
        let (e1, e2) = crossings[k];
        let (n1, n2) = crossings[(k + 1) % nx];
        let l1 = line_from_pp(&p1[e1], &p1[p1.inc(e1)]);
        let l2 = line_from_pp(&p2[e2], &p2[p2.inc(e2)]);
        let x = l1.intersect(&l2);
        if trace_first {
            out.push(x, Tag::first(e1))?;
            copy_run(&mut out, p1, e1, n1, Tag::first)?;
        } else {
            out.push(x, Tag::second(e2))?;
            copy_run(&mut out, p2, e2, n2, Tag::second)?;
        }
        trace_first = !trace_first;
    }
    Ok(out)
}

/// Append vertices `from + 1 ..= to` (cyclic) of `p`.
fn copy_run<T: Real, const N: usize, const M: usize>(
    out: &mut Tagged<T, M>,
    p: &Poly<T, N>,
    from: usize,
    to: usize,
    tag: fn(usize) -> Tag,
) -> Result<()> {
    let n = p.len();
    let end = if to >= from { to } else { to + n };
    for j in from + 1..=end {
        let j = j % n;
        out.push(p[j], tag(j))?;
    }
    Ok(())
}
