//! Scalar measures of polygons and primitives.
//!
//! - `area`: signed shoelace area (CCW positive, zero below three vertices).
//! - `dimension`: diameter by rotating calipers, reporting the farthest pair.
//! - `center` (bounding-box center) and `centroid` (vertex mean).
//! - Signed distances point↔line, point↔segment and point↔polygon.
//!
//! Sign conventions
//! - Line and segment distances are negative on the left of the direction
//!   (the opposite of `cross`).
//! - Polygon distance is positive inside a CCW polygon.

use super::poly::{aabox_from_poly, Poly};
use super::types::{line_from_segment, segment_from_pp, t_from_point, Line2, Segment2, Vec2};
use crate::scalar::Real;

/// `(p2 − p1) × (t − p2)`: positive when `t` lies to the left of `p1 → p2`.
#[inline]
pub(crate) fn cross<T: Real>(p1: &Vec2<T>, p2: &Vec2<T>, t: &Vec2<T>) -> T {
    (p2.x - p1.x) * (t.y - p2.y) - (p2.y - p1.y) * (t.x - p2.x)
}

/// Signed area; positive for counter-clockwise vertex order.
pub fn area<T: Real, const N: usize>(p: &Poly<T, N>) -> T {
    let n = p.len();
    if n <= 2 {
        return T::zero();
    }
    let mut sum = p[n - 1].x * p[0].y - p[n - 1].y * p[0].x;
    for i in 1..n {
        sum += p[i - 1].x * p[i].y - p[i].x * p[i - 1].y;
    }
    sum * T::lit(0.5)
}

/// Diameter of a polygon and the vertex pair that realises it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diameter<T> {
    pub length: T,
    pub i: usize,
    pub j: usize,
}

/// Diameter by rotating calipers.
///
/// For every edge the antipodal vertex is advanced while the cross product
/// does not decrease; each advance is bounded by the vertex count so that
/// degenerate (collinear or repeated) vertices cannot stall the scan.
pub fn dimension<T: Real, const N: usize>(p: &Poly<T, N>) -> Diameter<T> {
    let n = p.len();
    if n <= 1 {
        return Diameter {
            length: T::zero(),
            i: 0,
            j: 0,
        };
    }
    if n == 2 {
        return Diameter {
            length: distance(&p[0], &p[1]),
            i: 0,
            j: 1,
        };
    }

    let mut best = Diameter {
        length: T::zero(),
        i: 0,
        j: 0,
    };
    let (mut v, mut vnext) = (1, 2);
    for u in 0..n {
        let unext = p.inc(u);
        let mut steps = 0;
        while steps < n && cross(&p[u], &p[unext], &p[v]) <= cross(&p[u], &p[unext], &p[vnext]) {
            v = vnext;
            vnext = p.inc(v);
            steps += 1;
        }
        for cand in [u, unext] {
            let d = distance(&p[cand], &p[v]);
            if d > best.length {
                best = Diameter {
                    length: d,
                    i: cand,
                    j: v,
                };
            }
        }
    }
    best
}

/// Center of the bounding box.
pub fn center<T: Real, const N: usize>(p: &Poly<T, N>) -> Vec2<T> {
    aabox_from_poly(p).center()
}

/// Mean of the vertices (not the area centroid).
pub fn centroid<T: Real, const N: usize>(p: &Poly<T, N>) -> Vec2<T> {
    let mut c = Vec2::zeros();
    if p.is_empty() {
        return c;
    }
    for v in p {
        c += v;
    }
    c / T::lit(p.len() as f64)
}

#[inline]
pub fn distance<T: Real>(p1: &Vec2<T>, p2: &Vec2<T>) -> T {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Signed distance from `p` to the line; negative on the left.
#[inline]
pub fn distance_line<T: Real>(l: &Line2<T>, p: &Vec2<T>) -> T {
    l.eval(p) / l.a.hypot(l.b)
}

/// Which part of a segment is nearest to a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Nearest {
    Start,
    End,
    Interior,
}

pub(crate) fn nearest_on_segment<T: Real>(s: &Segment2<T>, p: &Vec2<T>) -> Nearest {
    let l = line_from_segment(s);
    let t = t_from_point(&l, p);
    // The parameter grows from p2 towards p1.
    if t < t_from_point(&l, &s.p2) {
        Nearest::End
    } else if t > t_from_point(&l, &s.p1) {
        Nearest::Start
    } else {
        Nearest::Interior
    }
}

/// Signed distance from `p` to the segment, with the sign of the supporting line.
pub fn distance_segment<T: Real>(s: &Segment2<T>, p: &Vec2<T>) -> T {
    let l = line_from_segment(s);
    let sign = l.eval(p);
    let signed = |d: T| if sign > T::zero() { d } else { -d };
    match nearest_on_segment(s, p) {
        Nearest::End => signed(distance(p, &s.p2)),
        Nearest::Start => signed(distance(p, &s.p1)),
        Nearest::Interior => sign / l.a.hypot(l.b),
    }
}

/// Signed distance to a CCW polygon (positive inside) and the index of the
/// nearest edge.
///
/// Edges are scanned starting with the closing edge `n−1 → 0`, then `0 → 1`
/// onwards; the first edge reaching the minimum absolute distance wins.
pub fn distance_poly<T: Real, const N: usize>(poly: &Poly<T, N>, p: &Vec2<T>) -> (T, usize) {
    let n = poly.len();
    if n == 0 {
        return (T::zero(), 0);
    }
    let mut idx = n - 1;
    let mut dmin = -distance_segment(&segment_from_pp(&poly[n - 1], &poly[0]), p);
    for i in 1..n {
        let d = -distance_segment(&segment_from_pp(&poly[i - 1], &poly[i]), p);
        if d.abs() < dmin.abs() {
            dmin = d;
            idx = i - 1;
        }
    }
    (dmin, idx)
}
