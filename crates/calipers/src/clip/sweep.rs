//! Rotating-caliper building blocks shared by intersection, merge and
//! farthest-pair search.
//!
//! - `topmost` / `bottommost`: sweep start vertices.
//! - `slope`: edge angle in (−π, π], biased so that −x reads as −π.
//! - `Caliper`: the co-podal pair walker; each step rotates onto whichever
//!   polygon's next edge has the smaller slope still ahead of the sweep angle.
//! - `bridge`: is the line through a co-podal pair a common tangent?
//! - `descend`: walk down from a bridge to the pair of crossing edges.

use crate::error::{GeomError, Result};
use crate::geom2::measure::cross;
use crate::geom2::{Poly, Vec2};
use crate::scalar::Real;

/// First vertex with the largest `y`, and that `y`.
pub(crate) fn topmost<T: Real, const N: usize>(p: &Poly<T, N>) -> (usize, T) {
    let mut idx = 0;
    let mut ey = p[0].y;
    for i in 1..p.len() {
        if p[i].y > ey {
            ey = p[i].y;
            idx = i;
        }
    }
    (idx, ey)
}

/// First vertex with the smallest `y`, and that `y`.
pub(crate) fn bottommost<T: Real, const N: usize>(p: &Poly<T, N>) -> (usize, T) {
    let mut idx = 0;
    let mut ey = p[0].y;
    for i in 1..p.len() {
        if p[i].y < ey {
            ey = p[i].y;
            idx = i;
        }
    }
    (idx, ey)
}

/// Angle of `a → b`.
#[inline]
pub(crate) fn slope<T: Real>(a: &Vec2<T>, b: &Vec2<T>) -> T {
    (b.y - a.y - T::EPS).atan2(b.x - a.x)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    First,
    Second,
}

/// Co-podal pair walker over two convex polygons.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Caliper<T> {
    pub i1: usize,
    pub i2: usize,
    angle: T,
    second_reversed: bool,
}

impl<T: Real> Caliper<T> {
    /// Start at `(i1, i2)` with the sweep angle at −π.
    pub(crate) fn new(i1: usize, i2: usize) -> Self {
        Self {
            i1,
            i2,
            angle: -T::pi(),
            second_reversed: false,
        }
    }

    /// Read the second polygon's edges backwards (antipodal walk).
    pub(crate) fn antipodal(mut self) -> Self {
        self.second_reversed = true;
        self
    }

    /// Rotate onto the next edge. `None` once neither edge angle lies ahead.
    pub(crate) fn advance<const N1: usize, const N2: usize>(
        &mut self,
        p1: &Poly<T, N1>,
        p2: &Poly<T, N2>,
    ) -> Option<Advance> {
        let a1 = slope(&p1[self.i1], &p1[p1.inc(self.i1)]);
        let a2 = if self.second_reversed {
            slope(&p2[p2.inc(self.i2)], &p2[self.i2])
        } else {
            slope(&p2[self.i2], &p2[p2.inc(self.i2)])
        };
        let e = self.angle;
        if e < a1 && (a1 < a2 || a2 < e) {
            self.i1 = p1.inc(self.i1);
            self.angle = a1;
            Some(Advance::First)
        } else if e < a2 && (a2 < a1 || a1 < e) {
            self.i2 = p2.inc(self.i2);
            self.angle = a2;
            Some(Advance::Second)
        } else {
            None
        }
    }
}

/// Test the line `p1[i1] → p2[i2]` for being a common tangent.
///
/// Returns `Some(reverse)` for a bridge, where `reverse` means both polygons
/// lie to its right, and `None` when the neighbours straddle the line.
pub(crate) fn bridge<T: Real, const N1: usize, const N2: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    i1: usize,
    i2: usize,
) -> Result<Option<bool>> {
    let (a, b) = (&p1[i1], &p2[i2]);
    let sides = [
        cross(a, b, &p1[p1.dec(i1)]),
        cross(a, b, &p1[p1.inc(i1)]),
        cross(a, b, &p2[p2.dec(i2)]),
        cross(a, b, &p2[p2.inc(i2)]),
    ];
    let mut reverse = None;
    for d in sides {
        if d.abs() > T::EPS {
            let right = d < T::zero();
            match reverse {
                None => reverse = Some(right),
                Some(r) if r != right => return Ok(None),
                Some(_) => {}
            }
        }
    }
    match reverse {
        Some(r) => Ok(Some(r)),
        None => Err(GeomError::CollinearBridge {
            first: i1,
            second: i2,
        }),
    }
}

/// From a bridge `pa[ia] → pb[ib]` with both polygons on its right, walk
/// `pa` clockwise and `pb` counter-clockwise until the edge pair that crosses
/// under the bridge is found.
///
/// Returns the edge indices `(ea, eb)`, or `None` when the walk starts
/// climbing again, i.e. the polygons are disjoint.
pub(crate) fn descend<T: Real, const A: usize, const B: usize>(
    pa: &Poly<T, A>,
    pb: &Poly<T, B>,
    ia: usize,
    ib: usize,
) -> Option<(usize, usize)> {
    let (mut i1, mut i2) = (ia, ib);
    for _ in 0..2 * (pa.len() + pb.len()) {
        let mut moved = false;

        // down along pb
        let (a0, a1) = (pa[pa.dec(i1)], pa[i1]);
        let mut last: Option<T> = None;
        let mut steps = 0;
        loop {
            let d = cross(&a0, &a1, &pb[pb.inc(i2)]);
            if last.is_some_and(|l| d < l) {
                return None;
            }
            if d > -T::EPS {
                break;
            }
            steps += 1;
            if steps > pb.len() {
                return None;
            }
            i2 = pb.inc(i2);
            last = Some(d);
            moved = true;
        }

        // down along pa
        let (b0, b1) = (pb[i2], pb[pb.inc(i2)]);
        let mut last: Option<T> = None;
        let mut steps = 0;
        loop {
            let d = cross(&b0, &b1, &pa[pa.dec(i1)]);
            if last.is_some_and(|l| d < l) {
                return None;
            }
            if d > -T::EPS {
                break;
            }
            steps += 1;
            if steps > pa.len() {
                return None;
            }
            i1 = pa.dec(i1);
            last = Some(d);
            moved = true;
        }

        if !moved {
            return Some((pa.dec(i1), i2));
        }
    }
    None
}
