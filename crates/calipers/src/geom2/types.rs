//! Primitive 2D types: directional lines, segments, axis-aligned boxes and
//! rotated-box parameters.
//!
//! - `Line2`: `a·x + b·y + c = 0`, oriented; built from two points it points
//!   from the first to the second, and the left half-plane has negative value.
//! - `Segment2`: two endpoints.
//! - `AABox2`: axis-aligned box, contract `max ≥ min` on both axes.
//! - `Xywhr`: center, extent and rotation of a rotated rectangle.
//!
//! Code cross-refs: `Poly`, `measure::distance_*`, `grad::primitives`

use crate::scalar::Real;
use nalgebra::Vector2;

pub type Vec2<T> = Vector2<T>;

/// Directional line `a·x + b·y + c = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2<T> {
    pub a: T,
    pub b: T,
    pub c: T,
}

impl<T: Real> Line2<T> {
    #[inline]
    pub fn new(a: T, b: T, c: T) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Unnormalized value `a·x + b·y + c`; negative on the left of the direction.
    #[inline]
    pub fn eval(&self, p: &Vec2<T>) -> T {
        self.a * p.x + self.b * p.y + self.c
    }

    /// Intersection point with `other` (undefined for parallel lines).
    #[inline]
    pub fn intersect(&self, other: &Line2<T>) -> Vec2<T> {
        intersect_lines(self, other)
    }
}

impl<T: Real> Default for Line2<T> {
    fn default() -> Self {
        Self::zero()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment2<T: Real> {
    pub p1: Vec2<T>,
    pub p2: Vec2<T>,
}

impl<T: Real> Segment2<T> {
    #[inline]
    pub fn new(p1: Vec2<T>, p2: Vec2<T>) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(Vec2::zeros(), Vec2::zeros())
    }

    #[inline]
    pub fn length(&self) -> T {
        (self.p2 - self.p1).norm()
    }
}

impl<T: Real> Default for Segment2<T> {
    fn default() -> Self {
        Self::zero()
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABox2<T> {
    pub min_x: T,
    pub max_x: T,
    pub min_y: T,
    pub max_y: T,
}

impl<T: Real> AABox2<T> {
    #[inline]
    pub fn new(min_x: T, max_x: T, min_y: T, max_y: T) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// The all-zero box; doubles as the empty intersection and as a zeroed
    /// gradient accumulator.
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::zero())
    }

    #[inline]
    pub fn width(&self) -> T {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> T {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn area(&self) -> T {
        self.width() * self.height()
    }

    /// Length of the diagonal.
    #[inline]
    pub fn dimension(&self) -> T {
        self.width().hypot(self.height())
    }

    #[inline]
    pub fn center(&self) -> Vec2<T> {
        let half = T::lit(0.5);
        Vec2::new(
            (self.max_x + self.min_x) * half,
            (self.max_y + self.min_y) * half,
        )
    }

    /// Same as `center` for a box.
    #[inline]
    pub fn centroid(&self) -> Vec2<T> {
        self.center()
    }

    /// Overlap of two boxes; the zero box when they do not overlap with
    /// positive area.
    pub fn intersect(&self, other: &AABox2<T>) -> AABox2<T> {
        if !self.intersects(other) {
            return AABox2::zero();
        }
        AABox2::new(
            max(self.min_x, other.min_x),
            min(self.max_x, other.max_x),
            max(self.min_y, other.min_y),
            min(self.max_y, other.max_y),
        )
    }

    /// Smallest box containing both.
    pub fn merge(&self, other: &AABox2<T>) -> AABox2<T> {
        AABox2::new(
            min(self.min_x, other.min_x),
            max(self.max_x, other.max_x),
            min(self.min_y, other.min_y),
            max(self.max_y, other.max_y),
        )
    }

    /// True when the boxes share positive area (touching boxes do not).
    #[inline]
    pub fn intersects(&self, other: &AABox2<T>) -> bool {
        !(self.max_x <= other.min_x
            || self.min_x >= other.max_x
            || self.max_y <= other.min_y
            || self.min_y >= other.max_y)
    }

    /// Closed containment test for a point.
    #[inline]
    pub fn contains(&self, p: &Vec2<T>) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    pub fn contains_box(&self, other: &AABox2<T>) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Farthest distance between any two points of the two boxes.
    #[inline]
    pub fn max_distance(&self, other: &AABox2<T>) -> T {
        self.merge(other).dimension()
    }
}

impl<T: Real> Default for AABox2<T> {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotated rectangle given by center `(x, y)`, width `w`, height `h` and
/// counter-clockwise rotation `r` in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Xywhr<T> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
    pub r: T,
}

impl<T: Real> Xywhr<T> {
    #[inline]
    pub fn new(x: T, y: T, w: T, h: T, r: T) -> Self {
        Self { x, y, w, h, r }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::zero(), T::zero())
    }

    #[inline]
    pub fn as_array(&self) -> [T; 5] {
        [self.x, self.y, self.w, self.h, self.r]
    }

    #[inline]
    pub fn from_array(v: [T; 5]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4])
    }
}

impl<T: Real> Default for Xywhr<T> {
    fn default() -> Self {
        Self::zero()
    }
}

#[inline]
pub(crate) fn max<T: Real>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

#[inline]
pub(crate) fn min<T: Real>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// Line through `p1` then `p2`: `a = y2−y1`, `b = x1−x2`, `c = x2·y1 − x1·y2`.
#[inline]
pub fn line_from_pp<T: Real>(p1: &Vec2<T>, p2: &Vec2<T>) -> Line2<T> {
    Line2::new(p2.y - p1.y, p1.x - p2.x, p2.x * p1.y - p1.x * p2.y)
}

#[inline]
pub fn segment_from_pp<T: Real>(p1: &Vec2<T>, p2: &Vec2<T>) -> Segment2<T> {
    Segment2::new(*p1, *p2)
}

#[inline]
pub fn line_from_segment<T: Real>(s: &Segment2<T>) -> Line2<T> {
    line_from_pp(&s.p1, &s.p2)
}

/// Crossing point of two lines. Parallel lines divide by zero.
#[inline]
pub fn intersect_lines<T: Real>(l1: &Line2<T>, l2: &Line2<T>) -> Vec2<T> {
    let w = l1.a * l2.b - l2.a * l1.b;
    Vec2::new(
        (l1.b * l2.c - l2.b * l1.c) / w,
        (l1.c * l2.a - l2.c * l1.a) / w,
    )
}

/// Point on `l` at parameter `t`.
///
/// The parametrisation runs along `(b, −a)`, i.e. against the direction the
/// line was built with; the origin of the parameter is the point with `x = 1`
/// (or `y = 1` for vertical lines).
pub fn point_from_t<T: Real>(l: &Line2<T>, t: T) -> Vec2<T> {
    let one = T::one();
    if l.b == T::zero() {
        Vec2::new(-l.c / l.a, one - t * l.a)
    } else {
        Vec2::new(one + t * l.b, -(l.a + l.c) / l.b - t * l.a)
    }
}

/// Parameter of the orthogonal projection of `p` onto `l` (inverse of `point_from_t`).
pub fn t_from_point<T: Real>(l: &Line2<T>, p: &Vec2<T>) -> T {
    let one = T::one();
    if l.b == T::zero() {
        (one - p.y) / l.a
    } else if l.a == T::zero() {
        (p.x - one) / l.b
    } else {
        (l.b * p.x - l.a * p.y - l.a * (l.a + l.c) / l.b - l.b) / (l.a * l.a + l.b * l.b)
    }
}
