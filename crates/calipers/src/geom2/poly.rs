//! Fixed-capacity polygons and provenance tags.
//!
//! Purpose
//! - `Poly<T, N>` stores up to `N` vertices inline (no heap), counter-clockwise.
//!   Convexity is a caller contract and is not checked.
//! - `Tag` records where an output vertex of a binary operation came from, so a
//!   backward pass can rebuild the vertex from the inputs alone.
//! - `Tags<M>` is the per-vertex tag buffer that travels with a result.
//!
//! Tag layout
//! - `index << 1 | d` where `d = 1` means "first input", `d = 0` "second input".
//! - Intersections: `index` names an edge by its start vertex. A tag whose `d`
//!   differs from the previous tag's marks the crossing of the previous edge
//!   with this one; an equal `d` marks a copied input vertex.
//! - Merges: `index` names a vertex; every output vertex is a copy.
//! - Seven index bits cap every input at `MAX_TAGGED` vertices.
//!
//! Code cross-refs: `clip::{intersect_rotating, intersect_hodgman, merge}`,
//! `grad::provenance`

use std::ops::{Index, IndexMut};

use super::types::{segment_from_pp, AABox2, Segment2, Vec2, Xywhr};
use crate::error::{GeomError, Result};
use crate::scalar::Real;

/// Largest vertex count an input polygon may have and still be tagged.
pub const MAX_TAGGED: usize = 128;

/// Compile-time guard for binary operations: both inputs taggable and the
/// output able to hold `N1 + N2` vertices.
pub(crate) struct Capacity<const N1: usize, const N2: usize, const M: usize>;

impl<const N1: usize, const N2: usize, const M: usize> Capacity<N1, N2, M> {
    pub(crate) const CHECK: () = assert!(
        N1 <= MAX_TAGGED && N2 <= MAX_TAGGED && M >= N1 + N2,
        "inputs need at most 128 vertices and the output capacity must be at least N1 + N2"
    );
}

/// Convex polygon with at most `N` vertices in counter-clockwise order.
#[derive(Clone, Copy, Debug)]
pub struct Poly<T: Real, const N: usize> {
    verts: [Vec2<T>; N],
    len: usize,
}

impl<T: Real, const N: usize> Poly<T, N> {
    /// Empty polygon.
    #[inline]
    pub fn new() -> Self {
        Self {
            verts: [Vec2::zeros(); N],
            len: 0,
        }
    }

    /// Build from a vertex list.
    ///
    /// # Panics
    /// If `points.len() > N`. Use `try_from_points` for untrusted input.
    pub fn from_points(points: &[Vec2<T>]) -> Self {
        match Self::try_from_points(points) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_from_points(points: &[Vec2<T>]) -> Result<Self> {
        if points.len() > N {
            return Err(GeomError::Capacity {
                capacity: N,
                requested: points.len(),
            });
        }
        let mut p = Self::new();
        p.verts[..points.len()].copy_from_slice(points);
        p.len = points.len();
        Ok(p)
    }

    /// Zeroed polygon with the same vertex count, ready to accumulate gradients.
    #[inline]
    pub fn zeros_like(&self) -> Self {
        Self::zeroed(self.len)
    }

    /// `len` zero vertices (`len` is capped at `N`).
    #[inline]
    pub(crate) fn zeroed(len: usize) -> Self {
        let mut p = Self::new();
        p.len = len.min(N);
        p
    }

    /// Copy into a polygon of another capacity.
    pub fn resize<const K: usize>(&self) -> Result<Poly<T, K>> {
        Poly::try_from_points(self.vertices())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2<T>] {
        &self.verts[..self.len]
    }

    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [Vec2<T>] {
        &mut self.verts[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Vec2<T>> {
        self.vertices().iter()
    }

    pub fn try_push(&mut self, v: Vec2<T>) -> Result<()> {
        if self.len == N {
            return Err(GeomError::Overflow { capacity: N });
        }
        self.verts[self.len] = v;
        self.len += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Index of the vertex after `i` (cyclic).
    #[inline]
    pub fn inc(&self, i: usize) -> usize {
        if i + 1 < self.len {
            i + 1
        } else {
            0
        }
    }

    /// Index of the vertex before `i` (cyclic).
    #[inline]
    pub fn dec(&self, i: usize) -> usize {
        if i > 0 {
            i - 1
        } else {
            self.len - 1
        }
    }

    /// Edge `i`, from vertex `i` to vertex `i + 1`.
    #[inline]
    pub fn edge(&self, i: usize) -> Segment2<T> {
        segment_from_pp(&self[i], &self[self.inc(i)])
    }

    /// Copy shifted by `d`.
    pub fn translate(&self, d: &Vec2<T>) -> Self {
        let mut p = *self;
        for v in p.vertices_mut() {
            *v += d;
        }
        p
    }

    /// Bounding box; the zero box for an empty polygon.
    pub fn aabox(&self) -> AABox2<T> {
        aabox_from_poly(self)
    }

    /// Closed point-in-convex-polygon test (tolerance `T::EPS`).
    pub fn contains(&self, p: &Vec2<T>) -> bool {
        if self.len < 3 {
            return false;
        }
        (0..self.len).all(|i| {
            let a = self[i];
            let b = self[self.inc(i)];
            let e = b - a;
            let q = p - a;
            e.x * q.y - e.y * q.x >= -T::EPS
        })
    }
}

impl<T: Real, const N: usize> Default for Poly<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real, const N: usize> PartialEq for Poly<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices() == other.vertices()
    }
}

impl<T: Real, const N: usize> Index<usize> for Poly<T, N> {
    type Output = Vec2<T>;

    #[inline]
    fn index(&self, i: usize) -> &Vec2<T> {
        &self.vertices()[i]
    }
}

impl<T: Real, const N: usize> IndexMut<usize> for Poly<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Vec2<T> {
        &mut self.vertices_mut()[i]
    }
}

impl<'a, T: Real, const N: usize> IntoIterator for &'a Poly<T, N> {
    type Item = &'a Vec2<T>;
    type IntoIter = std::slice::Iter<'a, Vec2<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Box corners as a polygon: `(min,min), (max,min), (max,max), (min,max)`.
pub fn poly_from_aabox<T: Real>(a: &AABox2<T>) -> Poly<T, 4> {
    Poly::from_points(&[
        Vec2::new(a.min_x, a.min_y),
        Vec2::new(a.max_x, a.min_y),
        Vec2::new(a.max_x, a.max_y),
        Vec2::new(a.min_x, a.max_y),
    ])
}

/// Bounding box of the live vertices.
pub fn aabox_from_poly<T: Real, const N: usize>(p: &Poly<T, N>) -> AABox2<T> {
    let Some(first) = p.vertices().first() else {
        return AABox2::zero();
    };
    let mut b = AABox2::new(first.x, first.x, first.y, first.y);
    for v in &p.vertices()[1..] {
        if v.x < b.min_x {
            b.min_x = v.x;
        }
        if v.x > b.max_x {
            b.max_x = v.x;
        }
        if v.y < b.min_y {
            b.min_y = v.y;
        }
        if v.y > b.max_y {
            b.max_y = v.y;
        }
    }
    b
}

/// Corners of the rotated rectangle, counter-clockwise starting from the
/// corner that is bottom-left before rotation.
pub fn poly_from_xywhr<T: Real>(b: &Xywhr<T>) -> Poly<T, 4> {
    let half = T::lit(0.5);
    let (sin, cos) = (b.r.sin(), b.r.cos());
    let (dxsin, dxcos) = (b.w * sin * half, b.w * cos * half);
    let (dysin, dycos) = (b.h * sin * half, b.h * cos * half);
    Poly::from_points(&[
        Vec2::new(b.x - dxcos + dysin, b.y - dxsin - dycos),
        Vec2::new(b.x + dxcos + dysin, b.y + dxsin - dycos),
        Vec2::new(b.x + dxcos - dysin, b.y + dxsin + dycos),
        Vec2::new(b.x - dxcos - dysin, b.y - dxsin + dycos),
    ])
}

/// Provenance of one output vertex; see the module docs for the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag(u8);

impl Tag {
    /// Element `index` of the first input.
    #[inline]
    pub const fn first(index: usize) -> Self {
        Tag(((index as u8) << 1) | 1)
    }

    /// Element `index` of the second input.
    #[inline]
    pub const fn second(index: usize) -> Self {
        Tag((index as u8) << 1)
    }

    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Tag(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        (self.0 >> 1) as usize
    }

    #[inline]
    pub const fn is_first(self) -> bool {
        self.0 & 1 == 1
    }

    /// True when both tags point into the same input.
    #[inline]
    pub const fn same_source(self, other: Tag) -> bool {
        (self.0 & 1) == (other.0 & 1)
    }
}

/// Fixed-capacity tag buffer, one tag per output vertex.
#[derive(Clone, Copy, Debug)]
pub struct Tags<const M: usize> {
    tags: [Tag; M],
    len: usize,
}

impl<const M: usize> Tags<M> {
    #[inline]
    pub fn new() -> Self {
        Self {
            tags: [Tag::default(); M],
            len: 0,
        }
    }

    pub fn try_from_slice(tags: &[Tag]) -> Result<Self> {
        if tags.len() > M {
            return Err(GeomError::Capacity {
                capacity: M,
                requested: tags.len(),
            });
        }
        let mut t = Self::new();
        t.tags[..tags.len()].copy_from_slice(tags);
        t.len = tags.len();
        Ok(t)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Tag] {
        &self.tags[..self.len]
    }

    pub fn try_push(&mut self, tag: Tag) -> Result<()> {
        if self.len == M {
            return Err(GeomError::Overflow { capacity: M });
        }
        self.tags[self.len] = tag;
        self.len += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const M: usize> Default for Tags<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> PartialEq for Tags<M> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const M: usize> Index<usize> for Tags<M> {
    type Output = Tag;

    #[inline]
    fn index(&self, i: usize) -> &Tag {
        &self.as_slice()[i]
    }
}

/// Output polygon of a binary operation with its per-vertex provenance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tagged<T: Real, const M: usize> {
    pub poly: Poly<T, M>,
    pub tags: Tags<M>,
}

impl<T: Real, const M: usize> Tagged<T, M> {
    #[inline]
    pub fn new() -> Self {
        Self {
            poly: Poly::new(),
            tags: Tags::new(),
        }
    }

    /// Append a vertex and its tag in lockstep.
    #[inline]
    pub(crate) fn push(&mut self, v: Vec2<T>, tag: Tag) -> Result<()> {
        self.poly.try_push(v)?;
        self.tags.try_push(tag)
    }

    pub(crate) fn clear(&mut self) {
        self.poly.clear();
        self.tags.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.poly.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.poly.is_empty()
    }
}

impl<T: Real, const M: usize> Default for Tagged<T, M> {
    fn default() -> Self {
        Self::new()
    }
}
