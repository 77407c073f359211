//! Backward passes of intersection and merge driven by provenance tags.
//!
//! The forward operations save one `Tag` per output vertex. From the inputs
//! and those tags alone this module rebuilds the output polygon and routes an
//! output gradient back onto the input vertices: copied vertices pass their
//! gradient through unchanged, crossings go through `intersect_lines_grad`
//! and then `line_from_pp_grad` for both edges.

use super::primitives::{intersect_lines_grad, line_from_pp_grad};
use crate::geom2::{line_from_pp, Line2, Poly, Tag, Tags, Vec2};
use crate::scalar::Real;

/// Where an intersection vertex comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Copy(Tag),
    /// Crossing of the edge `prev` (ending here) with the edge `next` (starting here).
    Cross { prev: Tag, next: Tag },
}

fn origin(tags: &[Tag], i: usize) -> Origin {
    let n = tags.len();
    let cur = tags[i];
    let prev = tags[(i + n - 1) % n];
    if cur.same_source(prev) {
        Origin::Copy(cur)
    } else {
        Origin::Cross { prev, next: cur }
    }
}

pub(crate) fn vertex<T: Real, const N1: usize, const N2: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    tag: Tag,
) -> Vec2<T> {
    if tag.is_first() {
        p1[tag.index()]
    } else {
        p2[tag.index()]
    }
}

fn edge_line<T: Real, const N1: usize, const N2: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    tag: Tag,
) -> Line2<T> {
    let i = tag.index();
    if tag.is_first() {
        line_from_pp(&p1[i], &p1[p1.inc(i)])
    } else {
        line_from_pp(&p2[i], &p2[p2.inc(i)])
    }
}

pub(crate) fn add_vertex_grad<T: Real, const N1: usize, const N2: usize>(
    tag: Tag,
    g: &Vec2<T>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    if tag.is_first() {
        g1[tag.index()] += g;
    } else {
        g2[tag.index()] += g;
    }
}

fn edge_grad_on<T: Real, const N: usize>(
    p: &Poly<T, N>,
    i: usize,
    gl: &Line2<T>,
    gp: &mut Poly<T, N>,
) {
    let j = p.inc(i);
    let (mut ga, mut gb) = (Vec2::zeros(), Vec2::zeros());
    line_from_pp_grad(&p[i], &p[j], gl, &mut ga, &mut gb);
    gp[i] += ga;
    gp[j] += gb;
}

fn add_edge_grad<T: Real, const N1: usize, const N2: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    tag: Tag,
    gl: &Line2<T>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    if tag.is_first() {
        edge_grad_on(p1, tag.index(), gl, g1);
    } else {
        edge_grad_on(p2, tag.index(), gl, g2);
    }
}

/// Rebuild an intersection from its inputs and intersection-dialect tags.
pub fn reconstruct_intersection<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    tags: &Tags<M>,
) -> Poly<T, M> {
    let tags = tags.as_slice();
    let mut out = Poly::zeroed(tags.len());
    for i in 0..tags.len() {
        out[i] = match origin(tags, i) {
            Origin::Copy(t) => vertex(p1, p2, t),
            Origin::Cross { prev, next } => {
                edge_line(p1, p2, prev).intersect(&edge_line(p1, p2, next))
            }
        };
    }
    out
}

/// Rebuild a merged hull from its inputs and merge-dialect tags.
pub fn reconstruct_hull<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    tags: &Tags<M>,
) -> Poly<T, M> {
    let tags = tags.as_slice();
    let mut out = Poly::zeroed(tags.len());
    for (v, &t) in out.vertices_mut().iter_mut().zip(tags) {
        *v = vertex(p1, p2, t);
    }
    out
}

/// Route the gradient of an intersection polygon back to both inputs.
///
/// `grad` holds one gradient per output vertex (same order as `tags`).
/// Adds into `g1` and `g2`, which must be sized like `p1` and `p2`.
pub fn intersect_grad<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    grad: &Poly<T, M>,
    tags: &Tags<M>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    let tags = tags.as_slice();
    for (i, gv) in grad.iter().enumerate().take(tags.len()) {
        match origin(tags, i) {
            Origin::Copy(t) => add_vertex_grad(t, gv, g1, g2),
            Origin::Cross { prev, next } => {
                let l_next = edge_line(p1, p2, next);
                let l_prev = edge_line(p1, p2, prev);
                let (mut gl_next, mut gl_prev) = (Line2::zero(), Line2::zero());
                intersect_lines_grad(&l_next, &l_prev, gv, &mut gl_next, &mut gl_prev);
                add_edge_grad(p1, p2, next, &gl_next, g1, g2);
                add_edge_grad(p1, p2, prev, &gl_prev, g1, g2);
            }
        }
    }
}

/// Route the gradient of a merged hull back to both inputs.
pub fn merge_grad<T: Real, const N1: usize, const N2: usize, const M: usize>(
    grad: &Poly<T, M>,
    tags: &Tags<M>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    for (gv, &t) in grad.iter().zip(tags.as_slice()) {
        add_vertex_grad(t, gv, g1, g2);
    }
}
