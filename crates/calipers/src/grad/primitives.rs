//! Closed-form vector-Jacobian products of the primitive constructors and
//! measures.
//!
//! Every function adds into its output accumulators (`+=`); callers start
//! from zeroed accumulators (`Poly::zeros_like`, `AABox2::zero`, ...), sized
//! like the corresponding input.

use crate::geom2::measure::{nearest_on_segment, Nearest};
use crate::geom2::{line_from_segment, AABox2, Line2, Poly, Segment2, Vec2, Xywhr};
use crate::scalar::Real;

#[inline]
fn max_grad<T: Real>(a: T, b: T, g: T, ga: &mut T, gb: &mut T) {
    if a > b {
        *ga += g;
    } else {
        *gb += g;
    }
}

#[inline]
fn min_grad<T: Real>(a: T, b: T, g: T, ga: &mut T, gb: &mut T) {
    if a < b {
        *ga += g;
    } else {
        *gb += g;
    }
}

// ---------- constructors ----------

/// Backward of `line_from_pp`.
pub fn line_from_pp_grad<T: Real>(
    p1: &Vec2<T>,
    p2: &Vec2<T>,
    grad: &Line2<T>,
    g1: &mut Vec2<T>,
    g2: &mut Vec2<T>,
) {
    g1.x += grad.b - p2.y * grad.c;
    g2.x += -grad.b + p1.y * grad.c;
    g1.y += -grad.a + p2.x * grad.c;
    g2.y += grad.a - p1.x * grad.c;
}

/// Backward of `segment_from_pp`.
pub fn segment_from_pp_grad<T: Real>(grad: &Segment2<T>, g1: &mut Vec2<T>, g2: &mut Vec2<T>) {
    *g1 += grad.p1;
    *g2 += grad.p2;
}

/// Backward of `line_from_segment`.
pub fn line_from_segment_grad<T: Real>(s: &Segment2<T>, grad: &Line2<T>, gs: &mut Segment2<T>) {
    line_from_pp_grad(&s.p1, &s.p2, grad, &mut gs.p1, &mut gs.p2);
}

/// Backward of `poly_from_aabox`.
pub fn poly_from_aabox_grad<T: Real>(grad: &Poly<T, 4>, ga: &mut AABox2<T>) {
    debug_assert_eq!(grad.len(), 4);
    ga.min_x += grad[0].x + grad[3].x;
    ga.max_x += grad[1].x + grad[2].x;
    ga.min_y += grad[0].y + grad[1].y;
    ga.max_y += grad[2].y + grad[3].y;
}

/// Backward of `aabox_from_poly`: each bound flows to the first vertex
/// attaining it.
pub fn aabox_from_poly_grad<T: Real, const N: usize>(
    p: &Poly<T, N>,
    grad: &AABox2<T>,
    gp: &mut Poly<T, N>,
) {
    if p.is_empty() {
        return;
    }
    let (mut imin_x, mut imax_x, mut imin_y, mut imax_y) = (0, 0, 0, 0);
    for i in 1..p.len() {
        if p[i].x > p[imax_x].x {
            imax_x = i;
        }
        if p[i].x < p[imin_x].x {
            imin_x = i;
        }
        if p[i].y > p[imax_y].y {
            imax_y = i;
        }
        if p[i].y < p[imin_y].y {
            imin_y = i;
        }
    }
    gp[imax_x].x += grad.max_x;
    gp[imin_x].x += grad.min_x;
    gp[imax_y].y += grad.max_y;
    gp[imin_y].y += grad.min_y;
}

/// Backward of `poly_from_xywhr`.
pub fn poly_from_xywhr_grad<T: Real>(b: &Xywhr<T>, grad: &Poly<T, 4>, gb: &mut Xywhr<T>) {
    debug_assert_eq!(grad.len(), 4);
    let g = grad.vertices();
    let half = T::lit(0.5);
    let (sin, cos) = (b.r.sin(), b.r.cos());

    gb.x += g[0].x + g[1].x + g[2].x + g[3].x;
    gb.y += g[0].y + g[1].y + g[2].y + g[3].y;

    let dxsin = -g[0].y + g[1].y + g[2].y - g[3].y;
    let dxcos = -g[0].x + g[1].x + g[2].x - g[3].x;
    let dysin = g[0].x + g[1].x - g[2].x - g[3].x;
    let dycos = -g[0].y - g[1].y + g[2].y + g[3].y;

    gb.w += (dxsin * sin + dxcos * cos) * half;
    gb.h += (dysin * sin + dycos * cos) * half;
    gb.r += (dxsin * b.w * cos - dxcos * b.w * sin + dysin * b.h * cos - dycos * b.h * sin) * half;
}

// ---------- distances ----------

/// Backward of `distance` between two points. Undefined for coincident points.
pub fn distance_grad<T: Real>(
    p1: &Vec2<T>,
    p2: &Vec2<T>,
    grad: T,
    g1: &mut Vec2<T>,
    g2: &mut Vec2<T>,
) {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    let d = dx.hypot(dy);
    g1.x += grad * dx / d;
    g2.x -= grad * dx / d;
    g1.y += grad * dy / d;
    g2.y -= grad * dy / d;
}

/// Backward of `distance_line`.
///
/// With `s = a·x + b·y + c` and `h = √(a² + b²)` the distance is `s / h`, so
/// `∂/∂a = x/h − s·a/h³`, `∂/∂b = y/h − s·b/h³`, `∂/∂c = 1/h`.
pub fn distance_line_grad<T: Real>(
    l: &Line2<T>,
    p: &Vec2<T>,
    grad: T,
    gl: &mut Line2<T>,
    gp: &mut Vec2<T>,
) {
    let h = l.a.hypot(l.b);
    let h3 = h * h * h;
    let s = l.eval(p);
    gp.x += grad * l.a / h;
    gp.y += grad * l.b / h;
    gl.a += grad * (p.x / h - s * l.a / h3);
    gl.b += grad * (p.y / h - s * l.b / h3);
    gl.c += grad / h;
}

/// Backward of `distance_segment`.
pub fn distance_segment_grad<T: Real>(
    s: &Segment2<T>,
    p: &Vec2<T>,
    grad: T,
    gs: &mut Segment2<T>,
    gp: &mut Vec2<T>,
) {
    let l = line_from_segment(s);
    let g = if l.eval(p) > T::zero() { grad } else { -grad };
    match nearest_on_segment(s, p) {
        Nearest::End => distance_grad(p, &s.p2, g, gp, &mut gs.p2),
        Nearest::Start => distance_grad(p, &s.p1, g, gp, &mut gs.p1),
        Nearest::Interior => {
            let mut gl = Line2::zero();
            distance_line_grad(&l, p, grad, &mut gl, gp);
            line_from_segment_grad(s, &gl, gs);
        }
    }
}

/// Backward of `distance_poly`, given the nearest edge it reported.
pub fn distance_poly_grad<T: Real, const N: usize>(
    poly: &Poly<T, N>,
    p: &Vec2<T>,
    grad: T,
    edge: usize,
    gpoly: &mut Poly<T, N>,
    gp: &mut Vec2<T>,
) {
    let next = poly.inc(edge);
    let s = poly.edge(edge);
    let mut gs = Segment2::zero();
    distance_segment_grad(&s, p, -grad, &mut gs, gp);
    gpoly[edge] += gs.p1;
    gpoly[next] += gs.p2;
}

// ---------- measures ----------

/// Backward of `area`.
pub fn area_grad<T: Real, const N: usize>(p: &Poly<T, N>, grad: T, gp: &mut Poly<T, N>) {
    let n = p.len();
    if n <= 2 {
        return;
    }
    let h = grad * T::lit(0.5);
    for i in 0..n {
        let prev = p.dec(i);
        let next = p.inc(i);
        gp[i].x += h * (p[next].y - p[prev].y);
        gp[i].y += h * (p[prev].x - p[next].x);
    }
}

pub fn aabox_area_grad<T: Real>(a: &AABox2<T>, grad: T, ga: &mut AABox2<T>) {
    let lx = a.width();
    let ly = a.height();
    ga.max_x += grad * ly;
    ga.min_x -= grad * ly;
    ga.max_y += grad * lx;
    ga.min_y -= grad * lx;
}

/// Backward of `dimension`, given the vertex pair it reported.
pub fn dimension_grad<T: Real, const N: usize>(
    p: &Poly<T, N>,
    grad: T,
    i: usize,
    j: usize,
    gp: &mut Poly<T, N>,
) {
    if i == j {
        return;
    }
    let (mut gi, mut gj) = (Vec2::zeros(), Vec2::zeros());
    distance_grad(&p[i], &p[j], grad, &mut gi, &mut gj);
    gp[i] += gi;
    gp[j] += gj;
}

pub fn aabox_dimension_grad<T: Real>(a: &AABox2<T>, grad: T, ga: &mut AABox2<T>) {
    let (dx, dy) = (a.width(), a.height());
    let d = dx.hypot(dy);
    ga.max_x += grad * dx / d;
    ga.min_x -= grad * dx / d;
    ga.max_y += grad * dy / d;
    ga.min_y -= grad * dy / d;
}

pub fn aabox_center_grad<T: Real>(grad: &Vec2<T>, ga: &mut AABox2<T>) {
    let half = T::lit(0.5);
    ga.max_x += grad.x * half;
    ga.min_x += grad.x * half;
    ga.max_y += grad.y * half;
    ga.min_y += grad.y * half;
}

/// Backward of `center` (bounding-box center).
pub fn center_grad<T: Real, const N: usize>(p: &Poly<T, N>, grad: &Vec2<T>, gp: &mut Poly<T, N>) {
    let mut ga = AABox2::zero();
    aabox_center_grad(grad, &mut ga);
    aabox_from_poly_grad(p, &ga, gp);
}

/// Backward of `centroid` (vertex mean).
pub fn centroid_grad<T: Real, const N: usize>(p: &Poly<T, N>, grad: &Vec2<T>, gp: &mut Poly<T, N>) {
    if p.is_empty() {
        return;
    }
    let share = *grad / T::lit(p.len() as f64);
    for g in gp.vertices_mut() {
        *g += share;
    }
}

// ---------- line and box operators ----------

/// Backward of `intersect_lines`.
pub fn intersect_lines_grad<T: Real>(
    l1: &Line2<T>,
    l2: &Line2<T>,
    grad: &Vec2<T>,
    gl1: &mut Line2<T>,
    gl2: &mut Line2<T>,
) {
    let wab = l1.a * l2.b - l2.a * l1.b;
    let wbc = l1.b * l2.c - l2.b * l1.c;
    let wca = l1.c * l2.a - l2.c * l1.a;

    let g_wbc = grad.x / wab;
    let g_wca = grad.y / wab;
    let g_wab = -(wbc * g_wbc + wca * g_wca) / wab;

    gl1.a += -l2.c * g_wca + l2.b * g_wab;
    gl1.b += l2.c * g_wbc - l2.a * g_wab;
    gl1.c += l2.a * g_wca - l2.b * g_wbc;
    gl2.a += l1.c * g_wca - l1.b * g_wab;
    gl2.b += -l1.c * g_wbc + l1.a * g_wab;
    gl2.c += l1.b * g_wbc - l1.a * g_wca;
}

/// Backward of `AABox2::intersect`.
pub fn aabox_intersect_grad<T: Real>(
    a1: &AABox2<T>,
    a2: &AABox2<T>,
    grad: &AABox2<T>,
    g1: &mut AABox2<T>,
    g2: &mut AABox2<T>,
) {
    max_grad(a1.min_x, a2.min_x, grad.min_x, &mut g1.min_x, &mut g2.min_x);
    min_grad(a1.max_x, a2.max_x, grad.max_x, &mut g1.max_x, &mut g2.max_x);
    max_grad(a1.min_y, a2.min_y, grad.min_y, &mut g1.min_y, &mut g2.min_y);
    min_grad(a1.max_y, a2.max_y, grad.max_y, &mut g1.max_y, &mut g2.max_y);
}

/// Backward of `AABox2::merge`.
pub fn aabox_merge_grad<T: Real>(
    a1: &AABox2<T>,
    a2: &AABox2<T>,
    grad: &AABox2<T>,
    g1: &mut AABox2<T>,
    g2: &mut AABox2<T>,
) {
    min_grad(a1.min_x, a2.min_x, grad.min_x, &mut g1.min_x, &mut g2.min_x);
    max_grad(a1.max_x, a2.max_x, grad.max_x, &mut g1.max_x, &mut g2.max_x);
    min_grad(a1.min_y, a2.min_y, grad.min_y, &mut g1.min_y, &mut g2.min_y);
    max_grad(a1.max_y, a2.max_y, grad.max_y, &mut g1.max_y, &mut g2.max_y);
}
