//! IoU, GIoU and DIoU of axis-aligned boxes.
//!
//! Closed forms on `AABox2`; no clipping and no tags. Gradients are with
//! respect to the four bounds of each box and add into the accumulators.

use crate::geom2::{distance, AABox2, Vec2};
use crate::grad::{
    aabox_area_grad, aabox_center_grad, aabox_dimension_grad, aabox_intersect_grad,
    aabox_merge_grad, distance_grad,
};
use crate::scalar::Real;

fn areas<T: Real>(a1: &AABox2<T>, a2: &AABox2<T>, ai: &AABox2<T>) -> (T, T) {
    let area_i = ai.area();
    (area_i, a1.area() + a2.area() - area_i)
}

pub fn iou<T: Real>(a1: &AABox2<T>, a2: &AABox2<T>) -> T {
    let (ai, au) = areas(a1, a2, &a1.intersect(a2));
    ai / au
}

pub fn giou<T: Real>(a1: &AABox2<T>, a2: &AABox2<T>) -> T {
    let (ai, au) = areas(a1, a2, &a1.intersect(a2));
    let am = a1.merge(a2).area();
    ai / au + au / am - T::one()
}

pub fn diou<T: Real>(a1: &AABox2<T>, a2: &AABox2<T>) -> T {
    let maxd = a1.merge(a2).dimension();
    let cd = distance(&a1.centroid(), &a2.centroid());
    iou(a1, a2) - (cd * cd) / (maxd * maxd)
}

pub fn iou_grad<T: Real>(
    a1: &AABox2<T>,
    a2: &AABox2<T>,
    grad: T,
    g1: &mut AABox2<T>,
    g2: &mut AABox2<T>,
) {
    let bi = a1.intersect(a2);
    let (ai, au) = areas(a1, a2, &bi);

    let mut gi = grad / au;
    let gu = -gi * ai / au;
    gi -= gu;

    let mut gbi = AABox2::zero();
    aabox_area_grad(a1, gu, g1);
    aabox_area_grad(a2, gu, g2);
    aabox_area_grad(&bi, gi, &mut gbi);
    aabox_intersect_grad(a1, a2, &gbi, g1, g2);
}

pub fn giou_grad<T: Real>(
    a1: &AABox2<T>,
    a2: &AABox2<T>,
    grad: T,
    g1: &mut AABox2<T>,
    g2: &mut AABox2<T>,
) {
    let (bi, bm) = (a1.intersect(a2), a1.merge(a2));
    let (ai, au) = areas(a1, a2, &bi);
    let am = bm.area();

    let mut gi = grad / au;
    let gu = grad * (T::one() / am - ai / (au * au));
    gi -= gu;
    let gm = -grad * au / (am * am);

    let (mut gbi, mut gbm) = (AABox2::zero(), AABox2::zero());
    aabox_area_grad(a1, gu, g1);
    aabox_area_grad(a2, gu, g2);
    aabox_area_grad(&bi, gi, &mut gbi);
    aabox_area_grad(&bm, gm, &mut gbm);
    aabox_intersect_grad(a1, a2, &gbi, g1, g2);
    aabox_merge_grad(a1, a2, &gbm, g1, g2);
}

/// Backward of `diou`; the centre term is skipped for concentric boxes.
pub fn diou_grad<T: Real>(
    a1: &AABox2<T>,
    a2: &AABox2<T>,
    grad: T,
    g1: &mut AABox2<T>,
    g2: &mut AABox2<T>,
) {
    let (c1, c2) = (a1.centroid(), a2.centroid());
    let cd = distance(&c1, &c2);
    let bm = a1.merge(a2);
    let maxd = bm.dimension();
    let maxd2 = maxd * maxd;

    iou_grad(a1, a2, grad, g1, g2);

    if cd > T::zero() {
        let grad_cd = -grad * T::lit(2.0) * cd / maxd2;
        let (mut gc1, mut gc2) = (Vec2::zeros(), Vec2::zeros());
        distance_grad(&c1, &c2, grad_cd, &mut gc1, &mut gc2);
        aabox_center_grad(&gc1, g1);
        aabox_center_grad(&gc2, g2);
    }
    let grad_maxd = grad * T::lit(2.0) * cd * cd / (maxd2 * maxd);
    let mut gbm = AABox2::zero();
    aabox_dimension_grad(&bm, grad_maxd, &mut gbm);
    aabox_merge_grad(a1, a2, &gbm, g1, g2);
}
