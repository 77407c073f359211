use crate::clip::{intersect, merge, Algorithm};
use crate::error::Result;
use crate::geom2::{area, centroid, dimension, distance, Poly, Tag, Tags, Vec2};
use crate::grad::{
    add_vertex_grad, area_grad, centroid_grad, distance_grad, intersect_grad, merge_grad,
    reconstruct_hull, reconstruct_intersection, vertex,
};
use crate::scalar::Real;

/// IoU value and the intersection tags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IouForward<T, const M: usize> {
    pub value: T,
    pub xtags: Tags<M>,
}

/// GIoU value with intersection and merge tags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GiouForward<T, const M: usize> {
    pub value: T,
    pub xtags: Tags<M>,
    pub mtags: Tags<M>,
}

/// DIoU value with intersection tags and the merge tags of the two hull
/// vertices realising the hull diameter (`None` when the hull is empty).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiouForward<T, const M: usize> {
    pub value: T,
    pub xtags: Tags<M>,
    pub dtags: Option<[Tag; 2]>,
}

/// Intersection and union areas.
fn areas<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    pi: &Poly<T, M>,
) -> (T, T) {
    let ai = area(pi);
    (ai, area(p1) + area(p2) - ai)
}

/// IoU with the default (rotating-caliper) intersection.
///
/// Pairs with exactly parallel edges, such as two axis-aligned boxes, are not
/// supported by the caliper sweep; use [`iou_with`] and
/// `Algorithm::SutherlandHodgeman`, or [`crate::overlap::aabox::iou`].
pub fn iou<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> Result<IouForward<T, M>> {
    iou_with(p1, p2, Algorithm::Default)
}

/// IoU with an explicit intersection algorithm.
pub fn iou_with<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    algorithm: Algorithm,
) -> Result<IouForward<T, M>> {
    let x = intersect::<T, N1, N2, M>(p1, p2, algorithm)?;
    let (ai, au) = areas(p1, p2, &x.poly);
    Ok(IouForward {
        value: ai / au,
        xtags: x.tags,
    })
}

/// GIoU with the default intersection.
///
/// The merged hull always comes from the caliper sweep, so pairs with exactly
/// parallel edges are not supported whatever the algorithm; axis-aligned
/// pairs belong on [`crate::overlap::aabox::giou`].
pub fn giou<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> Result<GiouForward<T, M>> {
    giou_with(p1, p2, Algorithm::Default)
}

pub fn giou_with<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    algorithm: Algorithm,
) -> Result<GiouForward<T, M>> {
    let x = intersect::<T, N1, N2, M>(p1, p2, algorithm)?;
    let m = merge::<T, N1, N2, M>(p1, p2)?;
    let (ai, au) = areas(p1, p2, &x.poly);
    let am = area(&m.poly);
    Ok(GiouForward {
        value: ai / au + au / am - T::one(),
        xtags: x.tags,
        mtags: m.tags,
    })
}

/// DIoU with the default intersection. Same restriction on parallel edges as
/// [`giou`]; see [`crate::overlap::aabox::diou`] for axis-aligned pairs.
pub fn diou<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
) -> Result<DiouForward<T, M>> {
    diou_with(p1, p2, Algorithm::Default)
}

pub fn diou_with<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    algorithm: Algorithm,
) -> Result<DiouForward<T, M>> {
    let IouForward { value, xtags } = iou_with::<T, N1, N2, M>(p1, p2, algorithm)?;
    let cd = distance(&centroid(p1), &centroid(p2));
    let m = merge::<T, N1, N2, M>(p1, p2)?;
    let diam = dimension(&m.poly);
    let hull = m.tags.as_slice();
    Ok(DiouForward {
        value: value - (cd * cd) / (diam.length * diam.length),
        xtags,
        dtags: hull.get(diam.i).zip(hull.get(diam.j)).map(|(&a, &b)| [a, b]),
    })
}

/// Backward of `iou`. Adds into `g1` and `g2`.
pub fn iou_grad<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    grad: T,
    xtags: &Tags<M>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    let pi = reconstruct_intersection(p1, p2, xtags);
    let (ai, au) = areas(p1, p2, &pi);

    let mut gi = grad / au;
    let gu = -gi * ai / au;
    gi -= gu;

    let mut gpi = pi.zeros_like();
    area_grad(p1, gu, g1);
    area_grad(p2, gu, g2);
    area_grad(&pi, gi, &mut gpi);
    intersect_grad(p1, p2, &gpi, xtags, g1, g2);
}

/// Backward of `giou`. Adds into `g1` and `g2`.
pub fn giou_grad<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    grad: T,
    xtags: &Tags<M>,
    mtags: &Tags<M>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    let pi = reconstruct_intersection(p1, p2, xtags);
    let pm = reconstruct_hull(p1, p2, mtags);
    let (ai, au) = areas(p1, p2, &pi);
    let am = area(&pm);

    let mut gi = grad / au;
    let gu = grad * (T::one() / am - ai / (au * au));
    gi -= gu;
    let gm = -grad * au / (am * am);

    let mut gpi = pi.zeros_like();
    let mut gpm = pm.zeros_like();
    area_grad(p1, gu, g1);
    area_grad(p2, gu, g2);
    area_grad(&pi, gi, &mut gpi);
    area_grad(&pm, gm, &mut gpm);
    intersect_grad(p1, p2, &gpi, xtags, g1, g2);
    merge_grad(&gpm, mtags, g1, g2);
}

/// Backward of `diou`. Adds into `g1` and `g2`.
///
/// The centroid term is skipped when both centroids coincide: the distance is
/// not differentiable there and its contribution to the value is zero. Without
/// diameter tags (empty hull) only the IoU part is propagated.
pub fn diou_grad<T: Real, const N1: usize, const N2: usize, const M: usize>(
    p1: &Poly<T, N1>,
    p2: &Poly<T, N2>,
    grad: T,
    xtags: &Tags<M>,
    dtags: Option<[Tag; 2]>,
    g1: &mut Poly<T, N1>,
    g2: &mut Poly<T, N2>,
) {
    iou_grad(p1, p2, grad, xtags, g1, g2);
    let Some([t1, t2]) = dtags else {
        return;
    };

    let (c1, c2) = (centroid(p1), centroid(p2));
    let cd = distance(&c1, &c2);
    let (v1, v2) = (vertex(p1, p2, t1), vertex(p1, p2, t2));
    let maxd = distance(&v1, &v2);
    let maxd2 = maxd * maxd;

    if cd > T::zero() {
        let grad_cd = -grad * T::lit(2.0) * cd / maxd2;
        let (mut gc1, mut gc2) = (Vec2::zeros(), Vec2::zeros());
        distance_grad(&c1, &c2, grad_cd, &mut gc1, &mut gc2);
        centroid_grad(p1, &gc1, g1);
        centroid_grad(p2, &gc2, g2);
    }
    if maxd > T::zero() {
        let grad_maxd = grad * T::lit(2.0) * cd * cd / (maxd2 * maxd);
        let (mut gv1, mut gv2) = (Vec2::zeros(), Vec2::zeros());
        distance_grad(&v1, &v2, grad_maxd, &mut gv1, &mut gv2);
        add_vertex_grad(t1, &gv1, g1, g2);
        add_vertex_grad(t2, &gv2, g1, g2);
    }
}
