use super::*;
use crate::clip::{intersect, intersect_hodgman, merge, Algorithm};
use crate::geom2::{
    aabox_from_poly, area, center, centroid, dimension, distance_line, distance_poly,
    distance_segment, intersect_lines, line_from_pp, poly_from_aabox, poly_from_xywhr, AABox2,
    Line2, Poly, Segment2, Tagged, Vec2, Xywhr,
};
use nalgebra::vector;

const H: f64 = 1e-6;
const TOL: f64 = 1e-6;

/// Central finite differences of `f` at `x`.
fn numeric_grad(x: &[f64], f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut xs = x.to_vec();
    (0..x.len())
        .map(|k| {
            xs[k] = x[k] + H;
            let up = f(&xs);
            xs[k] = x[k] - H;
            let down = f(&xs);
            xs[k] = x[k];
            (up - down) / (2.0 * H)
        })
        .collect()
}

fn assert_grad_close(analytic: &[f64], numeric: &[f64]) {
    assert_eq!(analytic.len(), numeric.len());
    for (k, (a, n)) in analytic.iter().zip(numeric).enumerate() {
        assert!(
            (a - n).abs() < TOL * (1.0 + n.abs()),
            "component {k}: analytic {a} vs numeric {n}"
        );
    }
}

fn flat<const N: usize>(p: &Poly<f64, N>) -> Vec<f64> {
    p.iter().flat_map(|v| [v.x, v.y]).collect()
}

fn unflat<const N: usize>(x: &[f64]) -> Poly<f64, N> {
    let pts: Vec<Vec2<f64>> = x.chunks(2).map(|c| vector![c[0], c[1]]).collect();
    Poly::from_points(&pts)
}

fn box_flat(b: &AABox2<f64>) -> Vec<f64> {
    vec![b.min_x, b.max_x, b.min_y, b.max_y]
}

fn box_unflat(x: &[f64]) -> AABox2<f64> {
    AABox2::new(x[0], x[1], x[2], x[3])
}

fn pentagon() -> Poly<f64, 5> {
    Poly::from_points(&[
        vector![0.0, -0.2],
        vector![1.3, 0.1],
        vector![1.6, 1.2],
        vector![0.4, 1.9],
        vector![-0.6, 0.8],
    ])
}

#[test]
fn line_from_points_gradient() {
    let w = Line2::new(0.3, -0.7, 1.1);
    let x = [0.2, -0.4, 1.5, 0.9];
    let f = |x: &[f64]| {
        let l = line_from_pp(&vector![x[0], x[1]], &vector![x[2], x[3]]);
        w.a * l.a + w.b * l.b + w.c * l.c
    };
    let (mut g1, mut g2) = (Vec2::zeros(), Vec2::zeros());
    line_from_pp_grad(&vector![x[0], x[1]], &vector![x[2], x[3]], &w, &mut g1, &mut g2);
    assert_grad_close(&[g1.x, g1.y, g2.x, g2.y], &numeric_grad(&x, f));
}

#[test]
fn line_distance_gradient() {
    let x = [0.6, -0.8, 0.3, 1.7, 0.4];
    let f = |x: &[f64]| distance_line(&Line2::new(x[0], x[1], x[2]), &vector![x[3], x[4]]);
    let (mut gl, mut gp) = (Line2::zero(), Vec2::zeros());
    distance_line_grad(
        &Line2::new(x[0], x[1], x[2]),
        &vector![x[3], x[4]],
        1.0,
        &mut gl,
        &mut gp,
    );
    assert_grad_close(&[gl.a, gl.b, gl.c, gp.x, gp.y], &numeric_grad(&x, f));
}

#[test]
fn line_crossing_gradient() {
    let g = vector![0.4, -1.3];
    let x = [1.0, -0.5, 0.2, 0.3, 1.2, -0.8];
    let f = |x: &[f64]| {
        let p = intersect_lines(&Line2::new(x[0], x[1], x[2]), &Line2::new(x[3], x[4], x[5]));
        g.dot(&p)
    };
    let (mut g1, mut g2) = (Line2::zero(), Line2::zero());
    intersect_lines_grad(
        &Line2::new(x[0], x[1], x[2]),
        &Line2::new(x[3], x[4], x[5]),
        &g,
        &mut g1,
        &mut g2,
    );
    assert_grad_close(
        &[g1.a, g1.b, g1.c, g2.a, g2.b, g2.c],
        &numeric_grad(&x, f),
    );
}

#[test]
fn segment_distance_gradient_in_every_region() {
    let (a, b) = ([0.1, 0.2], [1.4, 0.7]);
    for p in [[2.5, -0.3], [-1.0, 0.9], [0.7, 1.2], [0.9, -0.4]] {
        let x = [a[0], a[1], b[0], b[1], p[0], p[1]];
        let f = |x: &[f64]| {
            let s = Segment2::new(vector![x[0], x[1]], vector![x[2], x[3]]);
            distance_segment(&s, &vector![x[4], x[5]])
        };
        let s = Segment2::new(vector![x[0], x[1]], vector![x[2], x[3]]);
        let (mut gs, mut gp) = (Segment2::zero(), Vec2::zeros());
        distance_segment_grad(&s, &vector![x[4], x[5]], 1.0, &mut gs, &mut gp);
        assert_grad_close(
            &[gs.p1.x, gs.p1.y, gs.p2.x, gs.p2.y, gp.x, gp.y],
            &numeric_grad(&x, f),
        );
    }
}

#[test]
fn polygon_distance_gradient() {
    let poly = pentagon();
    for p in [vector![0.7, 0.6], vector![2.2, 0.4], vector![-0.9, 1.9]] {
        let mut x = flat(&poly);
        x.extend([p.x, p.y]);
        let f = |x: &[f64]| {
            let q: Poly<f64, 5> = unflat(&x[..10]);
            distance_poly(&q, &vector![x[10], x[11]]).0
        };
        let (_, edge) = distance_poly(&poly, &p);
        let (mut gpoly, mut gp) = (poly.zeros_like(), Vec2::zeros());
        distance_poly_grad(&poly, &p, 1.0, edge, &mut gpoly, &mut gp);
        let mut analytic = flat(&gpoly);
        analytic.extend([gp.x, gp.y]);
        assert_grad_close(&analytic, &numeric_grad(&x, f));
    }
}

#[test]
fn rotated_box_gradient() {
    let b = Xywhr::new(0.3, -0.2, 2.0, 0.7, 0.6);
    let weights = [0.5, -1.0, 0.25, 2.0, -0.3, 0.8, 1.1, -0.6];
    let f = |x: &[f64]| {
        let p = poly_from_xywhr(&Xywhr::new(x[0], x[1], x[2], x[3], x[4]));
        flat(&p).iter().zip(&weights).map(|(v, w)| v * w).sum::<f64>()
    };
    let grad: Poly<f64, 4> = unflat(&weights);
    let mut gb = Xywhr::zero();
    poly_from_xywhr_grad(&b, &grad, &mut gb);
    assert_grad_close(&gb.as_array(), &numeric_grad(&b.as_array(), f));
}

#[test]
fn box_polygon_conversion_gradients() {
    let weights = [0.5, -1.0, 0.25, 2.0, -0.3, 0.8, 1.1, -0.6];
    let b = AABox2::new(-0.5, 1.5, 0.2, 0.9);
    let f = |x: &[f64]| {
        let p = poly_from_aabox(&box_unflat(x));
        flat(&p).iter().zip(&weights).map(|(v, w)| v * w).sum::<f64>()
    };
    let mut gb = AABox2::zero();
    poly_from_aabox_grad(&unflat(&weights), &mut gb);
    assert_grad_close(&box_flat(&gb), &numeric_grad(&box_flat(&b), f));

    let poly = pentagon();
    let w = AABox2::new(0.3, -0.4, 1.2, 0.7);
    let f = |x: &[f64]| {
        let a = aabox_from_poly(&unflat::<5>(x));
        w.min_x * a.min_x + w.max_x * a.max_x + w.min_y * a.min_y + w.max_y * a.max_y
    };
    let mut gp = poly.zeros_like();
    aabox_from_poly_grad(&poly, &w, &mut gp);
    assert_grad_close(&flat(&gp), &numeric_grad(&flat(&poly), f));
}

#[test]
fn measure_gradients() {
    let poly = pentagon();
    let x = flat(&poly);

    let mut gp = poly.zeros_like();
    area_grad(&poly, 1.0, &mut gp);
    assert_grad_close(&flat(&gp), &numeric_grad(&x, |x| area(&unflat::<5>(x))));

    let d = dimension(&poly);
    let mut gp = poly.zeros_like();
    dimension_grad(&poly, 1.0, d.i, d.j, &mut gp);
    assert_grad_close(
        &flat(&gp),
        &numeric_grad(&x, |x| dimension(&unflat::<5>(x)).length),
    );

    let w = vector![0.7, -1.2];
    let mut gp = poly.zeros_like();
    centroid_grad(&poly, &w, &mut gp);
    assert_grad_close(
        &flat(&gp),
        &numeric_grad(&x, |x| w.dot(&centroid(&unflat::<5>(x)))),
    );

    let mut gp = poly.zeros_like();
    center_grad(&poly, &w, &mut gp);
    assert_grad_close(
        &flat(&gp),
        &numeric_grad(&x, |x| w.dot(&center(&unflat::<5>(x)))),
    );
}

#[test]
fn box_measure_gradients() {
    let b = AABox2::new(-0.5, 1.5, 0.2, 0.9);
    let x = box_flat(&b);

    let mut g = AABox2::zero();
    aabox_area_grad(&b, 1.0, &mut g);
    assert_grad_close(&box_flat(&g), &numeric_grad(&x, |x| box_unflat(x).area()));

    let mut g = AABox2::zero();
    aabox_dimension_grad(&b, 1.0, &mut g);
    assert_grad_close(
        &box_flat(&g),
        &numeric_grad(&x, |x| box_unflat(x).dimension()),
    );

    let w = vector![0.7, -1.2];
    let mut g = AABox2::zero();
    aabox_center_grad(&w, &mut g);
    assert_grad_close(
        &box_flat(&g),
        &numeric_grad(&x, |x| w.dot(&box_unflat(x).center())),
    );
}

#[test]
fn box_intersect_and_merge_gradients() {
    let a1 = AABox2::new(0.0, 2.0, 0.1, 1.3);
    let a2 = AABox2::new(0.7, 2.6, -0.4, 0.9);
    let w = AABox2::new(0.3, -0.4, 1.2, 0.7);
    let dot = |a: &AABox2<f64>| {
        w.min_x * a.min_x + w.max_x * a.max_x + w.min_y * a.min_y + w.max_y * a.max_y
    };
    let mut x = box_flat(&a1);
    x.extend(box_flat(&a2));

    let (mut g1, mut g2) = (AABox2::zero(), AABox2::zero());
    aabox_intersect_grad(&a1, &a2, &w, &mut g1, &mut g2);
    let mut analytic = box_flat(&g1);
    analytic.extend(box_flat(&g2));
    let f = |x: &[f64]| dot(&box_unflat(&x[..4]).intersect(&box_unflat(&x[4..])));
    assert_grad_close(&analytic, &numeric_grad(&x, f));

    let (mut g1, mut g2) = (AABox2::zero(), AABox2::zero());
    aabox_merge_grad(&a1, &a2, &w, &mut g1, &mut g2);
    let mut analytic = box_flat(&g1);
    analytic.extend(box_flat(&g2));
    let f = |x: &[f64]| dot(&box_unflat(&x[..4]).merge(&box_unflat(&x[4..])));
    assert_grad_close(&analytic, &numeric_grad(&x, f));
}

#[test]
fn gradients_accumulate() {
    let poly = pentagon();
    let mut once = poly.zeros_like();
    area_grad(&poly, 1.0, &mut once);
    let mut twice = poly.zeros_like();
    area_grad(&poly, 1.0, &mut twice);
    area_grad(&poly, 1.0, &mut twice);
    for (a, b) in once.iter().zip(twice.iter()) {
        assert!((2.0 * a - b).norm() < 1e-15);
    }
}

fn boxes() -> (Poly<f64, 4>, Poly<f64, 4>) {
    (
        poly_from_xywhr(&Xywhr::new(0.0, 0.0, 2.0, 1.0, 0.3)),
        poly_from_xywhr(&Xywhr::new(0.5, 0.3, 1.5, 1.0, 1.1)),
    )
}

#[test]
fn intersection_area_gradient_through_tags() {
    let (a, b) = boxes();
    for algorithm in [Algorithm::RotatingCaliper, Algorithm::SutherlandHodgeman] {
        let x: Tagged<f64, 8> = intersect(&a, &b, algorithm).unwrap();
        let tags = x.tags;

        let (mut g1, mut g2) = (a.zeros_like(), b.zeros_like());
        let mut gx = x.poly.zeros_like();
        area_grad(&x.poly, 1.0, &mut gx);
        intersect_grad(&a, &b, &gx, &tags, &mut g1, &mut g2);

        let f = |v: &[f64]| {
            let (p, q) = (unflat::<4>(&v[..8]), unflat::<4>(&v[8..]));
            area(&reconstruct_intersection(&p, &q, &tags))
        };
        let mut v = flat(&a);
        v.extend(flat(&b));
        let mut analytic = flat(&g1);
        analytic.extend(flat(&g2));
        assert_grad_close(&analytic, &numeric_grad(&v, f));

        // the tags also describe the forward result of a perturbed input
        let shifted = a.translate(&vector![1e-7, -1e-7]);
        let y: Tagged<f64, 8> = intersect_hodgman(&shifted, &b).unwrap();
        let rebuilt = reconstruct_intersection(&shifted, &b, &tags);
        assert!((area(&y.poly) - area(&rebuilt)).abs() < 1e-9);
    }
}

#[test]
fn hull_area_gradient_through_tags() {
    let (a, b) = boxes();
    let b = b.translate(&vector![1.0, 0.5]);
    let m: Tagged<f64, 8> = merge(&a, &b).unwrap();
    let tags = m.tags;

    let (mut g1, mut g2) = (a.zeros_like(), b.zeros_like());
    let mut gm = m.poly.zeros_like();
    area_grad(&m.poly, 1.0, &mut gm);
    merge_grad(&gm, &tags, &mut g1, &mut g2);

    let f = |v: &[f64]| {
        let (p, q) = (unflat::<4>(&v[..8]), unflat::<4>(&v[8..]));
        area(&reconstruct_hull(&p, &q, &tags))
    };
    let mut v = flat(&a);
    v.extend(flat(&b));
    let mut analytic = flat(&g1);
    analytic.extend(flat(&g2));
    assert_grad_close(&analytic, &numeric_grad(&v, f));
}
