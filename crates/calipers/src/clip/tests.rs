use super::*;
use crate::geom2::{area, distance, poly_from_aabox, poly_from_xywhr, AABox2, Tag, Xywhr};
use crate::grad::{reconstruct_hull, reconstruct_intersection};
use crate::rand::{draw_pair_radial, RadialCfg, ReplayToken, VertexCount};
use approx::assert_relative_eq;
use nalgebra::vector;
use proptest::prelude::*;

fn square(x0: f64, y0: f64, side: f64) -> Poly<f64, 4> {
    poly_from_aabox(&AABox2::new(x0, x0 + side, y0, y0 + side))
}

fn rotated(x: f64, y: f64, w: f64, h: f64, r: f64) -> Poly<f64, 4> {
    poly_from_xywhr(&Xywhr::new(x, y, w, h, r))
}

/// Closed containment with a loose tolerance (unnormalised cross products).
fn encloses<const N: usize, const K: usize>(hull: &Poly<f64, N>, p: &Poly<f64, K>) -> bool {
    p.iter().all(|v| {
        (0..hull.len()).all(|i| {
            let (a, b) = (hull[i], hull[hull.inc(i)]);
            let (e, q) = (b - a, v - a);
            e.x * q.y - e.y * q.x >= -1e-9
        })
    })
}

fn strictly_convex<const N: usize>(p: &Poly<f64, N>) -> bool {
    (0..p.len()).all(|i| {
        let (a, b, c) = (p[i], p[p.inc(i)], p[p.inc(p.inc(i))]);
        let (e, f) = (b - a, c - b);
        e.x * f.y - e.y * f.x > 0.0
    })
}

#[test]
fn default_resolves_to_rotating_caliper() {
    assert_eq!(Algorithm::default(), Algorithm::Default);
    assert_eq!(Algorithm::Default.resolve(), Algorithm::RotatingCaliper);
    assert_eq!(
        Algorithm::SutherlandHodgeman.resolve(),
        Algorithm::SutherlandHodgeman
    );
}

#[test]
fn shifted_unit_squares_by_half_plane_clipping() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(0.5, 0.5, 1.0);
    let x: Tagged<f64, 8> = intersect(&a, &b, Algorithm::SutherlandHodgeman).unwrap();
    assert_eq!(x.len(), 4);
    assert_eq!(x.tags.len(), 4);
    assert!((area(&x.poly) - 0.25).abs() < 1e-12);
    for corner in [
        vector![0.5, 0.5],
        vector![1.0, 0.5],
        vector![1.0, 1.0],
        vector![0.5, 1.0],
    ] {
        assert!(x.poly.iter().any(|v| (v - corner).norm() < 1e-12));
    }
    let rebuilt = reconstruct_intersection(&a, &b, &x.tags);
    for (u, v) in rebuilt.iter().zip(x.poly.iter()) {
        assert_relative_eq!(*u, *v, epsilon = 1e-12);
    }
}

#[test]
fn disjoint_squares_give_empty_polygon() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(3.0, 0.0, 1.0);
    let x: Tagged<f64, 8> = intersect_hodgman(&a, &b).unwrap();
    assert!(x.is_empty());
    assert!(x.tags.is_empty());

    let c = rotated(0.0, 0.0, 1.0, 1.0, 0.3);
    let d = rotated(3.0, 0.2, 1.0, 1.0, 0.8);
    let y: Tagged<f64, 8> = intersect_rotating(&c, &d).unwrap();
    assert!(y.is_empty());
    let z: Tagged<f64, 8> = intersect_rotating(&d, &c).unwrap();
    assert!(z.is_empty());
}

#[test]
fn nested_squares_return_the_inner_square() {
    let outer = square(0.0, 0.0, 1.0);
    let inner = square(0.25, 0.25, 0.5);

    let x: Tagged<f64, 8> = intersect_rotating(&outer, &inner).unwrap();
    assert_eq!(x.poly.vertices(), inner.vertices());
    assert_eq!(
        x.tags.as_slice(),
        &[Tag::second(0), Tag::second(1), Tag::second(2), Tag::second(3)]
    );
    assert!((area(&x.poly) - 0.25).abs() < 1e-15);

    let y: Tagged<f64, 8> = intersect_rotating(&inner, &outer).unwrap();
    assert_eq!(y.poly.vertices(), inner.vertices());
    assert!(y.tags.as_slice().iter().all(|t| t.is_first()));
}

#[test]
fn rotating_and_clipping_agree_on_rotated_boxes() {
    let cases = [
        (rotated(0.0, 0.0, 2.0, 1.0, 0.3), rotated(0.5, 0.3, 1.5, 1.0, 1.1)),
        (rotated(0.0, 0.0, 1.0, 1.0, 0.1), rotated(0.6, 0.4, 1.0, 1.0, 0.7)),
        (rotated(1.0, -1.0, 3.0, 0.5, -0.4), rotated(0.8, -0.9, 0.7, 2.5, 0.9)),
    ];
    for (a, b) in cases {
        let rc: Tagged<f64, 8> = intersect(&a, &b, Algorithm::RotatingCaliper).unwrap();
        let sh: Tagged<f64, 8> = intersect(&a, &b, Algorithm::SutherlandHodgeman).unwrap();
        assert!(rc.len() >= 3);
        assert_relative_eq!(area(&rc.poly), area(&sh.poly), epsilon = 1e-10);

        for x in [rc, sh] {
            let rebuilt = reconstruct_intersection(&a, &b, &x.tags);
            assert_eq!(rebuilt.len(), x.len());
            for (u, v) in rebuilt.iter().zip(x.poly.iter()) {
                assert_relative_eq!(*u, *v, epsilon = 1e-10);
            }
        }
    }
}

#[test]
fn single_precision_matches_double() {
    let a32 = poly_from_xywhr(&Xywhr::new(0.0f32, 0.0, 2.0, 1.0, 0.3));
    let b32 = poly_from_xywhr(&Xywhr::new(0.5f32, 0.3, 1.5, 1.0, 1.1));
    let x32: Tagged<f32, 8> = intersect_rotating(&a32, &b32).unwrap();
    let x64: Tagged<f64, 8> = intersect_rotating(
        &rotated(0.0, 0.0, 2.0, 1.0, 0.3),
        &rotated(0.5, 0.3, 1.5, 1.0, 1.1),
    )
    .unwrap();
    assert!((f64::from(area(&x32.poly)) - area(&x64.poly)).abs() < 1e-4);
}

#[test]
fn degenerate_inputs_give_empty_results() {
    let seg: Poly<f64, 4> = Poly::from_points(&[vector![0.0, 0.0], vector![1.0, 1.0]]);
    let sq = square(0.0, 0.0, 1.0);
    let x: Tagged<f64, 8> = intersect_rotating(&seg, &sq).unwrap();
    assert!(x.is_empty());
    let y: Tagged<f64, 8> = intersect_hodgman(&sq, &seg).unwrap();
    assert!(y.is_empty());
    let m: Tagged<f64, 8> = merge(&sq, &seg).unwrap();
    assert!(m.is_empty());
}

#[test]
fn merge_is_the_convex_hull() {
    let a = rotated(0.0, 0.0, 2.0, 1.0, 0.3);
    let b = rotated(1.5, 0.8, 1.5, 1.0, 1.1);
    let m: Tagged<f64, 8> = merge(&a, &b).unwrap();
    assert!(m.len() >= 4);
    assert!(encloses(&m.poly, &a));
    assert!(encloses(&m.poly, &b));
    assert!(strictly_convex(&m.poly));
    assert!(area(&m.poly) >= area(&a).max(area(&b)));

    // every hull vertex is a copy of the input vertex its tag names
    let rebuilt = reconstruct_hull(&a, &b, &m.tags);
    assert_eq!(rebuilt.vertices(), m.poly.vertices());
}

#[test]
fn merge_of_nested_polygons_is_the_outer_one() {
    let outer = rotated(0.0, 0.0, 3.0, 2.0, 0.2);
    let inner = rotated(0.1, 0.0, 1.0, 0.5, 0.9);
    let m: Tagged<f64, 8> = merge(&outer, &inner).unwrap();
    assert_eq!(m.len(), 4);
    assert!(m.tags.as_slice().iter().all(|t| t.is_first()));
    assert_relative_eq!(area(&m.poly), area(&outer), epsilon = 1e-12);
}

#[test]
fn farthest_pair_matches_brute_force() {
    let a = rotated(0.0, 0.0, 2.0, 1.0, 0.3);
    let b = rotated(4.0, 1.0, 1.0, 3.0, -0.6);
    let fp = max_distance(&a, &b);
    let mut best = 0.0f64;
    for u in &a {
        for v in &b {
            best = best.max(distance(u, v));
        }
    }
    assert_relative_eq!(fp.length, best, epsilon = 1e-12);
    assert_relative_eq!(distance(&a[fp.i], &b[fp.j]), best, epsilon = 1e-12);
}

#[test]
fn rotating_self_intersection_is_the_input() {
    let p = rotated(0.3, -0.2, 2.0, 1.0, 0.7);
    let x: Tagged<f64, 8> = intersect(&p, &p, Algorithm::Default).unwrap();
    assert_eq!(x.poly, p.resize::<8>().unwrap());
    assert!(x.tags.as_slice().iter().all(|t| t.is_first()));
    assert_relative_eq!(area(&x.poly), area(&p), epsilon = 1e-12);
}

#[test]
fn parallel_edges_fall_back_to_containment() {
    // Every edge of one axis-aligned square is parallel to one of the other;
    // the sweep stalls and answers as if one contained the other.
    let a = square(0.0, 0.0, 1.0);
    let b = square(3.0, 0.0, 1.0);
    let rc: Tagged<f64, 8> = intersect_rotating(&a, &b).unwrap();
    assert_relative_eq!(area(&rc.poly), 1.0, epsilon = 1e-12);

    let sh: Tagged<f64, 8> = intersect(&a, &b, Algorithm::SutherlandHodgeman).unwrap();
    assert!(sh.is_empty());
    let (ba, bb) = (AABox2::new(0.0, 1.0, 0.0, 1.0), AABox2::new(3.0, 4.0, 0.0, 1.0));
    assert_eq!(crate::overlap::aabox::iou(&ba, &bb), 0.0);
}

fn pair_cfg() -> RadialCfg {
    RadialCfg {
        vertex_count: VertexCount::Uniform { min: 3, max: 8 },
        ..RadialCfg::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rotating_and_clipping_have_equal_area(seed in any::<u64>(), index in 0u64..1_000) {
        let tok = ReplayToken { seed, index };
        let Some((a, b)) = draw_pair_radial::<f64, 8>(pair_cfg(), tok, 1.5) else {
            return Ok(());
        };
        let rc: Tagged<f64, 16> = intersect_rotating(&a, &b).unwrap();
        let sh: Tagged<f64, 16> = intersect_hodgman(&a, &b).unwrap();
        prop_assert!((area(&rc.poly) - area(&sh.poly)).abs() < 1e-9);
    }

    #[test]
    fn intersection_is_no_larger_than_either_input(seed in any::<u64>(), index in 0u64..1_000) {
        let tok = ReplayToken { seed, index };
        let Some((a, b)) = draw_pair_radial::<f64, 8>(pair_cfg(), tok, 1.0) else {
            return Ok(());
        };
        let x: Tagged<f64, 16> = intersect(&a, &b, Algorithm::Default).unwrap();
        prop_assert!(area(&x.poly) <= area(&a).min(area(&b)) + 1e-9);
        prop_assert!(area(&x.poly) >= 0.0);
    }

    #[test]
    fn merge_encloses_both_inputs(seed in any::<u64>(), index in 0u64..1_000) {
        let tok = ReplayToken { seed, index };
        let Some((a, b)) = draw_pair_radial::<f64, 8>(pair_cfg(), tok, 2.0) else {
            return Ok(());
        };
        let m: Tagged<f64, 16> = merge(&a, &b).unwrap();
        prop_assert!(encloses(&m.poly, &a));
        prop_assert!(encloses(&m.poly, &b));
        prop_assert!(area(&m.poly) >= area(&a).max(area(&b)) - 1e-9);
    }

    #[test]
    fn self_intersection_keeps_the_area(seed in any::<u64>(), index in 0u64..1_000) {
        let tok = ReplayToken { seed, index };
        let Some((a, _)) = draw_pair_radial::<f64, 8>(pair_cfg(), tok, 0.0) else {
            return Ok(());
        };
        let sh: Tagged<f64, 16> = intersect_hodgman(&a, &a).unwrap();
        prop_assert!((area(&sh.poly) - area(&a)).abs() < 1e-9);
        let rc: Tagged<f64, 16> = intersect(&a, &a, Algorithm::Default).unwrap();
        prop_assert!((area(&rc.poly) - area(&a)).abs() < 1e-9);
    }
}
