//! Criterion benchmarks for the overlap engine.
//! Focus sizes: vertices per polygon in {4, 8, 16, 32}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p calipers

use calipers::clip::{intersect_hodgman, intersect_rotating, merge};
use calipers::overlap::{iou, iou_grad, IouForward};
use calipers::rand::{draw_pair_radial, RadialCfg, ReplayToken, VertexCount};
use calipers::{Poly, Tagged};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

const CAP: usize = 32;
const OUT: usize = 2 * CAP;

fn random_pair(n: usize, rng: &mut StdRng) -> (Poly<f64, CAP>, Poly<f64, CAP>) {
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(n),
        ..RadialCfg::default()
    };
    loop {
        let tok = ReplayToken {
            seed: rng.gen(),
            index: 0,
        };
        if let Some(pair) = draw_pair_radial(cfg, tok, 0.8) {
            return pair;
        }
    }
}

fn bench_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersect");
    for &n in &[4usize, 8, 16, 32] {
        let mut rng = StdRng::seed_from_u64(43);
        group.bench_with_input(BenchmarkId::new("rotating_caliper", n), &n, |b, &n| {
            b.iter_batched(
                || random_pair(n, &mut rng),
                |(p, q)| {
                    let _x: Tagged<f64, OUT> = intersect_rotating(&p, &q).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        let mut rng = StdRng::seed_from_u64(43);
        group.bench_with_input(BenchmarkId::new("sutherland_hodgman", n), &n, |b, &n| {
            b.iter_batched(
                || random_pair(n, &mut rng),
                |(p, q)| {
                    let _x: Tagged<f64, OUT> = intersect_hodgman(&p, &q).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &n in &[4usize, 8, 16, 32] {
        let mut rng = StdRng::seed_from_u64(44);
        group.bench_with_input(BenchmarkId::new("rotating_caliper", n), &n, |b, &n| {
            b.iter_batched(
                || random_pair(n, &mut rng),
                |(p, q)| {
                    let _m: Tagged<f64, OUT> = merge(&p, &q).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_iou(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou");
    for &n in &[4usize, 8, 16, 32] {
        let mut rng = StdRng::seed_from_u64(45);
        group.bench_with_input(BenchmarkId::new("forward_backward", n), &n, |b, &n| {
            b.iter_batched(
                || random_pair(n, &mut rng),
                |(p, q)| {
                    let f: IouForward<f64, OUT> = iou(&p, &q).unwrap();
                    let (mut g1, mut g2) = (p.zeros_like(), q.zeros_like());
                    iou_grad(&p, &q, 1.0, &f.xtags, &mut g1, &mut g2);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intersect, bench_merge, bench_iou);
criterion_main!(benches);
