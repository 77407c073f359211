//! Random convex polygons (radial jitter + replay tokens).
//!
//! Purpose
//! - A small, deterministic sampler for the property tests, the benchmarks
//!   and the CLI `sample` command. Outputs are CCW `Poly<T, N>` ready for the
//!   clipping and overlap routines.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, then take the convex hull (Andrew's monotone chain).
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//!
//! Code cross-refs: `Poly`, `overlap`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom2::{Poly, Vec2};
use crate::scalar::Real;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    /// Requested vertex count; capped at the polygon capacity.
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, stable across platforms.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// Token for the `k`-th sub-draw of this one.
    #[inline]
    pub fn child(self, k: u64) -> ReplayToken {
        ReplayToken {
            seed: self.seed.rotate_left(17) ^ self.index,
            index: k,
        }
    }
}

/// Andrew's monotone chain, CCW, strictly convex (collinear points dropped).
fn convex_hull(points: &[Vec2<f64>]) -> Vec<Vec2<f64>> {
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| {
        match a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal),
            o => o,
        }
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return pts;
    }
    let turn = |a: Vec2<f64>, b: Vec2<f64>, c: Vec2<f64>| {
        let (ab, ac) = (b - a, c - a);
        ab.x * ac.y - ab.y * ac.x
    };
    let mut lower: Vec<Vec2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vec2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Draw a random convex polygon centred near the origin.
///
/// Returns `None` if the hull collapses below three vertices.
pub fn draw_polygon_radial<T: Real, const N: usize>(
    cfg: RadialCfg,
    tok: ReplayToken,
) -> Option<Poly<T, N>> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng).min(N);
    if n < 3 {
        return None;
    }
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.max(0.0);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    let pts: Vec<Vec2<f64>> = (0..n)
        .map(|k| {
            let base = phase + (k as f64) * delta;
            let th = base + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u).max(1e-6) * r0;
            Vec2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    let hull = convex_hull(&pts);
    if hull.len() < 3 {
        return None;
    }
    let lifted: Vec<Vec2<T>> = hull
        .iter()
        .map(|p| Vec2::new(T::lit(p.x), T::lit(p.y)))
        .collect();
    Poly::try_from_points(&lifted).ok()
}

/// Two independent draws, the second shifted by a uniform offset in
/// `[-spread, spread]²`.
pub fn draw_pair_radial<T: Real, const N: usize>(
    cfg: RadialCfg,
    tok: ReplayToken,
    spread: f64,
) -> Option<(Poly<T, N>, Poly<T, N>)> {
    let p1 = draw_polygon_radial(cfg, tok.child(0))?;
    let p2: Poly<T, N> = draw_polygon_radial(cfg, tok.child(1))?;
    let mut rng = tok.child(2).to_std_rng();
    let s = spread.abs();
    let (dx, dy) = if s > 0.0 {
        (rng.gen_range(-s..=s), rng.gen_range(-s..=s))
    } else {
        (0.0, 0.0)
    };
    Some((p1, p2.translate(&Vec2::new(T::lit(dx), T::lit(dy)))))
}
