//! Overlap metrics of rotated-box pairs as reported by the CLI.
//!
//! Pairs whose relative rotation is a multiple of π/2 have parallel edges,
//! which the caliper sweep does not handle; they are evaluated on the
//! axis-aligned fast path in the frame of the first box instead. The metrics
//! have a kink in the rotation there, so the rotation gradient is reported as
//! `None` on that path.

use anyhow::Result;
use calipers::clip::{intersect, Algorithm};
use calipers::geom2::{area, poly_from_xywhr, AABox2, Poly, Tagged, Xywhr};
use calipers::grad::poly_from_xywhr_grad;
use calipers::overlap::{
    aabox, diou_grad, diou_with, giou_grad, giou_with, iou_grad, iou_with, DiouForward,
    GiouForward, IouForward,
};
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

const ALIGN_TOL: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Values {
    pub area1: f64,
    pub area2: f64,
    pub intersection: f64,
    pub iou: f64,
    pub giou: f64,
    pub diou: f64,
}

/// Gradient w.r.t. `[x, y, w, h, r]` of the first and second box.
pub type BoxGrad = [[Option<f64>; 5]; 2];

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Grads {
    pub iou: BoxGrad,
    pub giou: BoxGrad,
    pub diou: BoxGrad,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PairReport {
    pub path: &'static str,
    pub values: Values,
    pub grads: Grads,
}

type BoxBackward = fn(&AABox2<f64>, &AABox2<f64>, f64, &mut AABox2<f64>, &mut AABox2<f64>);

/// Both boxes in the frame rotated by the first box's angle.
struct AlignedFrame {
    r: f64,
    swap: bool,
    a1: AABox2<f64>,
    a2: AABox2<f64>,
}

impl AlignedFrame {
    fn new(b1: &Xywhr<f64>, b2: &Xywhr<f64>) -> Option<Self> {
        let quarters = (b2.r - b1.r) / FRAC_PI_2;
        let k = quarters.round();
        if (quarters - k).abs() > ALIGN_TOL {
            return None;
        }
        let swap = (k as i64).rem_euclid(2) == 1;
        let (sin, cos) = b1.r.sin_cos();
        let local = |b: &Xywhr<f64>, w: f64, h: f64| {
            let (x, y) = (cos * b.x + sin * b.y, -sin * b.x + cos * b.y);
            AABox2::new(x - w / 2.0, x + w / 2.0, y - h / 2.0, y + h / 2.0)
        };
        let (w2, h2) = if swap { (b2.h, b2.w) } else { (b2.w, b2.h) };
        Some(Self {
            r: b1.r,
            swap,
            a1: local(b1, b1.w, b1.h),
            a2: local(b2, w2, h2),
        })
    }

    /// Map a gradient w.r.t. the local box bounds back to the box parameters.
    fn pull_back(&self, g: &AABox2<f64>, second: bool) -> [Option<f64>; 5] {
        let (gx, gy) = (g.min_x + g.max_x, g.min_y + g.max_y);
        let (gw, gh) = ((g.max_x - g.min_x) / 2.0, (g.max_y - g.min_y) / 2.0);
        let (sin, cos) = self.r.sin_cos();
        let (gw, gh) = if second && self.swap { (gh, gw) } else { (gw, gh) };
        [
            Some(cos * gx - sin * gy),
            Some(sin * gx + cos * gy),
            Some(gw),
            Some(gh),
            None,
        ]
    }

    fn values(&self) -> Values {
        let (a1, a2) = (&self.a1, &self.a2);
        Values {
            area1: a1.area(),
            area2: a2.area(),
            intersection: a1.intersect(a2).area(),
            iou: aabox::iou(a1, a2),
            giou: aabox::giou(a1, a2),
            diou: aabox::diou(a1, a2),
        }
    }

    fn grad(&self, f: BoxBackward) -> BoxGrad {
        let (mut g1, mut g2) = (AABox2::zero(), AABox2::zero());
        f(&self.a1, &self.a2, 1.0, &mut g1, &mut g2);
        [self.pull_back(&g1, false), self.pull_back(&g2, true)]
    }
}

struct PolyPair {
    p: Poly<f64, 4>,
    q: Poly<f64, 4>,
    iou: IouForward<f64, 8>,
    giou: GiouForward<f64, 8>,
    diou: DiouForward<f64, 8>,
    intersection: f64,
}

impl PolyPair {
    fn new(b1: &Xywhr<f64>, b2: &Xywhr<f64>, algorithm: Algorithm) -> Result<Self> {
        let (p, q) = (poly_from_xywhr(b1), poly_from_xywhr(b2));
        let x: Tagged<f64, 8> = intersect(&p, &q, algorithm)?;
        Ok(Self {
            p,
            q,
            iou: iou_with(&p, &q, algorithm)?,
            giou: giou_with(&p, &q, algorithm)?,
            diou: diou_with(&p, &q, algorithm)?,
            intersection: area(&x.poly),
        })
    }

    fn values(&self) -> Values {
        Values {
            area1: area(&self.p),
            area2: area(&self.q),
            intersection: self.intersection,
            iou: self.iou.value,
            giou: self.giou.value,
            diou: self.diou.value,
        }
    }
}

fn pull_back_poly(
    b1: &Xywhr<f64>,
    b2: &Xywhr<f64>,
    g1: &Poly<f64, 4>,
    g2: &Poly<f64, 4>,
) -> BoxGrad {
    let (mut gb1, mut gb2) = (Xywhr::zero(), Xywhr::zero());
    poly_from_xywhr_grad(b1, g1, &mut gb1);
    poly_from_xywhr_grad(b2, g2, &mut gb2);
    [gb1.as_array().map(Some), gb2.as_array().map(Some)]
}

/// Metric values only (used per row by `batch`).
pub fn values(b1: &Xywhr<f64>, b2: &Xywhr<f64>, algorithm: Algorithm) -> Result<Values> {
    match AlignedFrame::new(b1, b2) {
        Some(frame) => Ok(frame.values()),
        None => Ok(PolyPair::new(b1, b2, algorithm)?.values()),
    }
}

/// Metric values and their gradients w.r.t. both boxes' parameters.
pub fn evaluate(b1: &Xywhr<f64>, b2: &Xywhr<f64>, algorithm: Algorithm) -> Result<PairReport> {
    if let Some(frame) = AlignedFrame::new(b1, b2) {
        return Ok(PairReport {
            path: "aabox",
            values: frame.values(),
            grads: Grads {
                iou: frame.grad(aabox::iou_grad),
                giou: frame.grad(aabox::giou_grad),
                diou: frame.grad(aabox::diou_grad),
            },
        });
    }

    let pair = PolyPair::new(b1, b2, algorithm)?;
    let (p, q) = (&pair.p, &pair.q);

    let (mut g1, mut g2) = (p.zeros_like(), q.zeros_like());
    iou_grad(p, q, 1.0, &pair.iou.xtags, &mut g1, &mut g2);
    let iou = pull_back_poly(b1, b2, &g1, &g2);

    let (mut g1, mut g2) = (p.zeros_like(), q.zeros_like());
    giou_grad(p, q, 1.0, &pair.giou.xtags, &pair.giou.mtags, &mut g1, &mut g2);
    let giou = pull_back_poly(b1, b2, &g1, &g2);

    let (mut g1, mut g2) = (p.zeros_like(), q.zeros_like());
    diou_grad(p, q, 1.0, &pair.diou.xtags, pair.diou.dtags, &mut g1, &mut g2);
    let diou = pull_back_poly(b1, b2, &g1, &g2);

    Ok(PairReport {
        path: "polygon",
        values: pair.values(),
        grads: Grads { iou, giou, diou },
    })
}
