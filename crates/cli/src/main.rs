mod batch;
mod metrics;
mod provenance;

use anyhow::{Context, Result};
use calipers::overlap::{diou_with, giou_with, iou_with, DiouForward, GiouForward, IouForward};
use calipers::rand::{draw_pair_radial, RadialCfg, ReplayToken, VertexCount};
use calipers::{Algorithm, Poly, Real, Xywhr};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

/// Polygon capacity for sampled pairs.
const SAMPLE_CAP: usize = 32;

#[derive(Parser)]
#[command(name = "calipers")]
#[command(about = "Overlap metrics of rotated boxes and convex polygons")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgoArg {
    Default,
    /// Rotating calipers
    Rc,
    /// Sutherland–Hodgman clipping
    Sh,
}

impl From<AlgoArg> for Algorithm {
    fn from(a: AlgoArg) -> Self {
        match a {
            AlgoArg::Default => Algorithm::Default,
            AlgoArg::Rc => Algorithm::RotatingCaliper,
            AlgoArg::Sh => Algorithm::SutherlandHodgeman,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Metrics and gradients for one pair of rotated boxes (x,y,w,h,r)
    Pair {
        #[arg(long, value_parser = parse_box, allow_hyphen_values = true)]
        a: Xywhr<f64>,
        #[arg(long, value_parser = parse_box, allow_hyphen_values = true)]
        b: Xywhr<f64>,
        #[arg(long, value_enum, default_value_t = AlgoArg::Default)]
        algo: AlgoArg,
    },
    /// Append iou/giou/diou columns to a CSV of box pairs; writes CSV or Parquet
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = AlgoArg::Default)]
        algo: AlgoArg,
    },
    /// Metrics for seeded random convex polygon pairs, one JSON line each
    Sample {
        #[arg(long, default_value_t = 5)]
        n: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 8)]
        vertices: usize,
        #[arg(long, default_value_t = 0.8)]
        spread: f64,
        #[arg(long, value_enum, default_value_t = AlgoArg::Default)]
        algo: AlgoArg,
    },
    /// Print a small provenance JSON block
    Report,
}

fn parse_box(s: &str) -> std::result::Result<Xywhr<f64>, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("bad number in {s:?}: {e}"))?;
    let v: [f64; 5] = parts
        .try_into()
        .map_err(|p: Vec<f64>| format!("expected 5 values x,y,w,h,r, got {}", p.len()))?;
    Ok(Xywhr::from_array(v))
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Pair { a, b, algo } => pair(&a, &b, algo),
        Action::Batch { input, out, algo } => run_batch(input, out, algo),
        Action::Sample {
            n,
            seed,
            vertices,
            spread,
            algo,
        } => sample(n, seed, vertices, spread, algo),
        Action::Report => report(),
    }
}

fn pair(a: &Xywhr<f64>, b: &Xywhr<f64>, algo: AlgoArg) -> Result<()> {
    tracing::info!(?a, ?b, ?algo, "pair");
    let report = metrics::evaluate(a, b, algo.into())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_batch(input: PathBuf, out: PathBuf, algo: AlgoArg) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?algo, "batch");
    let rows = batch::run(&input, &out, algo.into())
        .with_context(|| format!("batch over {}", input.display()))?;
    let params = json!({
        "algo": format!("{:?}", Algorithm::from(algo).resolve()),
        "rows": rows,
        "columns": batch::BOX_COLUMNS,
    });
    let sidecar = provenance::write_sidecar(&input, &out, params)?;
    tracing::info!(sidecar = %sidecar.display(), "done");
    Ok(())
}

fn sample(n: u64, seed: u64, vertices: usize, spread: f64, algo: AlgoArg) -> Result<()> {
    if vertices > SAMPLE_CAP {
        tracing::warn!(vertices, cap = SAMPLE_CAP, "vertex count capped");
    }
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(vertices.max(3)),
        ..RadialCfg::default()
    };
    let algorithm = Algorithm::from(algo);
    for index in 0..n {
        let tok = ReplayToken { seed, index };
        let Some((p, q)) = draw_pair_radial::<f64, SAMPLE_CAP>(cfg, tok, spread) else {
            tracing::warn!(index, "degenerate draw skipped");
            continue;
        };
        match sample_metrics(&p, &q, algorithm) {
            Ok((iou, giou, diou)) => println!(
                "{}",
                json!({
                    "index": index,
                    "n1": p.len(),
                    "n2": q.len(),
                    "iou": iou,
                    "giou": giou,
                    "diou": diou,
                })
            ),
            Err(err) => tracing::warn!(index, %err, "pair skipped"),
        }
    }
    Ok(())
}

fn sample_metrics(
    p: &Poly<f64, SAMPLE_CAP>,
    q: &Poly<f64, SAMPLE_CAP>,
    algorithm: Algorithm,
) -> calipers::Result<(f64, f64, f64)> {
    let i: IouForward<f64, { 2 * SAMPLE_CAP }> = iou_with(p, q, algorithm)?;
    let g: GiouForward<f64, { 2 * SAMPLE_CAP }> = giou_with(p, q, algorithm)?;
    let d: DiouForward<f64, { 2 * SAMPLE_CAP }> = diou_with(p, q, algorithm)?;
    Ok((i.value, g.value, d.value))
}

fn report_block() -> serde_json::Value {
    json!({
        "calipers_version": calipers::VERSION,
        "code_rev": provenance::current_git_rev(),
        "eps": {
            "f32": <f32 as Real>::EPS.as_f64(),
            "f64": <f64 as Real>::EPS.as_f64(),
        },
        "default_algorithm": format!("{:?}", Algorithm::Default.resolve()),
    })
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&report_block())?);
    Ok(())
}
