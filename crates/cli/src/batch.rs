//! Metrics for a table of rotated-box pairs.

use crate::metrics::{self, Values};
use anyhow::{bail, Result};
use calipers::{Algorithm, Xywhr};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub const BOX_COLUMNS: [&str; 10] = ["x1", "y1", "w1", "h1", "r1", "x2", "y2", "w2", "h2", "r2"];

/// Output format, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|e| e.to_str()) {
            Some("parquet") | Some("pq") => Format::Parquet,
            _ => Format::Csv,
        }
    }
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Read the box columns of `input`, append `iou`, `giou` and `diou`, and
/// write the table to `out`. Rows that fail to evaluate get NaN metrics.
/// Returns the number of rows written.
pub fn run(input: &Path, out: &Path, algorithm: Algorithm) -> Result<usize> {
    let mut df = LazyCsvReader::new(input)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()?;
    let missing: Vec<&str> = BOX_COLUMNS
        .iter()
        .copied()
        .filter(|c| df.column(c).is_err())
        .collect();
    if !missing.is_empty() {
        bail!("{} is missing columns {:?}", input.display(), missing);
    }
    let cols = BOX_COLUMNS
        .iter()
        .map(|c| column_f64(&df, c))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(rows = df.height(), input = %input.display(), "batch input");

    let mut iou = Vec::with_capacity(df.height());
    let mut giou = Vec::with_capacity(df.height());
    let mut diou = Vec::with_capacity(df.height());
    let mut failed = 0usize;
    for row in 0..df.height() {
        let b1 = Xywhr::new(cols[0][row], cols[1][row], cols[2][row], cols[3][row], cols[4][row]);
        let b2 = Xywhr::new(cols[5][row], cols[6][row], cols[7][row], cols[8][row], cols[9][row]);
        let v = match metrics::values(&b1, &b2, algorithm) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(row, %err, "pair skipped");
                failed += 1;
                Values {
                    area1: f64::NAN,
                    area2: f64::NAN,
                    intersection: f64::NAN,
                    iou: f64::NAN,
                    giou: f64::NAN,
                    diou: f64::NAN,
                }
            }
        };
        iou.push(v.iou);
        giou.push(v.giou);
        diou.push(v.diou);
    }
    df.with_column(Series::new("iou".into(), iou))?;
    df.with_column(Series::new("giou".into(), giou))?;
    df.with_column(Series::new("diou".into(), diou))?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(out)?;
    match Format::from_path(out) {
        Format::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?,
        Format::Parquet => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
    }
    tracing::info!(rows = df.height(), failed, out = %out.display(), "batch written");
    Ok(df.height())
}
