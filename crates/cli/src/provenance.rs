//! `<stem>.provenance.json` records written next to batch outputs.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Serialize)]
struct Sidecar<'a> {
    calipers_version: &'static str,
    code_rev: String,
    callsite: String,
    input: &'a Path,
    output: &'a Path,
    params: Value,
}

/// Record how `output` was computed from `input`. Returns the sidecar path.
#[track_caller]
pub fn write_sidecar(input: &Path, output: &Path, params: Value) -> Result<PathBuf> {
    let caller = Location::caller();
    let record = Sidecar {
        calipers_version: calipers::VERSION,
        code_rev: current_git_rev(),
        callsite: format!("{}:{}", caller.file(), caller.line()),
        input,
        output,
        params,
    };
    let path = sidecar_path(output);
    std::fs::write(&path, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance sidecar written");
    Ok(path)
}

fn sidecar_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` if set, else `git rev-parse HEAD`, else `"unknown"`.
pub fn current_git_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_output() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/run/pairs.parquet")),
            Path::new("/tmp/run/pairs.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_input_output_and_params() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("boxes.csv");
        let output = dir.path().join("metrics.csv");
        let path = write_sidecar(&input, &output, json!({"algo": "RotatingCaliper"})).unwrap();
        let parsed: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["output"], output.to_string_lossy().as_ref());
        assert_eq!(parsed["input"], input.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["algo"], "RotatingCaliper");
        assert_eq!(parsed["calipers_version"], calipers::VERSION);
        assert!(parsed["callsite"].as_str().unwrap().contains("provenance.rs"));
    }
}
