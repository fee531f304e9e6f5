//! Loading and canonicalization of the four input artifacts.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::types::{Slide, TimingEntry, Transcript};

/// Fail fast before any per-slide work when a required artifact is absent.
pub fn ensure_inputs_exist(paths: &[&Path]) -> Result<()> {
    for path in paths {
        if !path.is_file() {
            bail!("required input file is missing: {}", path.display());
        }
    }
    Ok(())
}

pub fn load_slides(path: &Path) -> Result<Vec<Slide>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read slide data {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse slide data {}", path.display()))
}

pub fn load_transcript(path: &Path) -> Result<Transcript> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse transcript {}", path.display()))
}

pub fn load_timings(path: &Path) -> Result<Vec<TimingEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read timing data {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse timing data {}", path.display()))
}
