//! Field Mapper CLI library
//!
//! Detection JSON files → mapped play JSON files, wrapped in a
//! [`PlayEnvelope`]. Batches are independent and processed in parallel.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use nfm_core::config::DEDUP_THRESHOLD_PX;
use nfm_core::{DetectionBatch, FieldMapper, MappedPlay, MapperConfig, Overrides, SCHEMA_VERSION};

/// Output file suffix for `process`
pub const OUTPUT_SUFFIX: &str = "mapped.json";

/// Mapped play plus provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEnvelope {
    pub schema_version: u32,
    /// RFC3339 timestamp
    pub processed_at: String,
    /// Input file the play was mapped from
    pub source: String,
    pub play: MappedPlay,
}

impl PlayEnvelope {
    pub fn new(source: &Path, play: MappedPlay) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            processed_at: chrono::Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            play,
        }
    }
}

/// Result of one file in a `process` run
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf>,
}

/// Explicit config file, else `NFM_CONFIG`, else defaults. `dedup` switches
/// on near-duplicate filtering when the config leaves it off.
pub fn load_config(path: Option<&Path>, dedup: bool) -> Result<MapperConfig> {
    let mut config = match path {
        Some(path) => MapperConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MapperConfig::from_env_or_default(),
    };
    if dedup && !config.input.dedup_enabled() {
        config.input.overlap_threshold_px = DEDUP_THRESHOLD_PX;
    }
    Ok(config)
}

pub fn read_batch(input: &Path) -> Result<DetectionBatch> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read detections: {}", input.display()))?;
    DetectionBatch::from_json(&json)
        .with_context(|| format!("Failed to parse detections: {}", input.display()))
}

/// Map one file, optionally pinning the line or scale.
pub fn map_file(input: &Path, mapper: &FieldMapper, overrides: &Overrides) -> Result<PlayEnvelope> {
    let batch = read_batch(input)?;
    let play = mapper
        .map_with_overrides(&batch, overrides)
        .with_context(|| format!("Failed to map {}", input.display()))?;
    Ok(PlayEnvelope::new(input, play))
}

pub fn write_envelope(envelope: &PlayEnvelope, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(envelope)?;
    fs::write(out, json).with_context(|| format!("Failed to write output file: {}", out.display()))
}

/// `<out_dir or input dir>/<input stem>.mapped.json`
pub fn output_path_for(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "play".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.{OUTPUT_SUFFIX}"))
}

/// Map every input concurrently. One failing file does not stop the others.
pub fn process_files(inputs: &[PathBuf], out_dir: Option<&Path>, config: &MapperConfig) -> Vec<FileOutcome> {
    let mapper = FieldMapper::new(config.clone());
    let outcomes: Vec<FileOutcome> = inputs
        .par_iter()
        .map(|input| {
            let result = map_file(input, &mapper, &Overrides::default()).and_then(|envelope| {
                let out = output_path_for(input, out_dir);
                write_envelope(&envelope, &out)?;
                Ok(out)
            });
            if let Err(e) = &result {
                warn!(input = %input.display(), error = %format!("{e:#}"), "batch failed");
            }
            FileOutcome {
                input: input.clone(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(files = outcomes.len(), failed, "process finished");
    outcomes
}

/// JSON schema of the mapped play payload
pub fn play_schema() -> Result<String> {
    let schema = schemars::schema_for!(MappedPlay);
    Ok(serde_json::to_string_pretty(&schema)?)
}

pub fn positions_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&nfm_core::taxonomy::available_positions())?)
}
