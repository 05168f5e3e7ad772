//! Resource definition and state files

use std::fs;
use std::path::Path;

use alidns_wrr_core::{ResourceState, WeightedRecordSet};
use anyhow::{Context, Result};

/// Load a record set definition from a TOML file.
pub fn load_record_set(path: &Path) -> Result<WeightedRecordSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_record_set(&raw).with_context(|| format!("invalid record set in {}", path.display()))
}

pub fn parse_record_set(raw: &str) -> Result<WeightedRecordSet> {
    Ok(toml::from_str(raw)?)
}

/// Load prior state saved from an earlier command's output.
pub fn load_state(path: &Path) -> Result<ResourceState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid state in {}", path.display()))
}
