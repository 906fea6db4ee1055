use crate::config::ExtractionConfig;
use crate::layout::LayoutSnapshot;
use crate::types::Table;
use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};

/// Hash of everything that decides a run's output: the layout snapshot and
/// the clustering/assignment tuning. Scheduling and diagnostics settings
/// (`parallel`, `profile`, `debug`) are left out since they never change
/// the table.
pub fn layout_fingerprint(snapshot: &LayoutSnapshot, config: &ExtractionConfig) -> Result<String> {
    let snapshot_json = serde_json::to_string(snapshot)
        .map_err(|e| anyhow!("Failed to serialize layout snapshot for hashing: {}", e))?;
    let tuning_json = serde_json::to_string(&(&config.row_clustering, &config.assignment))
        .map_err(|e| anyhow!("Failed to serialize config for hashing: {}", e))?;

    let mut hasher = Sha256::new();
    hasher.update(snapshot_json.as_bytes());
    hasher.update(tuning_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Content hash of a table, used to compare runs
pub fn table_digest(table: &Table) -> Result<String> {
    let json = serde_json::to_string(table)
        .map_err(|e| anyhow!("Failed to serialize table for hashing: {}", e))?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
