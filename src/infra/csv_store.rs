use crate::common::error::{PipelineError, Result};
use crate::domain::{EnrichedRecord, RawRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// CSV persistence for the stage-boundary files. Enum and sentinel values
/// round-trip as plain strings, so files stay inspectable and foreign
/// tools can consume them directly.
pub fn read_raw(path: &Path) -> Result<Vec<RawRecord>> {
    read_records(path)
}

pub fn write_raw(path: &Path, records: &[RawRecord]) -> Result<()> {
    write_records(path, records)
}

pub fn read_enriched(path: &Path) -> Result<Vec<EnrichedRecord>> {
    read_records(path)
}

pub fn write_enriched(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    write_records(path, records)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        PipelineError::Config(format!("Failed to read input file '{}': {e}", path.display()))
    })?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
