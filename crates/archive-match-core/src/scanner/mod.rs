pub mod walk;

pub use walk::{scan_archive, ExcludedFile, ExclusionReason, ScanOptions, ScanOutcome};

use crate::error::Error;
use crate::model::RawPathRecord;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct PathRow {
    full_path: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    size_bytes: Option<u64>,
}

/// Reads a previously exported path list (`full_path,size_bytes`) instead of
/// walking the archive. Row order is discovery order.
pub fn load_paths_csv(path: &Path) -> Result<Vec<RawPathRecord>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<PathRow>().enumerate() {
        match row {
            Ok(row) => records.push(RawPathRecord::new(&row.full_path, row.size_bytes.unwrap_or(0))),
            Err(e) => warn!("Skipping path row {}: {}", line + 2, e),
        }
    }
    info!("Loaded {} paths from {}", records.len(), path.display());
    Ok(records)
}
