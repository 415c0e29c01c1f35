use crate::error::Error;
use crate::model::CatalogEntry;
use std::path::Path;
use tracing::{info, warn};

/// Reads `id,title,collection,season,duration_secs` rows. Rows that fail to
/// parse are logged and skipped.
pub fn load_catalog_csv(path: &Path) -> Result<Vec<CatalogEntry>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut entries = Vec::new();
    for (line, row) in reader.deserialize::<CatalogEntry>().enumerate() {
        match row {
            Ok(entry) if entry.title.is_empty() => {
                warn!("Skipping catalog row {} with empty title", line + 2);
            }
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping catalog row {}: {}", line + 2, e),
        }
    }
    info!("Loaded {} catalog entries from {}", entries.len(), path.display());
    Ok(entries)
}
