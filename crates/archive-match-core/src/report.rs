use crate::analysis::grouping::{display_title, AssetGroup};
use crate::analysis::stats::MatchStats;
use crate::error::Error;
use crate::model::{MatchResult, RawPathRecord};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    group_id: &'a str,
    display_title: String,
    primary_path: &'a str,
    file_count: usize,
    total_size_bytes: u64,
    matched: bool,
    match_basis: &'static str,
    match_score: String,
    catalog_id: Option<&'a str>,
    catalog_title: Option<&'a str>,
    reason_code: Option<&'static str>,
    reason_detail: Option<&'a str>,
    suggested_fix: Option<&'a str>,
}

/// One row per group; `results` must be index-aligned with `groups`.
pub fn write_results_csv(
    path: &Path,
    groups: &[AssetGroup],
    results: &[MatchResult],
    records: &[RawPathRecord],
) -> Result<(), Error> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    for (group, result) in groups.iter().zip(results) {
        let catalog = result.catalog_entry_ref.as_ref();
        writer.serialize(ResultRow {
            group_id: &group.group_id,
            display_title: display_title(group, catalog.map(|c| c.title.as_str())),
            primary_path: &group.primary(records).full_path,
            file_count: group.file_count,
            total_size_bytes: group.total_size_bytes,
            matched: result.matched,
            match_basis: result.match_basis.as_str(),
            match_score: format!("{:.3}", result.match_score),
            catalog_id: catalog.map(|c| c.id.as_str()),
            catalog_title: catalog.map(|c| c.title.as_str()),
            reason_code: result.reason_code.map(|c| c.code()),
            reason_detail: result.reason_detail.as_deref(),
            suggested_fix: result.suggested_fix.as_deref(),
        })?;
    }
    writer.flush()?;
    info!("Wrote {} result rows to {}", groups.len(), path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    stats: &'a MatchStats,
}

pub fn write_stats_json(path: &Path, stats: &MatchStats) -> Result<(), Error> {
    ensure_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    let report = StatsReport {
        generated_at: Utc::now().to_rfc3339(),
        stats,
    };
    serde_json::to_writer_pretty(writer, &report)?;
    info!("Wrote statistics to {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
