use crate::config::{self, AppConfig, ExclusionConfig};
use crate::error::Error;
use crate::model::RawPathRecord;
use crate::progress::ProgressReporter;
use glob::Pattern;
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Lower-case extensions without the dot.
    pub video_extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub exclusions: ExclusionConfig,
}

impl ScanOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            video_extensions: config
                .video_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            ignore_patterns: config.ignore_patterns.clone(),
            exclusions: config.exclusions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExclusionReason {
    BelowMinSize { size: u64, min: u64 },
    AboveMaxSize { size: u64, max: u64 },
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedFile {
    pub path: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Accepted files in walk order.
    pub records: Vec<RawPathRecord>,
    pub excluded: Vec<ExcludedFile>,
    pub non_video: usize,
}

/// Walks each root (nested roots collapsed first) and returns the video files
/// beneath it as root-relative records. Directories the process may not read
/// are logged and skipped.
pub fn scan_archive(
    roots: &[String],
    options: &ScanOptions,
    reporter: &dyn ProgressReporter,
) -> Result<ScanOutcome, Error> {
    let ignore_patterns: Vec<Pattern> = options
        .ignore_patterns
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();
    let keywords: Vec<String> = options
        .exclusions
        .keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    let mut outcome = ScanOutcome::default();
    for root in config::non_overlapping_directories(roots.to_vec()) {
        let root_path = Path::new(&root);
        if !root_path.is_dir() {
            warn!("Archive root {} is not a directory, skipping", root);
            continue;
        }
        debug!("Walking {}", root);

        let walker = WalkDir::new(root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !ignore_patterns.iter().any(|p| p.matches_path(entry.path())));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let denied = err
                        .io_error()
                        .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied);
                    if denied {
                        error!("Access denied during walk of {}: {}", root, err);
                        continue;
                    }
                    return Err(Error::Io(io::Error::from(err)));
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let is_video = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
                .is_some_and(|ext| options.video_extensions.contains(&ext));
            if !is_video {
                outcome.non_video += 1;
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let relative = path.strip_prefix(root_path).unwrap_or(path);
            let relative = relative.to_string_lossy();

            if let Some(reason) = exclusion_reason(&relative, size, &options.exclusions, &keywords) {
                outcome.excluded.push(ExcludedFile {
                    path: relative.into_owned(),
                    reason,
                });
                continue;
            }

            outcome.records.push(RawPathRecord::new(&relative, size));
            reporter.on_scan_progress(outcome.records.len(), &relative);
        }
    }

    debug!(
        "Scan found {} video files, {} excluded, {} other files",
        outcome.records.len(),
        outcome.excluded.len(),
        outcome.non_video
    );
    Ok(outcome)
}

fn exclusion_reason(
    relative_path: &str,
    size: u64,
    exclusions: &ExclusionConfig,
    keywords: &[String],
) -> Option<ExclusionReason> {
    if let Some(min) = exclusions.min_size_bytes {
        if size < min {
            return Some(ExclusionReason::BelowMinSize { size, min });
        }
    }
    if let Some(max) = exclusions.max_size_bytes {
        if size > max {
            return Some(ExclusionReason::AboveMaxSize { size, max });
        }
    }
    let lowered = relative_path.to_lowercase();
    keywords
        .iter()
        .find(|k| !k.is_empty() && lowered.contains(k.as_str()))
        .map(|k| ExclusionReason::Keyword(k.clone()))
}
