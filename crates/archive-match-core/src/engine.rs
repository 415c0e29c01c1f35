use crate::analysis::grouping::{AssetGroup, AssetGrouper};
use crate::analysis::stats::MatchStats;
use crate::catalog::CatalogIndex;
use crate::classify::FailureClassifier;
use crate::config::AppConfig;
use crate::error::Error;
use crate::extract::{FieldExtractor, PatternCatalog};
use crate::matcher::Matcher;
use crate::model::{CatalogEntry, ExtractedMetadata, MatchResult, RawPathRecord};
use crate::progress::ProgressReporter;
use crate::scanner::{self, ScanOptions, ScanOutcome};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct MatchEngine {
    config: AppConfig,
    extractor: FieldExtractor,
}

/// Everything one run produced. `metadata` aligns with `records`,
/// `results` aligns with `groups`.
#[derive(Debug)]
pub struct PipelineResult {
    pub records: Vec<RawPathRecord>,
    pub metadata: Vec<ExtractedMetadata>,
    pub groups: Vec<AssetGroup>,
    pub results: Vec<MatchResult>,
    pub stats: MatchStats,
    pub extract_duration: Duration,
    pub group_duration: Duration,
    pub index_duration: Duration,
    pub match_duration: Duration,
}

impl MatchEngine {
    pub fn new(config: AppConfig, catalog_rules: PatternCatalog) -> Self {
        Self {
            config,
            extractor: FieldExtractor::new(catalog_rules),
        }
    }

    /// Builds the rule catalog from the configuration (built-ins plus rules file).
    pub fn from_config(config: AppConfig) -> Result<Self, Error> {
        let catalog = PatternCatalog::from_config(&config)?;
        Ok(Self::new(config, catalog))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Walks the configured archive roots.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanOutcome, Error> {
        info!("Scanning archive roots: {:?}", self.config.archive_roots);
        reporter.on_scan_start();
        let start = Instant::now();
        let outcome = scanner::scan_archive(
            &self.config.archive_roots,
            &ScanOptions::from_config(&self.config),
            reporter,
        )?;
        reporter.on_scan_complete(
            outcome.records.len(),
            outcome.excluded.len(),
            start.elapsed().as_secs_f64(),
        );
        Ok(outcome)
    }

    /// Runs the pipeline:
    /// 1. Parallel extraction of every record
    /// 2. Sequential grouping in discovery order
    /// 3. Catalog index build
    /// 4. Parallel matching of every group, then failure classification
    /// 5. Aggregate statistics
    pub fn run(
        &self,
        records: Vec<RawPathRecord>,
        catalog: Vec<CatalogEntry>,
        reporter: &dyn ProgressReporter,
    ) -> PipelineResult {
        // Phase 1: Extract
        info!("Extracting metadata from {} paths...", records.len());
        reporter.on_extract_start(records.len());
        let extract_start = Instant::now();
        let metadata = self.extractor.extract_all(&records);
        let extract_duration = extract_start.elapsed();
        reporter.on_extract_complete(records.len(), extract_duration.as_secs_f64());
        debug!(
            "Extraction completed in {:.2}s, {} recognised",
            extract_duration.as_secs_f64(),
            metadata.iter().filter(|m| !m.is_unknown()).count()
        );

        // Phase 2: Group
        info!("Grouping records...");
        let group_start = Instant::now();
        let groups = AssetGrouper.group(&records, &metadata);
        let group_duration = group_start.elapsed();
        reporter.on_group_complete(groups.len(), group_duration.as_secs_f64());

        // Phase 3: Index
        info!("Indexing {} catalog entries...", catalog.len());
        let index_start = Instant::now();
        let index = CatalogIndex::build(catalog);
        let index_duration = index_start.elapsed();

        // Phase 4: Match
        info!("Matching {} groups...", groups.len());
        reporter.on_match_start(groups.len());
        let match_start = Instant::now();
        let matcher = Matcher::new(&index, self.config.matching);
        let mut results = matcher.match_all(&groups, &records, &metadata, reporter);
        FailureClassifier.classify_all(&mut results, &groups, &records, &metadata);
        let match_duration = match_start.elapsed();

        let matched = results.iter().filter(|r| r.matched).count();
        reporter.on_match_complete(matched, groups.len(), match_duration.as_secs_f64());
        debug!(
            "Matching completed in {:.2}s, {} of {} groups linked",
            match_duration.as_secs_f64(),
            matched,
            groups.len()
        );

        // Phase 5: Stats
        let stats = MatchStats::compute(&metadata, &groups, &results);

        PipelineResult {
            records,
            metadata,
            groups,
            results,
            stats,
            extract_duration,
            group_duration,
            index_duration,
            match_duration,
        }
    }
}
