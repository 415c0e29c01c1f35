pub mod fields;
pub mod patterns;

pub use patterns::{
    CaptureMap, Classification, FallbackRule, PatternCatalog, Rule, RuleFile, RuleSpec,
    TemplateFill,
};

use crate::model::{ExtractedMetadata, FieldSource, Provenance, RawPathRecord};
use rayon::prelude::*;
use tracing::trace;

/// Turns raw paths into structured metadata using an immutable rule catalog.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    catalog: PatternCatalog,
}

impl FieldExtractor {
    pub fn new(catalog: PatternCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn extract_path(&self, path: &str) -> ExtractedMetadata {
        self.extract(&RawPathRecord::new(path, 0))
    }

    /// Extracts every record in parallel; output order follows input order.
    pub fn extract_all(&self, records: &[RawPathRecord]) -> Vec<ExtractedMetadata> {
        records.par_iter().map(|r| self.extract(r)).collect()
    }

    /// Pure function of `record.full_path`. Never fails: a path with no
    /// signal yields all-null fields and the `UNKNOWN` pattern.
    pub fn extract(&self, record: &RawPathRecord) -> ExtractedMetadata {
        let full_path = record.full_path.as_str();
        let path_upper = full_path.to_uppercase();
        let filename = record.filename.as_str();
        let segments: Vec<&str> = record
            .directory_parts
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(filename).filter(|f| !f.is_empty()))
            .collect();

        let mut meta = ExtractedMetadata::unknown();
        let mut provenance = Provenance::default();

        if !record.directory_parts.is_empty() {
            meta.category = Some(record.directory_parts[0].clone());
        }

        if let Some((year, source)) = fields::extract_year(&segments, &path_upper, full_path) {
            meta.year = Some(year);
            provenance.year = Some(source);
        }

        if let Some(region) = fields::extract_region(&path_upper) {
            meta.region = Some(region);
            provenance.region = Some(FieldSource::PathKeyword);
        }

        if let Some((event_type, source)) = fields::extract_event_type(&segments, filename) {
            meta.event_type = Some(event_type);
            provenance.event_type = Some(source);
        }

        if let Some(n) = fields::extract_event_number(full_path) {
            meta.event_number = Some(n);
            provenance.event_number = Some(FieldSource::EventNumberToken);
        }

        if let Some(ep) = fields::extract_episode(filename) {
            meta.episode = Some(ep);
            provenance.episode = Some(FieldSource::EpisodeToken);
        }

        if let Some(stage) = fields::extract_stage(full_path) {
            meta.stage = Some(stage);
            provenance.stage = Some(FieldSource::StageToken);
        }

        meta.buyin = fields::extract_buyin(full_path);
        meta.version = fields::extract_version(&path_upper);
        meta.part = fields::extract_part(full_path);

        let classification = self.catalog.classify(full_path, &meta);
        apply_template(&mut meta, &mut provenance, &classification.fill);

        meta.pattern_id = classification.pattern_id;
        meta.confidence = classification.confidence;
        meta.rule_tier = classification.tier;
        meta.provenance = provenance;

        trace!(
            path = full_path,
            pattern_id = %meta.pattern_id,
            confidence = meta.confidence,
            "extracted"
        );
        meta
    }
}

/// Template values only fill fields generic extraction left empty.
fn apply_template(meta: &mut ExtractedMetadata, provenance: &mut Provenance, fill: &TemplateFill) {
    if meta.year.is_none() && fill.year.is_some() {
        meta.year = fill.year;
        provenance.year = Some(FieldSource::RuleTemplate);
    }
    if meta.region.is_none() && fill.region.is_some() {
        meta.region = fill.region;
        provenance.region = Some(FieldSource::RuleTemplate);
    }
    if meta.event_type.is_none() && fill.event_type.is_some() {
        meta.event_type = fill.event_type;
        provenance.event_type = Some(FieldSource::RuleTemplate);
    }
    if meta.event_number.is_none() && fill.event_number.is_some() {
        meta.event_number = fill.event_number;
        provenance.event_number = Some(FieldSource::RuleTemplate);
    }
    if meta.episode.is_none() && fill.episode.is_some() {
        meta.episode = fill.episode;
        provenance.episode = Some(FieldSource::RuleTemplate);
    }
    if meta.season.is_none() {
        meta.season = fill.season;
    }
}
