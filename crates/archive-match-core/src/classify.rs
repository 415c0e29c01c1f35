use crate::analysis::grouping::AssetGroup;
use crate::model::{
    EventType, ExtractedMetadata, MatchFailure, MatchResult, RawPathRecord, ReasonCode, Region,
};
use rayon::prelude::*;

/// Assigns one reason code to every unmatched result, by the first stage
/// that failed: extraction checks first, then the matcher's own failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureClassifier;

impl FailureClassifier {
    /// `results` must be index-aligned with `groups`. Matched results are left untouched.
    pub fn classify_all(
        &self,
        results: &mut [MatchResult],
        groups: &[AssetGroup],
        records: &[RawPathRecord],
        metadata: &[ExtractedMetadata],
    ) {
        results
            .par_iter_mut()
            .zip(groups.par_iter())
            .for_each(|(result, group)| self.classify(result, group, records, metadata));
    }

    pub fn classify(
        &self,
        result: &mut MatchResult,
        group: &AssetGroup,
        records: &[RawPathRecord],
        metadata: &[ExtractedMetadata],
    ) {
        if result.matched {
            return;
        }
        let (code, detail) = diagnose(result.failure, group, records, metadata);
        result.reason_code = Some(code);
        result.reason_detail = Some(detail);
        result.suggested_fix = Some(code.suggested_fix().to_string());
    }
}

fn diagnose(
    failure: Option<MatchFailure>,
    group: &AssetGroup,
    records: &[RawPathRecord],
    metadata: &[ExtractedMetadata],
) -> (ReasonCode, String) {
    let filename = &group.primary(records).filename;
    let primary = &metadata[group.primary_record];
    let key = &group.group_key;

    if primary.is_unknown() {
        return (ReasonCode::P01, format!("Unknown pattern: {}", filename));
    }
    let Some(year) = key.year else {
        return (ReasonCode::P02, format!("Year extraction failed from: {}", filename));
    };
    let Some(event_type) = key.event_type else {
        return (ReasonCode::P03, format!("Event type not recognized in: {}", filename));
    };
    if needs_episode(event_type, key.region) && key.episode.is_none() {
        return (ReasonCode::P04, format!("Episode number not found in: {}", filename));
    }

    match failure {
        Some(MatchFailure::NoCatalogYear) => (
            ReasonCode::D01,
            format!("Catalog has no entries for {}", year),
        ),
        Some(MatchFailure::NoCompatibleEventType) => (
            ReasonCode::M01,
            format!("Catalog has {} entries but none of type {}", year, event_type),
        ),
        Some(MatchFailure::BelowThreshold { best_score }) => (
            ReasonCode::M02,
            format!("Best similarity {:.2} below threshold", best_score),
        ),
        None => (ReasonCode::M02, "Match score below threshold".to_string()),
    }
}

fn needs_episode(event_type: EventType, region: Option<Region>) -> bool {
    matches!(event_type, EventType::Me | EventType::Br) || region == Some(Region::Eu)
}
