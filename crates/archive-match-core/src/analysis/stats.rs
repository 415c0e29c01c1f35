use crate::analysis::grouping::AssetGroup;
use crate::model::{ExtractedMetadata, MatchResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of records with each field populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldCoverage {
    pub year: usize,
    pub region: usize,
    pub event_type: usize,
    pub event_number: usize,
    pub episode: usize,
    pub stage: usize,
}

/// Aggregate view over one pipeline run. Derived data only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStats {
    pub total_files: usize,
    pub total_groups: usize,
    pub matched_groups: usize,
    pub unmatched_groups: usize,
    pub match_rate: f64,
    pub by_pattern: BTreeMap<String, usize>,
    pub by_reason_code: BTreeMap<String, usize>,
    pub by_confidence_bucket: BTreeMap<String, usize>,
    pub by_match_basis: BTreeMap<String, usize>,
    pub coverage: FieldCoverage,
}

impl MatchStats {
    /// `metadata` is per record; `results` is index-aligned with `groups`.
    pub fn compute(metadata: &[ExtractedMetadata], groups: &[AssetGroup], results: &[MatchResult]) -> Self {
        let mut stats = MatchStats {
            total_files: metadata.len(),
            total_groups: groups.len(),
            ..Default::default()
        };

        for meta in metadata {
            *stats.by_pattern.entry(meta.pattern_id.clone()).or_default() += 1;
            *stats
                .by_confidence_bucket
                .entry(confidence_bucket(meta.confidence))
                .or_default() += 1;

            let c = &mut stats.coverage;
            c.year += meta.year.is_some() as usize;
            c.region += meta.region.is_some() as usize;
            c.event_type += meta.event_type.is_some() as usize;
            c.event_number += meta.event_number.is_some() as usize;
            c.episode += meta.episode.is_some() as usize;
            c.stage += meta.stage.is_some() as usize;
        }

        for result in results {
            if result.matched {
                stats.matched_groups += 1;
            } else {
                stats.unmatched_groups += 1;
            }
            *stats
                .by_match_basis
                .entry(result.match_basis.as_str().to_string())
                .or_default() += 1;
            if let Some(code) = result.reason_code {
                *stats.by_reason_code.entry(code.code().to_string()).or_default() += 1;
            }
        }

        if !results.is_empty() {
            stats.match_rate = stats.matched_groups as f64 / results.len() as f64;
        }
        stats
    }
}

/// Ten-point bucket label; 1.0 falls in `0.9-1.0`.
pub fn confidence_bucket(confidence: f64) -> String {
    let index = ((confidence * 10.0 + 1e-9).floor().max(0.0) as usize).min(9);
    format!("{:.1}-{:.1}", index as f64 / 10.0, (index + 1) as f64 / 10.0)
}
