use crate::analysis::grouping::AssetGroup;
use crate::analysis::similarity::{lcs_ratio, normalize};
use crate::catalog::CatalogIndex;
use crate::config::MatchSettings;
use crate::model::{
    EventType, ExtractedMetadata, MatchBasis, MatchFailure, MatchResult, RawPathRecord, RuleTier,
};
use crate::progress::ProgressReporter;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// 1.0 is reserved for trusted exact-key matches.
pub const MAX_FUZZY_SCORE: f64 = 0.999;

/// Links asset groups to catalog entries: exact structured key first, then
/// fuzzy title similarity.
pub struct Matcher<'a> {
    index: &'a CatalogIndex,
    settings: MatchSettings,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a CatalogIndex, settings: MatchSettings) -> Self {
        Self { index, settings }
    }

    /// Matches every group in parallel; results are index-aligned with `groups`.
    pub fn match_all(
        &self,
        groups: &[AssetGroup],
        records: &[RawPathRecord],
        metadata: &[ExtractedMetadata],
        reporter: &dyn ProgressReporter,
    ) -> Vec<MatchResult> {
        let done = AtomicUsize::new(0);
        groups
            .par_iter()
            .map(|group| {
                let result = self.match_group(group, records, metadata);
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                reporter.on_match_progress(n, groups.len());
                result
            })
            .collect()
    }

    pub fn match_group(
        &self,
        group: &AssetGroup,
        records: &[RawPathRecord],
        metadata: &[ExtractedMetadata],
    ) -> MatchResult {
        let primary = group.primary(records);
        let identity = normalize(primary.stem());
        let key = &group.group_key;

        match key.year {
            None => {
                let candidates: Vec<usize> = (0..self.index.len())
                    .filter(|&pos| self.is_candidate(pos, key.event_type))
                    .collect();
                self.fuzzy(&group.group_id, &identity, &candidates, self.settings.global_threshold)
            }
            Some(year) => {
                if !self.index.has_year(year) {
                    return MatchResult::unmatched(&group.group_id, MatchFailure::NoCatalogYear);
                }

                let candidates: Vec<usize> = self
                    .index
                    .year_candidates(year)
                    .iter()
                    .copied()
                    .filter(|&pos| self.is_candidate(pos, key.event_type))
                    .collect();
                if candidates.is_empty() {
                    return MatchResult::unmatched(&group.group_id, MatchFailure::NoCompatibleEventType);
                }

                if group.event_number.is_some() || key.episode.is_some() {
                    let exact_key = (year, group.event_number, key.episode);
                    let hit = self
                        .index
                        .exact_candidates(&exact_key)
                        .iter()
                        .copied()
                        .find(|&pos| self.is_candidate(pos, key.event_type));
                    if let Some(pos) = hit {
                        let similarity = lcs_ratio(&identity, &self.index.entry(pos).normalized_title);
                        let trusted = metadata[group.primary_record].rule_tier == RuleTier::Primary;
                        let score = if trusted { 1.0 } else { similarity };
                        trace!(
                            group_id = %group.group_id,
                            catalog_id = %self.index.entry(pos).entry.id,
                            similarity,
                            "exact key match"
                        );
                        return MatchResult::matched(
                            &group.group_id,
                            self.index.catalog_ref(pos),
                            score,
                            MatchBasis::ExactKey,
                        );
                    }
                }

                self.fuzzy(
                    &group.group_id,
                    &identity,
                    &candidates,
                    self.settings.year_scoped_threshold,
                )
            }
        }
    }

    fn is_candidate(&self, position: usize, event_type: Option<EventType>) -> bool {
        let indexed = self.index.entry(position);
        !indexed.is_header && event_type_compatible(event_type, indexed.key.event_type)
    }

    /// Best-scoring candidate, earliest on ties, accepted at `score >= threshold`.
    fn fuzzy(&self, group_id: &str, identity: &str, candidates: &[usize], threshold: f64) -> MatchResult {
        let mut best: Option<(usize, f64)> = None;
        for &pos in candidates {
            let score = lcs_ratio(identity, &self.index.entry(pos).normalized_title);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((pos, score));
            }
        }

        match best {
            Some((pos, score)) if score >= threshold => {
                trace!(group_id, score, threshold, "fuzzy match");
                MatchResult::matched(
                    group_id,
                    self.index.catalog_ref(pos),
                    score.min(MAX_FUZZY_SCORE),
                    MatchBasis::FuzzyText,
                )
            }
            best => MatchResult::unmatched(
                group_id,
                MatchFailure::BelowThreshold {
                    best_score: best.map_or(0.0, |(_, score)| score),
                },
            ),
        }
    }
}

/// A group without an event type accepts anything; otherwise types must be equal.
pub fn event_type_compatible(group: Option<EventType>, candidate: Option<EventType>) -> bool {
    match group {
        None => true,
        Some(wanted) => candidate == Some(wanted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_compatibility() {
        assert!(event_type_compatible(None, Some(EventType::Gm)));
        assert!(event_type_compatible(None, None));
        assert!(event_type_compatible(Some(EventType::Me), Some(EventType::Me)));
        assert!(!event_type_compatible(Some(EventType::Me), None));
        assert!(!event_type_compatible(Some(EventType::Gm), Some(EventType::Me)));
    }
}
