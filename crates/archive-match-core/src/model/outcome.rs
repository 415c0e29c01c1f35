use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchBasis {
    ExactKey,
    FuzzyText,
    None,
}

impl MatchBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchBasis::ExactKey => "EXACT_KEY",
            MatchBasis::FuzzyText => "FUZZY_TEXT",
            MatchBasis::None => "NONE",
        }
    }
}

/// Closed set of reasons a group could not be linked to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Pattern not recognized.
    P01,
    /// Year unextractable.
    P02,
    /// Event type unrecognized.
    P03,
    /// Episode number missing.
    P04,
    /// Catalog has no entries for the year.
    D01,
    /// No compatible event type for the year.
    M01,
    /// Similarity below threshold.
    M02,
}

impl ReasonCode {
    pub fn code(self) -> &'static str {
        match self {
            ReasonCode::P01 => "P01",
            ReasonCode::P02 => "P02",
            ReasonCode::P03 => "P03",
            ReasonCode::P04 => "P04",
            ReasonCode::D01 => "D01",
            ReasonCode::M01 => "M01",
            ReasonCode::M02 => "M02",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ReasonCode::P01 => "pattern not recognized",
            ReasonCode::P02 => "year unextractable",
            ReasonCode::P03 => "event type unrecognized",
            ReasonCode::P04 => "episode number missing",
            ReasonCode::D01 => "no catalog entries for this year",
            ReasonCode::M01 => "no compatible event type for this year",
            ReasonCode::M02 => "similarity below threshold",
        }
    }

    pub fn suggested_fix(self) -> &'static str {
        match self {
            ReasonCode::P01 => "Add a pattern rule for this naming convention",
            ReasonCode::P02 => "Put a 4-digit year in the folder or file name",
            ReasonCode::P03 => "Add an event type keyword (Main Event, Bracelet, ...) to the folder or file name",
            ReasonCode::P04 => "Add an episode number (EP01, _01_, Episode 1) to the file name",
            ReasonCode::D01 => "Add catalog entries for this year or confirm the content is not published",
            ReasonCode::M01 => "Check the event type tag against the catalog titles for this year",
            ReasonCode::M02 => "Rename the file closer to the catalog title or link it manually",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Matching stage at which a lookup gave up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchFailure {
    NoCatalogYear,
    NoCompatibleEventType,
    BelowThreshold { best_score: f64 },
}

/// Reference to a catalog entry by its position in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    pub index: usize,
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub group_id: String,
    pub matched: bool,
    pub catalog_entry_ref: Option<CatalogRef>,
    pub match_score: f64,
    pub match_basis: MatchBasis,
    pub failure: Option<MatchFailure>,
    pub reason_code: Option<ReasonCode>,
    pub reason_detail: Option<String>,
    pub suggested_fix: Option<String>,
}

impl MatchResult {
    pub fn matched(
        group_id: impl Into<String>,
        entry: CatalogRef,
        score: f64,
        basis: MatchBasis,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            matched: true,
            catalog_entry_ref: Some(entry),
            match_score: score.clamp(0.0, 1.0),
            match_basis: basis,
            failure: None,
            reason_code: None,
            reason_detail: None,
            suggested_fix: None,
        }
    }

    /// Unmatched result; `match_score` keeps the best similarity seen, if any.
    pub fn unmatched(group_id: impl Into<String>, failure: MatchFailure) -> Self {
        let best = match failure {
            MatchFailure::BelowThreshold { best_score } => best_score,
            _ => 0.0,
        };
        Self {
            group_id: group_id.into(),
            matched: false,
            catalog_entry_ref: None,
            match_score: best.clamp(0.0, 1.0),
            match_basis: MatchBasis::None,
            failure: Some(failure),
            reason_code: None,
            reason_detail: None,
            suggested_fix: None,
        }
    }
}
