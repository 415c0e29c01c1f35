pub mod catalog;
pub mod metadata;
pub mod outcome;
pub mod path;

pub use catalog::CatalogEntry;
pub use metadata::{
    EventType, ExtractedMetadata, FieldSource, Provenance, Region, RuleTier, UNKNOWN_PATTERN,
};
pub use outcome::{CatalogRef, MatchBasis, MatchFailure, MatchResult, ReasonCode};
pub use path::RawPathRecord;
