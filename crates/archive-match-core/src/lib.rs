pub mod analysis;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod progress;
pub mod report;
pub mod scanner;

pub use analysis::{AssetGroup, AssetGrouper, GroupKey, MatchStats};
pub use catalog::{CatalogIndex, CatalogKey};
pub use classify::FailureClassifier;
pub use config::AppConfig;
pub use engine::{MatchEngine, PipelineResult};
pub use error::Error;
pub use extract::{FieldExtractor, PatternCatalog};
pub use matcher::Matcher;
pub use model::{
    CatalogEntry, EventType, ExtractedMetadata, MatchBasis, MatchResult, RawPathRecord, ReasonCode,
    Region,
};
pub use progress::{ProgressReporter, SilentReporter};
