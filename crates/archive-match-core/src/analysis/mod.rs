pub mod grouping;
pub mod similarity;
pub mod stats;

pub use grouping::{display_title, group_label, AssetGroup, AssetGrouper, GroupKey};
pub use stats::{FieldCoverage, MatchStats};
