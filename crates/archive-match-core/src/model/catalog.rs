use serde::{Deserialize, Serialize};

/// One entry of the external episode catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub duration_secs: Option<u32>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            collection: None,
            season: None,
            duration_secs: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    /// Collection or season header rows such as `2024 WSOP | Episodes`.
    pub fn is_header(&self) -> bool {
        let title = self.title.trim_end();
        title.ends_with("| Episodes") || title.ends_with("| Livestreams")
    }
}
