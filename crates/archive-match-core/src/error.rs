use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rule file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid regex for rule '{pattern_id}': {source}")]
    InvalidRule {
        pattern_id: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    Other(String),
}
