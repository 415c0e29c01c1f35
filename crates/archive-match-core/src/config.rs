use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_YEAR_SCOPED_THRESHOLD: f64 = 0.35;
pub const DEFAULT_GLOBAL_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub archive_roots: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    #[serde(default)]
    pub exclusions: ExclusionConfig,
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub paths_csv: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Optional TOML file with extra pattern rules.
    #[serde(default)]
    pub rules_file: Option<String>,
    #[serde(default = "default_fallback_categories")]
    pub fallback_categories: Vec<String>,
    #[serde(default)]
    pub matching: MatchSettings,
    /// Tracing filter; `TRACING_LEVEL` takes precedence.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Log file; `LOG_FILE_PATH` takes precedence.
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Similarity thresholds for the fuzzy phase of the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MatchSettings {
    #[serde(default = "default_year_scoped_threshold")]
    pub year_scoped_threshold: f64,
    #[serde(default = "default_global_threshold")]
    pub global_threshold: f64,
}

/// File-level exclusions applied while scanning.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExclusionConfig {
    #[serde(default)]
    pub min_size_bytes: Option<u64>,
    #[serde(default)]
    pub max_size_bytes: Option<u64>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            year_scoped_threshold: DEFAULT_YEAR_SCOPED_THRESHOLD,
            global_threshold: DEFAULT_GLOBAL_THRESHOLD,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            archive_roots: Vec::new(),
            ignore_patterns: Vec::new(),
            video_extensions: default_video_extensions(),
            exclusions: ExclusionConfig::default(),
            catalog_path: None,
            paths_csv: None,
            output_dir: default_output_dir(),
            rules_file: None,
            fallback_categories: default_fallback_categories(),
            matching: MatchSettings::default(),
            log_level: None,
            log_file: None,
        }
    }
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mkv", "mov", "avi", "wmv", "m4v", "mxf"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output_dir() -> String {
    "./reports".to_string()
}

fn default_fallback_categories() -> Vec<String> {
    vec!["WSOP".to_string()]
}

fn default_year_scoped_threshold() -> f64 {
    DEFAULT_YEAR_SCOPED_THRESHOLD
}

fn default_global_threshold() -> f64 {
    DEFAULT_GLOBAL_THRESHOLD
}

/// Load `Config.toml` (optional) overlaid with `ARCHIVE_MATCH__*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("ARCHIVE_MATCH").separator("__"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Drops every directory that lies under another directory in the list, so
/// no subtree is walked twice. Order of first appearance is kept.
pub fn non_overlapping_directories(dirs: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for dir in dirs {
        let dir_path = Path::new(&dir);
        if result.iter().any(|kept| dir_path.starts_with(Path::new(kept))) {
            continue;
        }
        result.retain(|kept| !Path::new(kept).starts_with(dir_path));
        result.push(dir);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_overlapping_drops_nested_root() {
        let dirs = vec![
            "/mnt/archive".to_string(),
            "/mnt/archive/WSOP".to_string(),
            "/mnt/origin".to_string(),
        ];
        let result = non_overlapping_directories(dirs);
        assert_eq!(result.len(), 2);
        assert!(result.contains(&"/mnt/archive".to_string()));
        assert!(result.contains(&"/mnt/origin".to_string()));
    }

    #[test]
    fn test_non_overlapping_parent_listed_after_child() {
        let dirs = vec!["/mnt/archive/WSOP".to_string(), "/mnt/archive".to_string()];
        let result = non_overlapping_directories(dirs);
        assert_eq!(result, vec!["/mnt/archive".to_string()]);
    }

    #[test]
    fn test_non_overlapping_parent_after_several_children() {
        let dirs = vec![
            "/a/x".to_string(),
            "/a/y".to_string(),
            "/b".to_string(),
            "/a".to_string(),
            "/a/z".to_string(),
        ];
        let result = non_overlapping_directories(dirs);
        assert_eq!(result, vec!["/b".to_string(), "/a".to_string()]);
    }

    #[test]
    fn test_default_settings_match_documented_thresholds() {
        let config = AppConfig::default();
        assert_eq!(config.matching.year_scoped_threshold, 0.35);
        assert_eq!(config.matching.global_threshold, 0.5);
        assert_eq!(config.fallback_categories, vec!["WSOP".to_string()]);
        assert!(config.video_extensions.contains(&"mxf".to_string()));
    }

    #[test]
    fn test_empty_config_deserializes_with_defaults() {
        let config: AppConfig = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(config.archive_roots.is_empty());
        assert_eq!(config.output_dir, "./reports");
    }
}
