use archive_match_core::AppConfig;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/archive-match.log";

/// Filter and log file: environment first, then `AppConfig`, then defaults.
fn log_settings(config: &AppConfig) -> (String, PathBuf) {
    let filter = env::var("TRACING_LEVEL")
        .ok()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let file = env::var("LOG_FILE_PATH")
        .ok()
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    (filter, PathBuf::from(file))
}

/// Pretty stdout plus a plain per-run log file. Keep the guard alive until
/// exit or buffered lines are lost.
pub fn init_logger(config: &AppConfig) -> WorkerGuard {
    let (filter, log_file) = log_settings(config);

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "archive-match.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_thread_names(true)
                .with_ansi(false),
        )
        .with(EnvFilter::new(filter))
        .init();

    info!("Logging to stdout and {}", log_file.display());

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_values_used_without_env() {
        if env::var("TRACING_LEVEL").is_ok() || env::var("LOG_FILE_PATH").is_ok() {
            return;
        }
        let mut config = AppConfig::default();
        assert_eq!(
            log_settings(&config),
            ("info".to_string(), PathBuf::from(DEFAULT_LOG_FILE))
        );

        config.log_level = Some("archive_match_core=debug".to_string());
        config.log_file = Some("/var/log/am.log".to_string());
        assert_eq!(
            log_settings(&config),
            ("archive_match_core=debug".to_string(), PathBuf::from("/var/log/am.log"))
        );
    }
}
