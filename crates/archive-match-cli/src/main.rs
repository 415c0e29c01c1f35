mod commands;
mod logging;
mod progress;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use archive_match_core::catalog::load_catalog_csv;
use archive_match_core::model::ExtractedMetadata;
use archive_match_core::report::{write_results_csv, write_stats_json};
use archive_match_core::scanner::load_paths_csv;
use archive_match_core::{AppConfig, MatchEngine, PipelineResult};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let config = match archive_match_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {}", "Error loading configuration:".red(), err);
            process::exit(1);
        }
    };

    let _guard = logging::init_logger(&config);

    let args = Cli::parse();

    let outcome = match args.command {
        Some(Commands::Run { paths, catalog, out }) => run_pipeline(config, paths, catalog, out),
        Some(Commands::Extract { paths }) => run_extract(config, &paths),
        Some(Commands::Scan) => run_scan(config),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        Some(Commands::ListRules) => run_list_rules(config),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_pipeline(
    config: AppConfig,
    paths: Option<PathBuf>,
    catalog: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let paths = paths.or_else(|| config.paths_csv.as_ref().map(PathBuf::from));
    let catalog = catalog.or_else(|| config.catalog_path.as_ref().map(PathBuf::from));
    let out = out.unwrap_or_else(|| PathBuf::from(&config.output_dir));

    let engine = MatchEngine::from_config(config).context("building pattern catalog")?;
    let reporter = CliReporter::new();

    let records = match &paths {
        Some(path) => load_paths_csv(path).with_context(|| format!("reading {}", path.display()))?,
        None => engine.scan(&reporter).context("scanning archive roots")?.records,
    };

    let entries = match &catalog {
        Some(path) => {
            load_catalog_csv(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            warn!("No catalog configured; every keyed group will report D01");
            Vec::new()
        }
    };

    let result = engine.run(records, entries, &reporter);
    write_reports(&out, &result)?;
    print_summary(&result);
    Ok(())
}

fn write_reports(out: &Path, result: &PipelineResult) -> Result<()> {
    let csv_path = out.join("match_results.csv");
    write_results_csv(&csv_path, &result.groups, &result.results, &result.records)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    let json_path = out.join("match_stats.json");
    write_stats_json(&json_path, &result.stats)
        .with_context(|| format!("writing {}", json_path.display()))?;
    Ok(())
}

fn print_summary(result: &PipelineResult) {
    let stats = &result.stats;
    println!();
    info!(
        "Extract: {}, Group: {}, Index: {}, Match: {}",
        format!("{:.2}s", result.extract_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.group_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.index_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.match_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files in {} groups, {} matched ({}), {} unmatched",
        format!("{}", stats.total_files).cyan(),
        format!("{}", stats.total_groups).cyan(),
        format!("{}", stats.matched_groups).green(),
        format!("{:.1}%", stats.match_rate * 100.0).green(),
        format!("{}", stats.unmatched_groups).red(),
    );
    for (code, count) in &stats.by_reason_code {
        info!("  {} {}", code.yellow(), count);
    }
}

fn run_extract(config: AppConfig, paths: &[String]) -> Result<()> {
    let engine = MatchEngine::from_config(config).context("building pattern catalog")?;
    for path in paths {
        let meta = engine.extractor().extract_path(path);
        print_metadata(path, &meta);
    }
    Ok(())
}

fn print_metadata(path: &str, meta: &ExtractedMetadata) {
    let pattern = if meta.is_unknown() {
        meta.pattern_id.red()
    } else {
        meta.pattern_id.green()
    };
    println!("{}", path.bold());
    println!("  pattern     {} ({:?}, {:.2})", pattern, meta.rule_tier, meta.confidence);
    println!("  year        {}", show(meta.year));
    println!("  region      {}", show(meta.region));
    println!("  event type  {}", show(meta.event_type));
    println!("  event #     {}", show(meta.event_number));
    println!("  episode     {}", show(meta.episode));
    println!("  stage       {}", show(meta.stage.as_deref()));
    println!("  part        {}", show(meta.part));
    println!("  buy-in      {}", show(meta.buyin.as_deref()));
    println!("  version     {}", show(meta.version.as_deref()));
    println!("  category    {}", show(meta.category.as_deref()));
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".dimmed().to_string(), |v| v.to_string())
}

fn run_scan(config: AppConfig) -> Result<()> {
    if config.archive_roots.is_empty() {
        warn!("No archive_roots configured");
    }
    let engine = MatchEngine::new(config, Default::default());
    let outcome = engine.scan(&CliReporter::new()).context("scanning archive roots")?;
    info!(
        "{} video files, {} excluded, {} other files",
        format!("{}", outcome.records.len()).green(),
        format!("{}", outcome.excluded.len()).yellow(),
        format!("{}", outcome.non_video).dimmed(),
    );
    for excluded in &outcome.excluded {
        info!("  excluded {} ({:?})", excluded.path, excluded.reason);
    }
    Ok(())
}

fn run_list_rules(config: AppConfig) -> Result<()> {
    let engine = MatchEngine::from_config(config).context("building pattern catalog")?;
    let catalog = engine.extractor().catalog();
    for rule in catalog.rules() {
        println!(
            "{:<28} {:.2}  {}",
            rule.pattern_id.green(),
            rule.base_confidence,
            rule.regex.as_str()
        );
    }
    println!(
        "\nFallbacks (categories: {}):",
        catalog.fallback_categories().join(", ")
    );
    for rule in catalog.fallbacks() {
        println!("{:<28} {:.2}", rule.pattern_id.yellow(), rule.base_confidence);
    }
    Ok(())
}
