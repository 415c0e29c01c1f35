use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "archive-match")]
#[command(about = "Match video archive files against the published episode catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract, group and match the archive, then write reports
    Run {
        /// Read paths from a `full_path,size_bytes` CSV instead of scanning
        #[arg(long)]
        paths: Option<PathBuf>,
        /// Catalog CSV (overrides `catalog_path`)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Report directory (overrides `output_dir`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print extracted metadata for the given paths
    Extract {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Scan configured archive roots and print file counts
    Scan,
    /// Print configuration values
    PrintConfig,
    /// List primary and fallback pattern rules in evaluation order
    ListRules,
}
