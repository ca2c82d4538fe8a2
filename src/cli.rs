//! Command-line interface definitions for Awful Autoblog.
//!
//! API keys are read from `config.yaml` or the `ANTHROPIC_API_KEY` /
//! `MEDIUM_TOKEN` environment variables, never from flags.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Awful Autoblog application.
///
/// # Examples
///
/// ```sh
/// # Pick a weighted-random topic, generate and publish
/// awful_autoblog --config config.yaml
///
/// # Generate about a specific topic without publishing
/// awful_autoblog --dry-run --topic "Rust Ownership"
///
/// # Give the whole run five minutes
/// awful_autoblog --deadline-secs 300
///
/// # Dump the configured topics (YAML or topics_file) to CSV and exit
/// awful_autoblog --export-topics topics.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "AUTOBLOG_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Generate the article but don't publish it
    #[arg(long)]
    pub dry_run: bool,

    /// Specific topic to write about (overrides weighted random selection)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Path to the JSON file recording published articles
    #[arg(long, env = "AUTOBLOG_HISTORY", default_value = "articles.json")]
    pub history: PathBuf,

    /// Directory where generated articles are saved as Markdown
    #[arg(short, long, default_value = "generated")]
    pub output_dir: PathBuf,

    /// Abort generation and publishing after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Write the configured topics to this CSV file and exit
    #[arg(long, value_name = "PATH")]
    pub export_topics: Option<PathBuf>,
}
