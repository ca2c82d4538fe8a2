//! # Awful Autoblog
//!
//! Generates one technical blog article per run with the Anthropic Messages
//! API and publishes it to Medium.
//!
//! ## Usage
//!
//! ```sh
//! awful_autoblog --config config.yaml
//! awful_autoblog --dry-run --topic "Rust Ownership"
//! ```
//!
//! ## Architecture
//!
//! Each run is a straight pipeline:
//! 1. **Topic**: `--topic`, or a weighted random pick from `config.yaml`
//! 2. **Prompt**: render the prompt template (or the built-in fallback) with
//!    topic details, style and titles already published on the topic
//! 3. **Generate**: call the API with exponential backoff, then extract the
//!    article JSON from the reply
//! 4. **Output**: save a Markdown copy, then publish (or preview on
//!    `--dry-run`) and append the result to the history file

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod generator;
mod models;
mod outputs;
mod parser;
mod prompt;
mod publish;
mod template;
mod topics;
mod utils;

use api::{AnthropicClient, CallContext};
use cli::Cli;
use config::Config;
use generator::Generator;
use models::ArticleHistory;
use outputs::history::JsonStore;
use outputs::markdown::{preview, save_article};
use publish::{MediumPublisher, Publisher};
use topics::select_topic;
use utils::word_count;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("autoblog starting up");

    // .env must be loaded before clap reads its env-backed flags
    match config::load_env_file(Path::new(".env")) {
        Ok(true) => info!("Loaded environment variables from .env"),
        Ok(false) => info!("No .env file found, using system environment variables"),
        Err(e) => warn!(error = %e, "Failed to load .env; using system environment variables"),
    }

    let args = Cli::parse();
    debug!(?args.config, ?args.history, ?args.output_dir, dry_run = args.dry_run, "Parsed CLI arguments");

    let config = Config::load(&args.config).map_err(|e| {
        error!(path = %args.config.display(), error = %e, "Failed to load config");
        e
    })?;
    info!(
        topics = config.topics.len(),
        model = %config.ai.model,
        "Configuration loaded"
    );

    if let Some(ref path) = args.export_topics {
        config.export_topics_csv(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to export topics");
            e
        })?;
        info!(path = %path.display(), topics = config.topics.len(), "Topics exported; exiting");
        return Ok(());
    }

    if config.api_keys.anthropic.is_empty() {
        error!("Anthropic API key is not configured");
        return Err("ANTHROPIC_API_KEY is required (config.yaml api_keys.anthropic or environment)".into());
    }
    if !args.dry_run && config.api_keys.medium.is_empty() {
        error!("Medium token is not configured");
        return Err("MEDIUM_TOKEN is required unless --dry-run is set".into());
    }

    // --- Cancellation: Ctrl-C and optional run deadline ---
    let mut ctx = CallContext::new();
    if let Some(secs) = args.deadline_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
        info!(deadline_secs = secs, "Run deadline set");
    }
    let interrupt_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling in-flight work");
            interrupt_ctx.cancel();
        }
    });

    let store = JsonStore::new(&args.history);
    let mut history = match store.load().await {
        Ok(h) => h,
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Failed to load article history; starting empty");
            ArticleHistory::default()
        }
    };
    info!(previous_articles = history.articles.len(), "Article history loaded");

    let topic = match args.topic {
        Some(ref t) => t.clone(),
        None => select_topic(&config.topics),
    };
    info!(%topic, "Selected topic");

    let medium_token = config.api_keys.medium.clone();
    let medium_api_url = config.medium.api_url.clone();
    let client = AnthropicClient::new(config.api_keys.anthropic.clone(), &config.ai)?;
    let generator = Generator::new(client, Arc::new(config));

    let article = generator.generate(&ctx, &topic, &history).await.map_err(|e| {
        if e.is_cancelled() {
            warn!(error = %e, "Generation interrupted");
        } else {
            error!(error = %e, "Failed to generate article");
        }
        e
    })?;
    info!(
        title = %article.title,
        words = word_count(&article.content),
        "Generated article"
    );

    match save_article(&article, &args.output_dir).await {
        Ok(path) => info!(path = %path.display(), "Article saved locally"),
        Err(e) => warn!(error = %e, "Failed to save article locally"),
    }

    if args.dry_run {
        info!("Dry run mode; skipping publish");
        println!("{}", preview(&article));
        return Ok(());
    }

    let publisher = MediumPublisher::new(medium_token)?.with_api_url(&medium_api_url)?;
    let url = publisher.publish(&ctx, &article).await.map_err(|e| {
        error!(error = %e, "Failed to publish article");
        e
    })?;
    info!(%url, "Article published");

    history.record(&topic, &article, url);
    if let Err(e) = store.save(&history).await {
        warn!(path = %store.path().display(), error = %e, "Failed to save article history");
    }

    info!(
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "autoblog finished"
    );
    Ok(())
}
