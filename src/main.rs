//! # Azzurri News
//!
//! A batch news aggregator for a single subject (SSC Napoli by default)
//! that pulls candidate items from a prioritized chain of sources, merges
//! them into one ordered collection, and publishes the result.
//!
//! ## Pipeline
//!
//! 1. **Primary resolution**: try the official feed, then the scraped
//!    club-site page; the first source with usable records wins
//! 2. **Secondary collection**: fetch every third-party feed and keep only
//!    records passing the keyword relevance classifier
//! 3. **Merge**: dedup across sources, order by date descending
//! 4. **Publish**: write the records JSON artifact and patch the
//!    marker-bounded region of the persisted site page
//!
//! Individual source failures are absorbed (logged, treated as empty);
//! only a failure to persist an output artifact fails the run.
//!
//! ## Usage
//!
//! ```sh
//! azzurri_news --config ./azzurri_news.yaml
//! ```

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod filter;
mod merge;
mod models;
mod normalize;
mod outputs;
mod sources;

use cli::Cli;
use config::Config;
use filter::RelevanceClassifier;
use merge::{collect_secondary, merge_records, resolve_primary};
use outputs::{json, page};
use sources::PrimaryAdapter;

/// The club site serves different markup to unidentified clients, so the
/// scraper announces itself as a desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[tokio::main]
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
    info!("azzurri_news starting up");

    let args = Cli::parse();
    let config = Config::load(Path::new(&args.config))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;

    // ---- Primary slot: fallback chain, first non-empty wins ----
    let chain: Vec<PrimaryAdapter> = config
        .primary_chain
        .iter()
        .map(PrimaryAdapter::from_spec)
        .collect();
    let primary = resolve_primary(&chain, &client, config.max_items, config.season_start).await;
    if primary.is_empty() {
        warn!("Every primary source came up empty; continuing with secondary feeds only");
    }

    // ---- Secondary slot: classifier-gated third-party feeds ----
    let classifier = RelevanceClassifier::new(&config.topic, &config.keywords);
    let secondary = collect_secondary(
        &config.secondary_feeds,
        &client,
        config.max_items,
        config.season_start,
        &classifier,
    )
    .await;

    let records = merge_records(primary, secondary);
    info!(count = records.len(), "Merged news collection");

    // ---- Persist both artifacts; these are the only fatal failures ----
    json::write_records(&records, &config.records_path).await?;

    let fragment = page::render_fragment(&records);
    let outcome = page::publish_page(&config.page_path, &config.markers, &fragment).await?;

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        records = records.len(),
        patch = ?outcome,
        "Execution complete"
    );

    Ok(())
}
