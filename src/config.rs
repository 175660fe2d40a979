//! Run configuration, loaded once at startup from a YAML file.
//!
//! Everything subject-specific lives here: source URLs, the season-start
//! cutoff, keyword lists for the relevance classifier, the region markers
//! of the published page, and output paths. Defaults reproduce the SSC
//! Napoli job this tool was built for, so a minimal config only needs the
//! source URLs, the cutoff date, and the two output paths.
//!
//! ```yaml
//! season_start: 2025-07-01
//! primary_chain:
//!   - kind: feed
//!     label: SSC Napoli
//!     url: https://www.sscnapoli.it/feed/
//!   - kind: page
//!     label: SSC Napoli (fallback)
//!     url: https://www.sscnapoli.it/news/
//! secondary_feeds:
//!   - label: Tuttomercatoweb
//!     url: https://www.tuttomercatoweb.com/rss
//!   - label: Napoli Magazine
//!     url: https://www.napolimagazine.com/rss
//!     topical: true
//! records_path: out/news.json
//! page_path: site/index.html
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

/// Immutable configuration for one run.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Ordered primary chain; the first source with usable records wins.
    pub primary_chain: Vec<SourceSpec>,
    /// Third-party feeds whose records must pass the relevance classifier.
    #[serde(default)]
    pub secondary_feeds: Vec<SecondaryFeed>,
    /// Records published before this date are dropped.
    pub season_start: NaiveDate,
    /// Per-source cap on fetched items.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Per-request timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Subject of the aggregation, matched case-insensitively in titles.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Keyword lists driving the relevance classifier.
    #[serde(default)]
    pub keywords: Keywords,
    /// Literal strings bounding the owned region of the published page.
    #[serde(default)]
    pub markers: RegionMarkers,
    /// Path of the serialized records artifact.
    pub records_path: PathBuf,
    /// Path of the persisted HTML page to patch.
    pub page_path: PathBuf,
}

/// One entry of the primary chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    /// A structured RSS/Atom feed.
    Feed { label: String, url: String },
    /// A rendered page scraped for repeating article containers.
    Page { label: String, url: String },
}

/// A third-party feed gated by the relevance classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct SecondaryFeed {
    pub label: String,
    pub url: String,
    /// A topical outlet covers the subject routinely, so the bare topic
    /// name in a title is accepted as subject evidence. Generic outlets
    /// need a configured subject-entity keyword instead.
    #[serde(default)]
    pub topical: bool,
}

/// Keyword lists for the relevance classifier, matched case-insensitively.
#[derive(Debug, Clone, Deserialize)]
pub struct Keywords {
    /// Speculative/rumor signals; any hit rejects the record outright.
    pub exclusion: Vec<String>,
    /// Direct-statement signals; at least one is required.
    pub statement: Vec<String>,
    /// Subject entities (people, officials) tied to the topic.
    pub subject: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords {
            exclusion: [
                "rumor", "rumour", "indiscrezione", "indiscrezioni", "ipotesi",
                "sondaggio", "voci", "accostato", "linked with",
            ]
            .map(String::from)
            .to_vec(),
            statement: [
                "parla", "intervista", "conferenza", "dichiara", "le parole",
                "ha detto", "annuncia", "says", "press conference", "interview",
            ]
            .map(String::from)
            .to_vec(),
            subject: [
                "conte", "de laurentiis", "adl", "lukaku", "mctominay",
                "di lorenzo", "politano", "maradona",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Literal anchor strings for the page region owned by the publisher.
///
/// Treated as opaque text, never as markup.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionMarkers {
    pub start: String,
    pub end: String,
}

impl Default for RegionMarkers {
    fn default() -> Self {
        RegionMarkers {
            start: "<!-- NEWS:START -->".to_string(),
            end: "<!-- NEWS:END -->".to_string(),
        }
    }
}

fn default_max_items() -> usize {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_topic() -> String {
    "napoli".to_string()
}

impl Config {
    /// Load and deserialize the config file.
    pub fn load(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&raw)?;
        info!(
            path = %path.display(),
            primary_sources = config.primary_chain.len(),
            secondary_feeds = config.secondary_feeds.len(),
            season_start = %config.season_start,
            "Loaded configuration"
        );
        Ok(config)
    }
}
