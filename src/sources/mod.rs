//! Source adapters for fetching raw news candidates.
//!
//! One submodule per source kind:
//!
//! | Kind | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | Structured feed | [`feed`] | RSS/Atom over HTTP | Official club feed and third-party outlets |
//! | Rendered page | [`site`] | HTML scraping | Club site news page, used as primary fallback |
//!
//! Adapters share one contract: `fetch(client, limit)` yields at most
//! `limit` [`RawRecord`]s and never fails the run. Transport errors,
//! timeouts, and unparseable payloads are logged and surfaced as an empty
//! batch; the fallback sequencer treats empty as "try the next source".

pub mod feed;
pub mod site;

use reqwest::Client;

use crate::config::SourceSpec;
use crate::models::RawRecord;
use feed::FeedSource;
use site::PageSource;

/// A configured entry of the primary fallback chain.
#[derive(Debug)]
pub enum PrimaryAdapter {
    Feed(FeedSource),
    Page(PageSource),
}

impl PrimaryAdapter {
    pub fn from_spec(spec: &SourceSpec) -> Self {
        match spec {
            SourceSpec::Feed { label, url } => PrimaryAdapter::Feed(FeedSource {
                label: label.clone(),
                url: url.clone(),
            }),
            SourceSpec::Page { label, url } => PrimaryAdapter::Page(PageSource {
                label: label.clone(),
                url: url.clone(),
            }),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PrimaryAdapter::Feed(s) => &s.label,
            PrimaryAdapter::Page(s) => &s.label,
        }
    }

    pub async fn fetch(&self, client: &Client, limit: usize) -> Vec<RawRecord> {
        match self {
            PrimaryAdapter::Feed(s) => s.fetch(client, limit).await,
            PrimaryAdapter::Page(s) => s.fetch(client, limit).await,
        }
    }
}
