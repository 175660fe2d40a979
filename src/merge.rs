//! Fallback sequencing and cross-source merging.
//!
//! The primary chain is resolved by trying each adapter in configured
//! order and keeping the first one whose records survive normalization and
//! the temporal gate; later adapters are never fetched. Secondary feeds
//! are all consulted, gated additionally by the relevance classifier, and
//! merged behind the primary set so that a story reported by both keeps
//! the primary source's labeling.

use std::cmp::Reverse;
use std::future::Future;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use reqwest::Client;
use tracing::info;

use crate::config::SecondaryFeed;
use crate::filter::{RelevanceClassifier, within_season};
use crate::models::Record;
use crate::normalize::normalize;
use crate::sources::PrimaryAdapter;
use crate::sources::feed::FeedSource;

/// Await attempts in order and keep the first non-empty result.
///
/// Futures are created lazily by the iterator, so attempts after the
/// winning one are never started.
pub async fn first_non_empty<Fut>(attempts: impl IntoIterator<Item = Fut>) -> Vec<Record>
where
    Fut: Future<Output = Vec<Record>>,
{
    for attempt in attempts {
        let records = attempt.await;
        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}

/// Resolve the primary slot from the configured fallback chain.
pub async fn resolve_primary(
    chain: &[PrimaryAdapter],
    client: &Client,
    limit: usize,
    season_start: NaiveDate,
) -> Vec<Record> {
    first_non_empty(chain.iter().map(|adapter| async move {
        let raw = adapter.fetch(client, limit).await;
        let fetched = raw.len();
        let kept: Vec<Record> = raw
            .into_iter()
            .filter_map(normalize)
            .filter(|r| within_season(r, season_start))
            .collect();
        if kept.is_empty() {
            info!(
                label = adapter.label(),
                fetched,
                "Primary source yielded nothing usable; trying next in chain"
            );
        } else {
            info!(label = adapter.label(), fetched, kept = kept.len(), "Primary source resolved");
        }
        kept
    }))
    .await
}

/// Collect classifier-approved records from every secondary feed.
pub async fn collect_secondary(
    feeds: &[SecondaryFeed],
    client: &Client,
    limit: usize,
    season_start: NaiveDate,
    classifier: &RelevanceClassifier,
) -> Vec<Record> {
    stream::iter(feeds)
        .then(|feed| async move {
            let source = FeedSource {
                label: feed.label.clone(),
                url: feed.url.clone(),
            };
            let raw = source.fetch(client, limit).await;
            let fetched = raw.len();
            let kept: Vec<Record> = raw
                .into_iter()
                .filter_map(normalize)
                .filter(|r| within_season(r, season_start))
                .filter(|r| classifier.accepts(&r.title, feed.topical))
                .collect();
            info!(label = %feed.label, fetched, kept = kept.len(), "Classified secondary feed");
            kept
        })
        .collect::<Vec<Vec<Record>>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Union primary and secondary records into the final ordered collection.
///
/// Duplicates (same [`Record::dedup_key`]) keep the first occurrence, so a
/// story present in both sets keeps the primary labeling. Ordering is by
/// publication date descending; a record without a date (which the
/// temporal gate should have dropped already) sorts as the oldest possible
/// value rather than failing. The sort is stable, so equal dates keep
/// their first-seen order.
pub fn merge_records(primary: Vec<Record>, secondary: Vec<Record>) -> Vec<Record> {
    let mut merged: Vec<Record> = primary
        .into_iter()
        .chain(secondary)
        .unique_by(|r| r.dedup_key())
        .collect();
    merged.sort_by_key(|r| Reverse(r.published_at.unwrap_or(NaiveDate::MIN)));
    merged
}
