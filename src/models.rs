//! Data models for news records as they move through the pipeline.
//!
//! Two representations exist:
//! - [`RawRecord`]: whatever a source adapter could extract, unvalidated
//! - [`Record`]: the canonical, sentinel-filled entry produced by the
//!   normalizer and used for merging, serialization, and page rendering
//!
//! A [`Record`] is immutable once built; everything downstream (temporal
//! gate, classifier, merger, publisher) only reads it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Substituted when a title is empty or a known placeholder phrase.
pub const TITLE_SENTINEL: &str = "untitled";

/// Substituted when a source exposes no usable link.
pub const LINK_SENTINEL: &str = "#";

/// Rendered in place of a date that could not be parsed.
pub const DATE_SENTINEL: &str = "unknown date";

/// A candidate entry exactly as one source adapter extracted it.
///
/// Nothing here is trusted: the title may contain markup or be echoed
/// twice, the link may be missing or point at a non-article resource, and
/// the date may have failed to parse. The normalizer and temporal gate
/// decide what survives.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// Title text as found in the source, markup and all.
    pub title: String,
    /// Article link if the source exposed one.
    pub link: Option<String>,
    /// Publication date if the adapter could parse one.
    pub published_at: Option<NaiveDate>,
    /// Human-readable name of the source this came from.
    pub source_label: String,
}

/// A canonical news entry ready for merging and publication.
///
/// Field order is the stable serialization order of the records artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Cleaned title; never empty, [`TITLE_SENTINEL`] when unknown.
    pub title: String,
    /// Article link; [`LINK_SENTINEL`] when the source exposed none.
    pub link: String,
    /// Publication date, or `None` when it could not be parsed.
    pub published_at: Option<NaiveDate>,
    /// Human-readable rendering of `published_at` (dd/mm/yyyy), or
    /// [`DATE_SENTINEL`].
    pub display_date: String,
    /// Human-readable name of the source; not part of identity.
    pub source_label: String,
}

impl Record {
    /// Identity key for cross-source deduplication.
    ///
    /// Case-folded, whitespace-collapsed title, combined with the link when
    /// a real link is present. Two records with the same key are the same
    /// story regardless of which source labeled them.
    pub fn dedup_key(&self) -> String {
        let mut key = self
            .title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if self.link != LINK_SENTINEL {
            key.push('|');
            key.push_str(&self.link);
        }
        key
    }

    /// Render a date the way the published page shows them.
    pub fn format_display_date(date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => d.format("%d/%m/%Y").to_string(),
            None => DATE_SENTINEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, link: &str) -> Record {
        Record {
            title: title.to_string(),
            link: link.to_string(),
            published_at: None,
            display_date: DATE_SENTINEL.to_string(),
            source_label: "Test".to_string(),
        }
    }

    #[test]
    fn test_dedup_key_case_folds_and_collapses() {
        let a = record("Conte  parla alla   stampa", "#");
        let b = record("conte parla alla stampa", "#");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_includes_real_link() {
        let a = record("Match report", "https://example.com/a");
        let b = record("Match report", "https://example.com/b");
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_ignores_sentinel_link() {
        let a = record("Match report", "#");
        assert_eq!(a.dedup_key(), "match report");
    }

    #[test]
    fn test_format_display_date() {
        let d = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        assert_eq!(Record::format_display_date(Some(d)), "03/08/2025");
        assert_eq!(Record::format_display_date(None), DATE_SENTINEL);
    }

    #[test]
    fn test_record_serialization_field_order() {
        let r = Record {
            title: "Title".to_string(),
            link: "#".to_string(),
            published_at: NaiveDate::from_ymd_opt(2025, 8, 1),
            display_date: "01/08/2025".to_string(),
            source_label: "SSC Napoli".to_string(),
        };
        let json = serde_json::to_string(&r).unwrap();
        let title_pos = json.find("\"title\"").unwrap();
        let link_pos = json.find("\"link\"").unwrap();
        let date_pos = json.find("\"published_at\"").unwrap();
        assert!(title_pos < link_pos && link_pos < date_pos);
        assert!(json.contains("2025-08-01"));
    }
}
