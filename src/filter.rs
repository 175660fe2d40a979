//! Temporal and relevance gates applied after normalization.
//!
//! The temporal gate is deliberately strict: a record whose date could not
//! be parsed is rejected, because its recency cannot be proven. Dropping a
//! fresh-but-unparseable item is acceptable; publishing a stale one is not.
//!
//! The relevance classifier only sees records from third-party feeds. It
//! evaluates three checks in a fixed order and short-circuits on the first
//! failure: exclusion keywords win first (so an entity name cannot rescue a
//! rumor headline), then a direct-statement signal is required, then
//! evidence that the title is about the configured subject.

use chrono::NaiveDate;

use crate::config::Keywords;
use crate::models::Record;

/// Accept a record only when its date is known and within the season.
///
/// A record dated exactly at `season_start` is accepted.
pub fn within_season(record: &Record, season_start: NaiveDate) -> bool {
    match record.published_at {
        Some(date) => date >= season_start,
        None => false,
    }
}

/// Keyword-rule classifier for third-party records.
///
/// All keyword lists and the topic name are folded to lowercase once at
/// construction; titles are folded per call.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    topic: String,
    exclusion: Vec<String>,
    statement: Vec<String>,
    subject: Vec<String>,
}

impl RelevanceClassifier {
    pub fn new(topic: &str, keywords: &Keywords) -> Self {
        let fold = |list: &[String]| -> Vec<String> {
            list.iter().map(|k| k.to_lowercase()).collect()
        };
        RelevanceClassifier {
            topic: topic.to_lowercase(),
            exclusion: fold(&keywords.exclusion),
            statement: fold(&keywords.statement),
            subject: fold(&keywords.subject),
        }
    }

    /// Decide whether a third-party title is publishable.
    ///
    /// `topical_source` marks an outlet that covers the subject routinely:
    /// for those, the bare topic name counts as subject evidence. For fully
    /// generic outlets only a configured subject-entity keyword does.
    pub fn accepts(&self, title: &str, topical_source: bool) -> bool {
        let folded = title.to_lowercase();

        if self.exclusion.iter().any(|k| folded.contains(k)) {
            return false;
        }
        if !self.statement.iter().any(|k| folded.contains(k)) {
            return false;
        }

        let subject_hit = self.subject.iter().any(|k| folded.contains(k));
        if topical_source {
            subject_hit || folded.contains(&self.topic)
        } else {
            subject_hit
        }
    }
}
