//! Records artifact: the merged collection serialized as a JSON list.
//!
//! Field order follows the [`Record`](crate::models::Record) declaration
//! so the artifact is stable across runs and diffs cleanly.

use std::path::Path;

use tracing::{info, instrument};

use crate::error::PersistError;
use crate::models::Record;
use crate::outputs::write_atomic;

/// Serialize the merged record list and write it atomically.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_records(records: &[Record], path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(records)?;
    write_atomic(path, &json).await?;
    info!(count = records.len(), "Wrote records artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_write_records_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");
        let records = vec![Record {
            title: "Conte parla alla stampa".to_string(),
            link: "https://www.sscnapoli.it/news/conte-parla/".to_string(),
            published_at: NaiveDate::from_ymd_opt(2025, 8, 3),
            display_date: "03/08/2025".to_string(),
            source_label: "SSC Napoli".to_string(),
        }];

        write_records(&records, &path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Record> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, records);
    }

    #[tokio::test]
    async fn test_empty_collection_writes_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");

        write_records(&[], &path).await.unwrap();

        let back: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(back.is_empty());
    }
}
