//! Error types for source fetching and artifact persistence.
//!
//! The split mirrors the recovery policy: a [`SourceError`] is absorbed
//! inside the adapter that hit it (logged, source treated as empty) and
//! never aborts a run; a [`PersistError`] is the one condition that fails
//! the run, because losing an output artifact is not recoverable.

use thiserror::Error;

/// A failure while fetching or parsing one source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure: connect, timeout, or non-success status.
    #[error("transport failure: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The source answered but its payload could not be parsed.
    #[error("malformed payload from {label}: {reason}")]
    Parse { label: String, reason: String },
}

impl SourceError {
    pub fn parse(label: &str, reason: impl ToString) -> Self {
        SourceError::Parse {
            label: label.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A failure while writing one of the run's output artifacts.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("filesystem write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization failed: {0}")]
    Encode(#[from] serde_json::Error),
}
