//! Error taxonomy for a spot check run.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a run (or fail startup).
///
/// None of these are retried within a run; the next scheduled tick starts
/// over from the persisted snapshot.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Network or HTTP failure while fetching the watched page
    #[error("failed to fetch page: {0:#}")]
    Fetch(anyhow::Error),

    /// The page no longer contains one of the region markers
    #[error("marker not found in page: {marker:?}")]
    MarkerNotFound { marker: String },

    /// The language model call itself failed
    #[error("model call failed: {0:#}")]
    ModelCall(anyhow::Error),

    /// The model answered but the answer could not be decoded
    #[error("unable to parse model response: {0}")]
    ResponseParse(#[from] ResponseParseError),

    #[error("carrier domain not found for {0:?}")]
    UnknownCarrier(String),

    /// Transport, auth, or addressing failure while sending a notification
    #[error("failed to deliver notification: {0}")]
    Delivery(String),

    #[error("invalid schedule {expression:?}: {reason}")]
    ScheduleParse { expression: String, reason: String },

    /// Disk failure other than "snapshot does not exist yet"
    #[error("snapshot I/O error on {}: {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Decode failures for the model's JSON answer, kept apart for diagnostics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseParseError {
    #[error("response is not a JSON object ({reason}): {raw:?}")]
    InvalidJson { reason: String, raw: String },

    #[error("missing '{0}' field")]
    MissingField(&'static str),

    #[error("'{field}' field should be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}
