//! JSON import and export files.
//!
//! The file format is a single object `{ "topics": [...], "cards": [...] }`.
//! Either key may be missing, in which case it reads as an empty list.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::deck::ImportPayload;

/// Errors reading or writing import/export files.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The file could not be read or written.
    #[error(
        "cannot access '{path}': {source}\n  Suggestion: Check that the path exists and is accessible"
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a valid payload.
    #[error(
        "invalid import file: {source}\n  Suggestion: Expected a JSON object with \"topics\" and \"cards\" arrays"
    )]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

impl TransferError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Parses a payload from JSON text.
///
/// # Errors
///
/// Returns [`TransferError::Json`] when `content` is not a payload object.
pub fn parse_payload(content: &str) -> Result<ImportPayload, TransferError> {
    serde_json::from_str(content).map_err(|source| TransferError::Json { source })
}

/// Reads a payload from a JSON file.
///
/// # Errors
///
/// Returns [`TransferError::Io`] if the file cannot be read and
/// [`TransferError::Json`] if its content is not a payload.
#[instrument]
pub fn read_payload(path: &Path) -> Result<ImportPayload, TransferError> {
    let content = std::fs::read_to_string(path).map_err(|e| TransferError::io(path, e))?;
    let payload = parse_payload(&content)?;
    debug!(
        topics = payload.topics.len(),
        cards = payload.cards.len(),
        "Read import file"
    );
    Ok(payload)
}

/// Writes `payload` to `path` as pretty-printed JSON, replacing any existing file.
///
/// # Errors
///
/// Returns [`TransferError::Io`] if the file cannot be written.
#[instrument(skip(payload))]
pub fn write_payload(path: &Path, payload: &ImportPayload) -> Result<(), TransferError> {
    let mut json =
        serde_json::to_string_pretty(payload).map_err(|source| TransferError::Json { source })?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| TransferError::io(path, e))
}
