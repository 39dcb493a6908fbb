use thiserror::Error;

use crate::xliff::XliffError;

/// Errors surfaced by the storage adapter.
///
/// "Not found" outcomes are not errors: `get` returns `Ok(None)` and
/// `update`/`delete` are silent no-ops when nothing matches.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested locale has no entry in the configured locale-id mapping.
    #[error("Id for locale \"{locale}\" has not been configured.")]
    UnknownLocale { locale: String },

    /// The request could not be sent or its response could not be read.
    #[error("Phrase API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Phrase API answered with a non-success status.
    #[error("Phrase API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Converting a catalogue to XLIFF failed during import.
    #[error("XLIFF conversion failed: {0}")]
    Convert(#[from] XliffError),

    /// Staging the upload file on disk failed.
    #[error("failed to stage upload file: {0}")]
    Io(#[from] std::io::Error),
}
