//! Error types for the core library.

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration (credentials or sender list).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sender list document could not be parsed.
    #[error("Invalid sender list: {0}")]
    SenderList(#[from] serde_json::Error),

    /// Mail session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The final expunge failed after messages were marked for deletion.
    ///
    /// Marks may or may not have taken effect server-side; the counts
    /// reflect what was achieved before the failure.
    #[error(
        "Expunge failed after marking messages (marked: {deleted}, failed: {failed}): {source}"
    )]
    Deletion {
        /// Messages successfully marked `\Deleted` before the failure.
        deleted: usize,
        /// Messages whose mark command failed.
        failed: usize,
        /// The underlying session failure.
        source: SessionError,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
