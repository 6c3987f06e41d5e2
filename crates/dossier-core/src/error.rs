//! Error types for the dossier archive pipeline.

use thiserror::Error;

/// Result type alias using the dossier Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for archive, render, and report operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Folder/blob backend not configured or unreachable. Fatal to the
    /// containing upload or report request.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A path segment could not be resolved or created. Fatal to the upload.
    #[error("Folder resolution failed: {0}")]
    FolderResolution(String),

    /// One attachment could not be decoded or rasterized. Recovered locally
    /// as a placeholder in the report.
    #[error("Render error: {0}")]
    Render(String),

    /// Office-to-intermediate-format round trip failed. Recovered locally,
    /// temp copy is cleaned up regardless of outcome.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Referenced blob or handle missing. Recovered locally as a placeholder.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is scoped to a single attachment.
    ///
    /// Attachment-scoped errors degrade to an inline placeholder in the
    /// report; anything else aborts the whole request.
    pub fn is_attachment_scoped(&self) -> bool {
        matches!(
            self,
            Error::Render(_) | Error::Conversion(_) | Error::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("serialization: {}", e))
    }
}
