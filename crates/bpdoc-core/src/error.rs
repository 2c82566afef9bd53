use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for documentation generation.
pub type Result<T> = std::result::Result<T, DocGenError>;

/// Errors surfaced while building or persisting documents.
#[derive(Debug, Error)]
pub enum DocGenError {
    /// Writing an artifact (or creating its directory) failed.
    #[error("failed to write '{path}': {source}")]
    Io {
        /// Path of the file or directory being written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A serializer could not encode a document.
    #[error("failed to encode {format} document: {message}")]
    Serialize {
        /// Name of the output format.
        format: String,
        message: String,
    },

    /// An output format name that no factory handles.
    #[error("unknown format: {0}. Use xml, json, or html")]
    UnknownFormat(String),

    /// Invalid generator configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DocGenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
