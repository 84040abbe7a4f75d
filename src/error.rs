use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while fetching, parsing, splitting or
/// caching the dataset. Nothing is retried; each variant surfaces to the
/// caller as-is.
#[derive(Debug, Error)]
pub enum DataError {
    /// Remote resource unreachable, non-success status, or the downloaded
    /// bytes could not be written.
    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("invalid source url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A directory could not be created.
    #[error("cannot create directory {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache entry could not be written, or an existing entry is unreadable.
    #[error("cache entry {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    #[error("no cached entry for partition '{partition}' (expected {})", path.display())]
    NotFound { partition: String, path: PathBuf },

    #[error("invalid partition '{0}', expected one of: train, val")]
    InvalidPartition(String),

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("invalid validation split {val_split}: {reason}")]
    InvalidSplit { val_split: f64, reason: String },
}

pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DataError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DataError::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
