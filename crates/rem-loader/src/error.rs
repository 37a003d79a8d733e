use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading dataset sources.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The source is missing, not a regular file, or cannot be read.
    #[error("file '{}' for dataset not readable: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    /// The source was read but is not valid JSON.
    #[error("file '{}' for dataset is not valid JSON: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A dataset directory was expected.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Walking a dataset directory failed.
    #[error("cannot scan dataset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result alias for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
