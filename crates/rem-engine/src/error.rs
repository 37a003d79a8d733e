use std::path::PathBuf;

use rem_loader::LoaderError;
use thiserror::Error;

/// Errors from engine operations. All of them are configuration errors
/// raised by `init`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configured source is missing, unreadable, or not valid JSON.
    #[error("configuration error: {0}")]
    Configuration(#[from] LoaderError),

    /// A configured source parsed but does not hold a JSON array.
    #[error("configuration error: file '{}' for dataset must hold a JSON array, found {found}", path.display())]
    InvalidSource { path: PathBuf, found: &'static str },
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
