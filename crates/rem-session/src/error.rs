use thiserror::Error;

/// Errors from session bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A session id string could not be parsed.
    #[error("invalid session id: {0}")]
    InvalidId(String),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
