//! Session error types.

use super::messages::SessionId;
use thiserror::Error;

/// Session errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session actor has shut down
    #[error("Session {0} is closed")]
    Closed(SessionId),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
