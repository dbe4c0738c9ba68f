//! Session error types.

use thiserror::Error;

use crawlrate_core::PlanError;

/// Errors that can occur while accumulating or finalizing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session already finalized: {0}")]
    SessionClosed(String),

    #[error("session has no requests: {0}")]
    EmptySession(String),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

pub type SessionResult<T> = Result<T, SessionError>;
