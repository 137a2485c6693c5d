//! Rotation error types.

use thiserror::Error;

/// Errors that can occur during rotation operations.
///
/// Every variant except `Store` is a precondition failure: nothing was
/// written and the caller may retry once the queue changes.
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("no singer is currently on stage")]
    NoActivePerformer,

    #[error("skip needs exactly one singer on stage and one up next")]
    InsufficientQueue,

    #[error("at least two singers are needed to start the show (have {0})")]
    InsufficientSingers(usize),

    #[error("the show is already running; use force to restart it")]
    ShowInProgress,

    #[error("singer name must not be empty")]
    EmptyName,

    #[error("store error: {0}")]
    Store(#[from] kj_store::StoreError),
}

pub type RotationResult<T> = Result<T, RotationError>;
