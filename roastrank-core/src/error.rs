use thiserror::Error;

/// Errors surfaced by the domain flows.
///
/// `InvalidArgument` always signals a caller bug and is never recovered
/// internally. `StoreUnavailable` is transient and left to the caller's
/// retry policy. `ConflictRetryExhausted` means a vote race could not be
/// reconciled after the single built-in retry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("vote conflict not resolved after retry")]
    ConflictRetryExhausted,
}

/// Failures reported by a store implementation.
///
/// `Conflict` maps the store's uniqueness-constraint violation on
/// (voter, roast); everything else is `Unavailable`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("concurrent vote modification")]
    Conflict,

    #[error("store operation failed")]
    Unavailable(#[source] anyhow::Error),
}
