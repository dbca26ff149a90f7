use thiserror::Error;

/// Domain failures with programmatic consumers (the dispatcher and tests
/// match on these via `anyhow::Error::downcast_ref`).
#[derive(Debug, Error)]
pub(crate) enum TasError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("interactive input required but none is available")]
    InputRequired,

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("category '{0}' does not exist")]
    UnknownCategory(String),

    #[error("no user with id {0}")]
    UnknownUser(i64),

    #[error("no default user configured; run --default_user first")]
    NoDefaultUser,

    #[error("no note with id {0}")]
    NoteNotFound(i64),

    #[error("invalid id '{0}': expected a number")]
    InvalidId(String),
}
