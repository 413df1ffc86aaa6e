use thiserror::Error;

/// Domain errors surfaced by the channel engine.
///
/// Authorization and state-machine violations are recoverable: the web
/// layer turns them into a notification plus a redirect to the channel
/// listing. `Database` is the only fatal kind.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("you are already a member of this channel")]
    AlreadyMember,

    #[error("you have already sent a join request")]
    AlreadyPending,

    #[error("you are not a member of this channel")]
    NotMember,

    #[error("you are not authorized to perform this action")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True when the storage error is a UNIQUE constraint violation, i.e. a
/// concurrent request won the race for the same (user, channel) pair.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
