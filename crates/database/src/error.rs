use models::{availability::Unavailable, conflict::Conflict, forms::ValidationError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Everything a service operation can refuse with
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The payload broke a field rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The resource addressed by the request does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A resource referenced from the payload does not exist
    #[error("{0} not found")]
    MissingReference(&'static str),

    #[error("{0}")]
    Duplicate(&'static str),

    /// Deleting would orphan dependent rows
    #[error("{0}")]
    InUse(&'static str),

    #[error(transparent)]
    Unavailable(#[from] Unavailable),

    #[error(transparent)]
    Conflict(#[from] Conflict),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::Validation(ValidationError(message.into()))
    }
}

/// The constraint message of a unique violation, if `err` is one
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

/// Maps a unique violation raised by a write to the duplicate message of the
/// first column it mentions. Anything else stays a database error.
pub(crate) fn duplicate_or_db(err: DbErr, rules: &[(&str, &'static str)]) -> ServiceError {
    if let Some(message) = unique_violation(&err)
        && let Some((_, duplicate)) = rules.iter().find(|(column, _)| message.contains(column))
    {
        return ServiceError::Duplicate(duplicate);
    }

    ServiceError::Db(err)
}

/// Maps a unique violation on the timetable indexes back to the conflict it
/// guards against
pub fn conflict_or_db(err: DbErr) -> ServiceError {
    match unique_violation(&err).and_then(|message| Conflict::from_constraint_message(&message)) {
        Some(conflict) => ServiceError::Conflict(conflict),
        None => ServiceError::Db(err),
    }
}

/// Maps a restricting foreign key that refused a delete to `InUse` with
/// `message`. Anything else stays a database error.
pub fn in_use_or_db(err: DbErr, message: &'static str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::InUse(message),
        _ => ServiceError::Db(err),
    }
}
