//! Service-layer error type.
//!
//! Every service returns [`ServiceError`]. The HTTP layer maps each variant onto a
//! status code; database errors are logged in full there and only a generic
//! message reaches the client.

use grading::GradingError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The system is refusing work, e.g. logins during maintenance.
    #[error("{0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<GradingError> for ServiceError {
    fn from(err: GradingError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    /// Turns a unique-constraint violation into [`ServiceError::Conflict`] with
    /// `msg`; any other database error passes through unchanged.
    pub fn conflict_on_unique(err: DbErr, msg: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(msg.into()),
            _ => ServiceError::Database(err),
        }
    }

    /// Like [`ServiceError::conflict_on_unique`], but an update that matched no row
    /// becomes [`ServiceError::NotFound`].
    pub fn on_update(err: DbErr, not_found: &str, conflict: &str) -> Self {
        match err {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => ServiceError::not_found(not_found),
            other => ServiceError::conflict_on_unique(other, conflict),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
