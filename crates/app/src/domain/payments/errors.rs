//! Payment service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("missing required data")]
    MissingRequiredFields,

    #[error("car not found")]
    CarNotFound,

    #[error("car has no active booking")]
    NoActiveBooking,

    #[error("payment not found")]
    NotFound,

    #[error("payment belongs to another user")]
    NotOwner,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::CarNotFound,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredFields,
            Some(ErrorKind::UniqueViolation | ErrorKind::CheckViolation | ErrorKind::Other | _)
            | None => Self::Sql(error),
        }
    }
}
