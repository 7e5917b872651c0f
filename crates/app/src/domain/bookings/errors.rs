//! Booking service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("car not found")]
    NotFound,

    #[error("car is already booked")]
    AlreadyBooked,

    #[error("caller has no user profile")]
    UserNotFound,

    #[error("booking and return dates are required")]
    MissingDates,

    #[error("booking date is in the past")]
    StartDateInPast,

    #[error("return date is in the past")]
    ReturnDateInPast,

    #[error("return date is before the booking date")]
    ReturnBeforeStart,

    #[error("car is not booked")]
    NotBooked,

    #[error("booking belongs to another user")]
    NotOwner,

    #[error("caller is not an administrator")]
    Forbidden,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for BookingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyBooked,
            Some(ErrorKind::CheckViolation) => Self::ReturnBeforeStart,
            Some(ErrorKind::ForeignKeyViolation) => Self::UserNotFound,
            Some(ErrorKind::NotNullViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
