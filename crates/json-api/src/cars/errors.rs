//! Booking error mapping.

use rental_app::domain::bookings::BookingsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: BookingsServiceError) -> StatusError {
    match error {
        BookingsServiceError::NotFound => StatusError::not_found().brief("Car not found"),
        BookingsServiceError::AlreadyBooked => {
            StatusError::conflict().brief("Car is already booked")
        }
        BookingsServiceError::NotBooked => StatusError::conflict().brief("Car is not booked"),
        BookingsServiceError::UserNotFound => {
            StatusError::not_found().brief("No profile for caller")
        }
        BookingsServiceError::MissingDates
        | BookingsServiceError::StartDateInPast
        | BookingsServiceError::ReturnDateInPast
        | BookingsServiceError::ReturnBeforeStart => {
            StatusError::bad_request().brief(error.to_string())
        }
        BookingsServiceError::NotOwner | BookingsServiceError::Forbidden => {
            StatusError::forbidden()
        }
        BookingsServiceError::Sql(source) => {
            error!("booking storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
