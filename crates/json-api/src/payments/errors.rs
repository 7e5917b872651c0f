//! Payment error mapping.

use rental_app::domain::payments::PaymentsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::MissingRequiredFields => {
            StatusError::bad_request().brief("Missing required payment fields")
        }
        PaymentsServiceError::CarNotFound => StatusError::not_found().brief("Car not found"),
        PaymentsServiceError::NoActiveBooking => {
            StatusError::conflict().brief("Car has no active booking")
        }
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Payment not found"),
        PaymentsServiceError::NotOwner => StatusError::forbidden(),
        PaymentsServiceError::Sql(source) => {
            error!("payment storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
