//! Cancel Booking Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{cars::errors::into_status_error, extensions::*, state::State};

/// Cancel Booking Handler
#[endpoint(
    tags("cars"),
    summary = "Cancel Booking",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Booking cancelled"),
        (status_code = StatusCode::CONFLICT, description = "Car is not booked"),
        (status_code = StatusCode::FORBIDDEN, description = "Booking belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Car not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    car: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    state
        .bookings
        .cancel_booking(caller, car.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use rental_app::domain::{
        bookings::{BookingsServiceError, MockBookingsService},
        cars::models::CarUuid,
    };
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_CALLER, bookings_service};

    use super::*;

    fn make_service(bookings: MockBookingsService) -> Service {
        bookings_service(
            bookings,
            Router::with_path("cars/{car}/cancel").post(handler),
        )
    }

    #[tokio::test]
    async fn test_cancel_success_returns_204() -> TestResult {
        let car = CarUuid::new();

        let mut bookings = MockBookingsService::new();

        bookings
            .expect_cancel_booking()
            .once()
            .withf(move |caller, cancelled| *caller == TEST_CALLER && *cancelled == car)
            .return_once(|_, _| Ok(()));

        let res = TestClient::post(format!("http://example.com/cars/{car}/cancel"))
            .send(&make_service(bookings))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_unbooked_returns_409() -> TestResult {
        let car = CarUuid::new();

        let mut bookings = MockBookingsService::new();

        bookings
            .expect_cancel_booking()
            .once()
            .return_once(|_, _| Err(BookingsServiceError::NotBooked));

        let res = TestClient::post(format!("http://example.com/cars/{car}/cancel"))
            .send(&make_service(bookings))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_foreign_booking_returns_403() -> TestResult {
        let car = CarUuid::new();

        let mut bookings = MockBookingsService::new();

        bookings
            .expect_cancel_booking()
            .once()
            .return_once(|_, _| Err(BookingsServiceError::NotOwner));

        let res = TestClient::post(format!("http://example.com/cars/{car}/cancel"))
            .send(&make_service(bookings))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
