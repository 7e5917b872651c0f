//! Initiate Payment Handler

use std::sync::Arc;

use jiff::Timestamp;
use rental_app::domain::payments::PaymentRequest;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    payments::{PaymentResponse, errors::into_status_error},
    state::State,
};

/// Initiate Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreatePaymentRequest {
    /// Booked car UUID
    pub car_uuid: Uuid,
    pub car_name: String,
    /// Amount due in pence/cents
    pub amount: u64,
}

/// Initiate Payment Handler
///
/// Idempotent per booking occurrence: repeating the call returns the
/// existing payment with 200 instead of creating a second one.
#[endpoint(
    tags("payments"),
    summary = "Initiate Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Payment created"),
        (status_code = StatusCode::OK, description = "Existing payment returned"),
        (status_code = StatusCode::CONFLICT, description = "Car has no active booking"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Car not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePaymentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let request = json.into_inner();

    let initiated = state
        .payments
        .initiate_payment(
            caller,
            PaymentRequest {
                car_uuid: request.car_uuid.into(),
                car_name: request.car_name,
                amount: request.amount,
            },
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    if initiated.created {
        res.status_code(StatusCode::CREATED);
    }

    Ok(Json(initiated.payment.into()))
}

#[cfg(test)]
mod tests {
    use rental_app::domain::{
        cars::models::CarUuid,
        payments::{InitiatedPayment, MockPaymentsService, PaymentsServiceError},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_CALLER, make_payment, payments_service};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        payments_service(payments, Router::with_path("payments/booking").post(handler))
    }

    #[tokio::test]
    async fn test_new_payment_returns_201() -> TestResult {
        let car = CarUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .withf(move |caller, request, _| {
                *caller == TEST_CALLER && request.car_uuid == car && request.amount == 15_000
            })
            .return_once(move |caller, request, _| {
                Ok(InitiatedPayment {
                    payment: make_payment(caller.user_uuid, request.car_uuid),
                    created: true,
                })
            });

        let mut res = TestClient::post("http://example.com/payments/booking")
            .json(&json!({
                "car_uuid": car.into_uuid(),
                "car_name": "Aurora GT",
                "amount": 15000,
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: PaymentResponse = res.take_json().await?;
        assert_eq!(body.car_uuid, car.into_uuid());
        assert_eq!(body.status, "Pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_repeat_payment_returns_200() -> TestResult {
        let car = CarUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .return_once(move |caller, request, _| {
                Ok(InitiatedPayment {
                    payment: make_payment(caller.user_uuid, request.car_uuid),
                    created: false,
                })
            });

        let res = TestClient::post("http://example.com/payments/booking")
            .json(&json!({
                "car_uuid": car.into_uuid(),
                "car_name": "Aurora GT",
                "amount": 15000,
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_unbooked_car_returns_409() -> TestResult {
        let car = CarUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .return_once(|_, _, _| Err(PaymentsServiceError::NoActiveBooking));

        let res = TestClient::post("http://example.com/payments/booking")
            .json(&json!({
                "car_uuid": car.into_uuid(),
                "car_name": "Aurora GT",
                "amount": 15000,
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_returns_400() -> TestResult {
        let car = CarUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .return_once(|_, _, _| Err(PaymentsServiceError::MissingRequiredFields));

        let res = TestClient::post("http://example.com/payments/booking")
            .json(&json!({
                "car_uuid": car.into_uuid(),
                "car_name": "",
                "amount": 0,
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
