//! List Payments Handler

use std::sync::Arc;

use jiff::Timestamp;
use rental_app::domain::payments::{DateRange, PaymentFilters, PaymentStatus};
use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    payments::{PaymentResponse, errors::into_status_error},
    state::State,
};

/// List Payments Handler
///
/// Returns the caller's payments, newest first. Administrators see all
/// users' payments.
#[endpoint(
    tags("payments"),
    summary = "List Payments",
    security(("bearer_auth" = [])),
    parameters(
        ("status" = Option<String>, Query, description = "Filter by status (Pending, Completed, Failed)"),
        ("range" = Option<String>, Query, description = "Filter by window (last7, last30, last90)"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    range: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<PaymentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let filters = PaymentFilters {
        status: status
            .into_inner()
            .map(|value| value.parse::<PaymentStatus>())
            .transpose()
            .or_400("could not parse \"status\" query parameter")?,
        date_range: range
            .into_inner()
            .map(|value| value.parse::<DateRange>())
            .transpose()
            .or_400("could not parse \"range\" query parameter")?,
    };

    let payments = state
        .payments
        .list_payments(caller, filters, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use rental_app::domain::{cars::models::CarUuid, payments::MockPaymentsService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_CALLER, make_payment, payments_service};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        payments_service(payments, Router::with_path("payments").get(handler))
    }

    #[tokio::test]
    async fn test_list_forwards_filters() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_list_payments()
            .once()
            .withf(|caller, filters, _| {
                *caller == TEST_CALLER
                    && filters.status == Some(PaymentStatus::Completed)
                    && filters.date_range == Some(DateRange::Last30)
            })
            .return_once(|caller, _, _| {
                Ok(vec![make_payment(caller.user_uuid, CarUuid::new())])
            });

        let mut res = TestClient::get("http://example.com/payments?status=Completed&range=last30")
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<PaymentResponse> = res.take_json().await?;
        assert_eq!(body.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_without_filters_passes_none() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_list_payments()
            .once()
            .withf(|_, filters, _| filters.status.is_none() && filters.date_range.is_none())
            .return_once(|_, _, _| Ok(Vec::new()));

        let res = TestClient::get("http://example.com/payments")
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_bad_status_returns_400() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_list_payments().never();

        let res = TestClient::get("http://example.com/payments?status=Paid")
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
