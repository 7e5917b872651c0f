//! Complete Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    payments::{PaymentResponse, errors::into_status_error},
    state::State,
};

/// Complete Payment Handler
///
/// Marks the caller's payment completed; completing an already-completed
/// payment succeeds without change.
#[endpoint(
    tags("payments"),
    summary = "Complete Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment completed"),
        (status_code = StatusCode::FORBIDDEN, description = "Payment belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Payment not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    payment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let payment = state
        .payments
        .complete_payment(caller, payment.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(payment.into()))
}
