//! Reserved Cars Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    cars::{CarResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Reserved Cars Handler
///
/// Lists the caller's active bookings.
#[endpoint(
    tags("cars"),
    summary = "List Reserved Cars",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<CarResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let cars = state
        .bookings
        .list_reserved(caller)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cars.into_iter().map(CarResponse::from).collect()))
}
