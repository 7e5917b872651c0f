//! Set Car Availability Handler (admin override)

use std::sync::Arc;

use rental_app::domain::bookings::{AvailabilityUpdate, NewBookingDetails};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cars::{CarResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Availability Override Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityRequest {
    /// Booking state to force; omit to free the car
    pub booking: Option<ForcedBookingRequest>,
}

/// Forced booking details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ForcedBookingRequest {
    /// Renting user UUID
    pub user_uuid: Uuid,
    pub booked_by: String,
    /// ISO date (YYYY-MM-DD)
    pub booking_date: String,
    /// ISO date (YYYY-MM-DD)
    pub return_date: String,
    pub total_price: Option<u64>,
}

/// Set Car Availability Handler
#[endpoint(
    tags("cars"),
    summary = "Set Car Availability",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Availability updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Car not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    car: PathParam<Uuid>,
    json: JsonBody<AvailabilityRequest>,
    depot: &mut Depot,
) -> Result<Json<CarResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let booking = json
        .into_inner()
        .booking
        .map(|booking| {
            Ok::<NewBookingDetails, StatusError>(NewBookingDetails {
                user_uuid: booking.user_uuid.into(),
                booked_by: booking.booked_by,
                booking_date: booking
                    .booking_date
                    .parse()
                    .or_400("could not parse booking_date")?,
                return_date: booking
                    .return_date
                    .parse()
                    .or_400("could not parse return_date")?,
                total_price: booking.total_price,
            })
        })
        .transpose()?;

    let record = state
        .bookings
        .set_availability(
            caller,
            car.into_inner().into(),
            AvailabilityUpdate { booking },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(record.into()))
}
