//! Book Car Handler

use std::sync::Arc;

use rental_app::domain::bookings::{BookingConfirmation, BookingRequest};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{cars::errors::into_status_error, extensions::*, state::State};

/// Book Car Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookCarRequest {
    /// Customer name for the booking record
    pub name: String,

    /// Customer contact email
    pub email: String,

    /// Rental start date (YYYY-MM-DD)
    pub start_date: Option<String>,

    /// Rental return date (YYYY-MM-DD)
    pub return_date: Option<String>,
}

/// Booking Confirmation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingConfirmationResponse {
    /// Booked car UUID
    pub car_uuid: Uuid,
    pub car_name: String,
    pub customer_name: String,
    pub customer_email: String,
    /// ISO date (YYYY-MM-DD)
    pub booking_date: String,
    /// ISO date (YYYY-MM-DD)
    pub return_date: String,
}

impl From<BookingConfirmation> for BookingConfirmationResponse {
    fn from(confirmation: BookingConfirmation) -> Self {
        Self {
            car_uuid: confirmation.car_uuid.into(),
            car_name: confirmation.car_name,
            customer_name: confirmation.customer_name,
            customer_email: confirmation.customer_email,
            booking_date: confirmation.booking_date.to_string(),
            return_date: confirmation.return_date.to_string(),
        }
    }
}

/// Book Car Handler
#[endpoint(
    tags("cars"),
    summary = "Book Car",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Car booked"),
        (status_code = StatusCode::CONFLICT, description = "Car is already booked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Car not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    car: PathParam<Uuid>,
    today: QueryParam<String, false>,
    json: JsonBody<BookCarRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookingConfirmationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;
    let today = today.into_today()?;

    let request = json.into_inner();
    let booking_request = BookingRequest {
        name: request.name,
        email: request.email,
        start_date: parse_civil_date(request.start_date, "could not parse start_date")?,
        return_date: parse_civil_date(request.return_date, "could not parse return_date")?,
    };

    let confirmation = state
        .bookings
        .create_booking(caller, car.into_inner().into(), booking_request, today)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(confirmation.into()))
}
