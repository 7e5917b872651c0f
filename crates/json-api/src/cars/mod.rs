//! Car booking handlers.

use rental_app::domain::cars::models::CarRecord;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) mod availability;
pub(crate) mod book;
pub(crate) mod cancel;
pub(crate) mod errors;
pub(crate) mod rented;
pub(crate) mod reserved;

/// Car Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CarResponse {
    /// Car UUID
    pub uuid: Uuid,
    pub name: String,
    pub brand: String,
    /// Daily rate in pence/cents
    pub price_per_day: u64,
    pub category: String,
    pub transmission: String,
    pub seats: u8,
    pub fuel_type: String,
    pub description: String,
    pub image: String,
    pub is_booked: bool,
    /// Present exactly when the car is booked
    pub booking: Option<BookingResponse>,
}

/// Active booking state on a car
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingResponse {
    pub booking_uuid: Uuid,
    pub user_uuid: Uuid,
    pub booked_by: String,
    /// ISO date (YYYY-MM-DD)
    pub booking_date: String,
    /// ISO date (YYYY-MM-DD)
    pub return_date: String,
    pub total_price: Option<u64>,
}

impl From<CarRecord> for CarResponse {
    fn from(car: CarRecord) -> Self {
        Self {
            uuid: car.uuid.into(),
            name: car.name,
            brand: car.brand,
            price_per_day: car.price_per_day,
            category: car.category.to_string(),
            transmission: car.transmission.to_string(),
            seats: car.seats,
            fuel_type: car.fuel_type.to_string(),
            description: car.description,
            image: car.image,
            is_booked: car.booking.is_some(),
            booking: car.booking.map(|booking| BookingResponse {
                booking_uuid: booking.booking_uuid.into(),
                user_uuid: booking.user_uuid.into(),
                booked_by: booking.booked_by,
                booking_date: booking.booking_date.to_string(),
                return_date: booking.return_date.to_string(),
                total_price: booking.total_price,
            }),
        }
    }
}
