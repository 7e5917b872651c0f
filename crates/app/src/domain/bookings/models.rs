//! Booking Models

use jiff::civil::Date;

use crate::{
    domain::cars::models::{CarRecord, CarUuid},
    users::UserUuid,
};

/// Booking request, as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub start_date: Option<Date>,
    pub return_date: Option<Date>,
}

/// What the customer gets back after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub car_uuid: CarUuid,
    pub car_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub booking_date: Date,
    pub return_date: Date,
}

impl BookingConfirmation {
    #[must_use]
    pub fn new(car: &CarRecord, customer_name: String, customer_email: String) -> Option<Self> {
        let booking = car.booking.as_ref()?;

        Some(Self {
            car_uuid: car.uuid,
            car_name: car.name.clone(),
            customer_name,
            customer_email,
            booking_date: booking.booking_date,
            return_date: booking.return_date,
        })
    }
}

/// Booking state to force onto a car, minus the occurrence uuid the service
/// mints itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookingDetails {
    pub user_uuid: UserUuid,
    pub booked_by: String,
    pub booking_date: Date,
    pub return_date: Date,
    pub total_price: Option<u64>,
}

/// Admin availability override: `Some` force-books, `None` force-frees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityUpdate {
    pub booking: Option<NewBookingDetails>,
}
