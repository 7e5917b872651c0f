//! Bookings service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Caller,
    domain::{
        bookings::{
            errors::BookingsServiceError,
            models::{AvailabilityUpdate, BookingConfirmation, BookingRequest},
        },
        cars::{
            models::{BookingDetails, BookingUuid, CarRecord, CarUuid},
            repository::CarsRepository,
        },
        payments::{
            models::{PaymentStatus, rental_total},
            repository::PaymentsRepository,
        },
    },
    users::UsersRepository,
};

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Book a free car for the caller over the requested window.
    async fn create_booking(
        &self,
        caller: Caller,
        car: CarUuid,
        request: BookingRequest,
        today: Date,
    ) -> Result<BookingConfirmation, BookingsServiceError>;

    /// Cancel the caller's booking of a car and drop any pending payment
    /// for it.
    async fn cancel_booking(
        &self,
        caller: Caller,
        car: CarUuid,
    ) -> Result<(), BookingsServiceError>;

    /// Admin override: force a car booked or free, bypassing date and
    /// ownership checks.
    async fn set_availability(
        &self,
        caller: Caller,
        car: CarUuid,
        update: AvailabilityUpdate,
    ) -> Result<CarRecord, BookingsServiceError>;

    /// Cars the caller currently has booked.
    async fn list_reserved(&self, caller: Caller) -> Result<Vec<CarRecord>, BookingsServiceError>;

    /// Cars the caller currently has booked and paid for.
    async fn list_rented(&self, caller: Caller) -> Result<Vec<CarRecord>, BookingsServiceError>;
}

pub struct CarBookingsService {
    cars: Arc<dyn CarsRepository>,
    payments: Arc<dyn PaymentsRepository>,
    users: Arc<dyn UsersRepository>,
}

impl std::fmt::Debug for CarBookingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarBookingsService").finish_non_exhaustive()
    }
}

impl CarBookingsService {
    #[must_use]
    pub fn new(
        cars: Arc<dyn CarsRepository>,
        payments: Arc<dyn PaymentsRepository>,
        users: Arc<dyn UsersRepository>,
    ) -> Self {
        Self {
            cars,
            payments,
            users,
        }
    }
}

#[async_trait]
impl BookingsService for CarBookingsService {
    async fn create_booking(
        &self,
        caller: Caller,
        car: CarUuid,
        request: BookingRequest,
        today: Date,
    ) -> Result<BookingConfirmation, BookingsServiceError> {
        let record = self
            .cars
            .get_car(car)
            .await?
            .ok_or(BookingsServiceError::NotFound)?;

        if record.is_booked() {
            return Err(BookingsServiceError::AlreadyBooked);
        }

        let profile = self
            .users
            .get_profile(caller.user_uuid)
            .await?
            .ok_or(BookingsServiceError::UserNotFound)?;

        let (Some(booking_date), Some(return_date)) = (request.start_date, request.return_date)
        else {
            return Err(BookingsServiceError::MissingDates);
        };

        if booking_date < today {
            return Err(BookingsServiceError::StartDateInPast);
        }

        if return_date < today {
            return Err(BookingsServiceError::ReturnDateInPast);
        }

        if return_date < booking_date {
            return Err(BookingsServiceError::ReturnBeforeStart);
        }

        let details = BookingDetails {
            booking_uuid: BookingUuid::new(),
            user_uuid: caller.user_uuid,
            booked_by: request.name,
            booking_date,
            return_date,
            total_price: Some(rental_total(
                record.price_per_day,
                booking_date,
                return_date,
            )),
        };

        // The claim is a compare-and-set on the free state. A concurrent
        // booker who lands first leaves zero rows for us.
        if !self.cars.try_book(car, &details).await? {
            return Err(BookingsServiceError::AlreadyBooked);
        }

        info!(car = %car, booking = %details.booking_uuid, "car booked");

        let booked = CarRecord {
            booking: Some(details),
            ..record
        };

        BookingConfirmation::new(&booked, profile.name, profile.email)
            .ok_or(BookingsServiceError::NotBooked)
    }

    async fn cancel_booking(
        &self,
        caller: Caller,
        car: CarUuid,
    ) -> Result<(), BookingsServiceError> {
        let record = self
            .cars
            .get_car(car)
            .await?
            .ok_or(BookingsServiceError::NotFound)?;

        let Some(booking) = &record.booking else {
            return Err(BookingsServiceError::NotBooked);
        };

        if booking.user_uuid != caller.user_uuid {
            return Err(BookingsServiceError::NotOwner);
        }

        // Keyed on the occurrence we observed. If the sweep already freed
        // the car, zero rows come back and the cancel still counts as done.
        let cleared = self.cars.clear_booking(car, booking.booking_uuid).await?;

        let dropped = self
            .payments
            .delete_pending_by_booking(booking.booking_uuid)
            .await?;

        info!(
            car = %car,
            booking = %booking.booking_uuid,
            cleared,
            pending_payments_dropped = dropped,
            "booking cancelled",
        );

        Ok(())
    }

    async fn set_availability(
        &self,
        caller: Caller,
        car: CarUuid,
        update: AvailabilityUpdate,
    ) -> Result<CarRecord, BookingsServiceError> {
        if !caller.is_admin() {
            return Err(BookingsServiceError::Forbidden);
        }

        let details = update.booking.map(|booking| BookingDetails {
            booking_uuid: BookingUuid::new(),
            user_uuid: booking.user_uuid,
            booked_by: booking.booked_by,
            booking_date: booking.booking_date,
            return_date: booking.return_date,
            total_price: booking.total_price,
        });

        let record = self
            .cars
            .force_set_booking(car, details)
            .await?
            .ok_or(BookingsServiceError::NotFound)?;

        info!(car = %car, booked = record.is_booked(), "availability overridden");

        Ok(record)
    }

    async fn list_reserved(
        &self,
        caller: Caller,
    ) -> Result<Vec<CarRecord>, BookingsServiceError> {
        Ok(self.cars.list_booked_by_user(caller.user_uuid).await?)
    }

    async fn list_rented(&self, caller: Caller) -> Result<Vec<CarRecord>, BookingsServiceError> {
        let booked = self.cars.list_booked_by_user(caller.user_uuid).await?;

        let mut rented = Vec::with_capacity(booked.len());

        for car in booked {
            let Some(booking) = &car.booking else {
                continue;
            };

            let paid = self
                .payments
                .find_by_booking(booking.booking_uuid)
                .await?
                .is_some_and(|payment| payment.status == PaymentStatus::Completed);

            if paid {
                rented.push(car);
            }
        }

        Ok(rented)
    }
}
