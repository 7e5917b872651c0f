//! In-memory cars repository for single-node use and tests.
//!
//! All booking-state mutations happen under one lock, which gives the same
//! claim-exactly-once guarantee the Postgres repository gets from
//! conditional updates.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date};

use crate::{
    domain::cars::{
        models::{BookingDetails, BookingUuid, CarRecord, CarUuid, NewCar},
        repository::CarsRepository,
    },
    users::UserUuid,
};

#[derive(Debug, Default)]
pub struct MemoryCarsRepository {
    cars: RwLock<HashMap<CarUuid, CarRecord>>,
}

impl MemoryCarsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarsRepository for MemoryCarsRepository {
    async fn get_car(&self, car: CarUuid) -> Result<Option<CarRecord>, sqlx::Error> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);

        Ok(cars.get(&car).cloned())
    }

    async fn try_book(
        &self,
        car: CarUuid,
        booking: &BookingDetails,
    ) -> Result<bool, sqlx::Error> {
        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);

        let Some(record) = cars.get_mut(&car) else {
            return Ok(false);
        };

        if record.booking.is_some() {
            return Ok(false);
        }

        record.booking = Some(booking.clone());
        record.updated_at = Timestamp::now();

        Ok(true)
    }

    async fn clear_booking(
        &self,
        car: CarUuid,
        booking: BookingUuid,
    ) -> Result<bool, sqlx::Error> {
        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);

        let Some(record) = cars.get_mut(&car) else {
            return Ok(false);
        };

        match &record.booking {
            Some(details) if details.booking_uuid == booking => {
                record.booking = None;
                record.updated_at = Timestamp::now();

                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn force_set_booking(
        &self,
        car: CarUuid,
        booking: Option<BookingDetails>,
    ) -> Result<Option<CarRecord>, sqlx::Error> {
        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);

        let Some(record) = cars.get_mut(&car) else {
            return Ok(None);
        };

        record.booking = booking;
        record.updated_at = Timestamp::now();

        Ok(Some(record.clone()))
    }

    async fn list_booked_by_user(&self, user: UserUuid) -> Result<Vec<CarRecord>, sqlx::Error> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);

        let mut booked: Vec<CarRecord> = cars
            .values()
            .filter(|car| {
                car.booking
                    .as_ref()
                    .is_some_and(|details| details.user_uuid == user)
            })
            .cloned()
            .collect();

        booked.sort_by_key(|car| car.uuid);

        Ok(booked)
    }

    async fn list_expired(&self, today: Date) -> Result<Vec<CarRecord>, sqlx::Error> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);

        let mut expired: Vec<CarRecord> = cars
            .values()
            .filter(|car| {
                car.booking
                    .as_ref()
                    .is_some_and(|details| details.return_date < today)
            })
            .cloned()
            .collect();

        expired.sort_by_key(|car| car.uuid);

        Ok(expired)
    }

    async fn insert_car(&self, car: &NewCar) -> Result<CarRecord, sqlx::Error> {
        let now = Timestamp::now();

        let record = CarRecord {
            uuid: car.uuid,
            name: car.name.clone(),
            brand: car.brand.clone(),
            price_per_day: car.price_per_day,
            category: car.category,
            transmission: car.transmission,
            seats: car.seats,
            fuel_type: car.fuel_type,
            description: car.description.clone(),
            image: car.image.clone(),
            booking: None,
            created_at: now,
            updated_at: now,
        };

        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);

        cars.insert(car.uuid, record.clone());

        Ok(record)
    }
}
