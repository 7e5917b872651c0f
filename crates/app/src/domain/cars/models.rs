//! Car Models

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use crate::{users::UserUuid, uuids::TypedUuid};

/// Car UUID
pub type CarUuid = TypedUuid<CarRecord>;

/// Booking occurrence marker type.
#[derive(Debug)]
pub struct Booking;

/// Booking occurrence UUID.
///
/// Minted each time a car is booked, so repeat rentals of the same car get
/// distinct identities and historical payments never collide with new ones.
pub type BookingUuid = TypedUuid<Booking>;

/// Car Record
///
/// A car is free exactly when `booking` is `None`; there is no separate
/// booked flag to drift out of sync.
#[derive(Debug, Clone)]
pub struct CarRecord {
    pub uuid: CarUuid,
    pub name: String,
    pub brand: String,
    /// Daily rate in pence/cents.
    pub price_per_day: u64,
    pub category: CarCategory,
    pub transmission: Transmission,
    pub seats: u8,
    pub fuel_type: FuelType,
    pub description: String,
    pub image: String,
    pub booking: Option<BookingDetails>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CarRecord {
    #[must_use]
    pub fn is_booked(&self) -> bool {
        self.booking.is_some()
    }
}

/// Active reservation state on a car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub booking_uuid: BookingUuid,
    pub user_uuid: UserUuid,
    pub booked_by: String,
    pub booking_date: Date,
    pub return_date: Date,
    pub total_price: Option<u64>,
}

/// New Car payload, used by seeding and the fleet CLI.
#[derive(Debug, Clone)]
pub struct NewCar {
    pub uuid: CarUuid,
    pub name: String,
    pub brand: String,
    pub price_per_day: u64,
    pub category: CarCategory,
    pub transmission: Transmission,
    pub seats: u8,
    pub fuel_type: FuelType,
    pub description: String,
    pub image: String,
}

/// Catalog category of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarCategory {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Luxury,
    Electric,
    Sports,
}

impl CarCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Luxury => "Luxury",
            Self::Electric => "Electric",
            Self::Sports => "Sports",
        }
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarCategory {
    type Err = UnknownAttribute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Sedan" => Ok(Self::Sedan),
            "SUV" => Ok(Self::Suv),
            "Luxury" => Ok(Self::Luxury),
            "Electric" => Ok(Self::Electric),
            "Sports" => Ok(Self::Sports),
            _ => Err(UnknownAttribute {
                attribute: "category",
            }),
        }
    }
}

/// Gearbox type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Manual => "Manual",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transmission {
    type Err = UnknownAttribute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Automatic" => Ok(Self::Automatic),
            "Manual" => Ok(Self::Manual),
            _ => Err(UnknownAttribute {
                attribute: "transmission",
            }),
        }
    }
}

/// Fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = UnknownAttribute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Petrol" => Ok(Self::Petrol),
            "Diesel" => Ok(Self::Diesel),
            "Electric" => Ok(Self::Electric),
            "Hybrid" => Ok(Self::Hybrid),
            _ => Err(UnknownAttribute {
                attribute: "fuel type",
            }),
        }
    }
}

/// A stored car attribute did not match any known variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown {attribute} value")]
pub struct UnknownAttribute {
    attribute: &'static str,
}
