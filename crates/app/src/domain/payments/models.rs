//! Payment Models

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use crate::{
    domain::cars::models::{BookingUuid, CarUuid},
    users::UserUuid,
    uuids::TypedUuid,
};

/// Payment UUID
pub type PaymentUuid = TypedUuid<Payment>;

/// Payment Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub uuid: PaymentUuid,
    /// The user who must pay for the booking.
    pub user_uuid: UserUuid,
    /// The booking occurrence this payment settles. At most one payment
    /// exists per occurrence.
    pub booking_uuid: BookingUuid,
    pub car_uuid: CarUuid,
    pub car_name: String,
    /// Amount due in pence/cents.
    pub amount: u64,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
}

/// New Payment persistence payload.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub user_uuid: UserUuid,
    pub booking_uuid: BookingUuid,
    pub car_uuid: CarUuid,
    pub car_name: String,
    pub amount: u64,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
}

/// Payment request, as received from the client. The amount is computed
/// client-side from the daily rate and rental window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub car_uuid: CarUuid,
    pub car_name: String,
    pub amount: u64,
}

/// Result of initiating a payment: the ledger row plus whether this call
/// created it or found an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedPayment {
    pub payment: Payment,
    pub created: bool,
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            _ => Err(UnknownPaymentStatus),
        }
    }
}

/// A stored payment status did not match any known variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown payment status value")]
pub struct UnknownPaymentStatus;

/// Relative listing window, inclusive lower bound with no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Last7,
    Last30,
    Last90,
}

impl DateRange {
    /// Lower bound of the window, relative to `now`.
    #[must_use]
    pub fn since(self, now: Timestamp) -> Timestamp {
        let days = match self {
            Self::Last7 => 7,
            Self::Last30 => 30,
            Self::Last90 => 90,
        };

        now.checked_sub(SignedDuration::from_hours(days * 24))
            .unwrap_or(Timestamp::MIN)
    }
}

impl FromStr for DateRange {
    type Err = UnknownDateRange;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "last7" => Ok(Self::Last7),
            "last30" => Ok(Self::Last30),
            "last90" => Ok(Self::Last90),
            _ => Err(UnknownDateRange),
        }
    }
}

/// A date range filter did not match any known window.
#[derive(Debug, thiserror::Error)]
#[error("unknown date range value")]
pub struct UnknownDateRange;

/// Optional filters for payment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFilters {
    pub status: Option<PaymentStatus>,
    pub date_range: Option<DateRange>,
}

/// Total rental price for a booking window at the given daily rate.
///
/// A same-day rental still pays for one day.
#[must_use]
pub fn rental_total(daily_rate: u64, booking_date: Date, return_date: Date) -> u64 {
    let days = (return_date - booking_date).get_days().max(1);

    daily_rate.saturating_mul(days.unsigned_abs() as u64)
}
