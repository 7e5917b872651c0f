//! Payment handlers.

use rental_app::domain::payments::Payment;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) mod complete;
pub(crate) mod create;
pub(crate) mod errors;
pub(crate) mod index;

/// Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    /// Payment UUID
    pub uuid: Uuid,
    /// Paying user UUID
    pub user_uuid: Uuid,
    /// Booking occurrence the payment settles
    pub booking_uuid: Uuid,
    pub car_uuid: Uuid,
    pub car_name: String,
    /// Amount due in pence/cents
    pub amount: u64,
    /// Pending, Completed or Failed
    pub status: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            uuid: payment.uuid.into(),
            user_uuid: payment.user_uuid.into(),
            booking_uuid: payment.booking_uuid.into(),
            car_uuid: payment.car_uuid.into(),
            car_name: payment.car_name,
            amount: payment.amount,
            status: payment.status.to_string(),
            created_at: payment.created_at.to_string(),
        }
    }
}
