//! In-memory payments repository for single-node use and tests.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    domain::{
        cars::models::BookingUuid,
        payments::{
            models::{NewPayment, Payment, PaymentStatus, PaymentUuid},
            repository::PaymentsRepository,
        },
    },
    users::UserUuid,
};

#[derive(Debug, Default)]
pub struct MemoryPaymentsRepository {
    payments: RwLock<HashMap<PaymentUuid, Payment>>,
}

impl MemoryPaymentsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentsRepository for MemoryPaymentsRepository {
    async fn insert_payment(
        &self,
        payment: &NewPayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut payments = self.payments.write().unwrap_or_else(PoisonError::into_inner);

        let duplicate = payments
            .values()
            .any(|existing| existing.booking_uuid == payment.booking_uuid);

        if duplicate {
            return Ok(None);
        }

        let record = Payment {
            uuid: payment.uuid,
            user_uuid: payment.user_uuid,
            booking_uuid: payment.booking_uuid,
            car_uuid: payment.car_uuid,
            car_name: payment.car_name.clone(),
            amount: payment.amount,
            status: payment.status,
            created_at: payment.created_at,
        };

        payments.insert(payment.uuid, record.clone());

        Ok(Some(record))
    }

    async fn get_payment(&self, payment: PaymentUuid) -> Result<Option<Payment>, sqlx::Error> {
        let payments = self.payments.read().unwrap_or_else(PoisonError::into_inner);

        Ok(payments.get(&payment).cloned())
    }

    async fn find_by_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let payments = self.payments.read().unwrap_or_else(PoisonError::into_inner);

        Ok(payments
            .values()
            .find(|payment| payment.booking_uuid == booking)
            .cloned())
    }

    async fn complete_payment(
        &self,
        payment: PaymentUuid,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut payments = self.payments.write().unwrap_or_else(PoisonError::into_inner);

        let Some(record) = payments.get_mut(&payment) else {
            return Ok(None);
        };

        record.status = PaymentStatus::Completed;

        Ok(Some(record.clone()))
    }

    async fn delete_pending_by_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let mut payments = self.payments.write().unwrap_or_else(PoisonError::into_inner);

        let before = payments.len();

        payments.retain(|_, payment| {
            payment.booking_uuid != booking || payment.status != PaymentStatus::Pending
        });

        Ok((before - payments.len()) as u64)
    }

    async fn list_payments(
        &self,
        owner: Option<UserUuid>,
        status: Option<PaymentStatus>,
        since: Option<Timestamp>,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let payments = self.payments.read().unwrap_or_else(PoisonError::into_inner);

        let mut matched: Vec<Payment> = payments
            .values()
            .filter(|payment| owner.is_none_or(|owner| payment.user_uuid == owner))
            .filter(|payment| status.is_none_or(|status| payment.status == status))
            .filter(|payment| since.is_none_or(|since| payment.created_at >= since))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matched)
    }
}
