//! Payments repository.
//!
//! Inserts go through `ON CONFLICT DO NOTHING` on the booking occurrence, so
//! two concurrent initiations for the same booking produce exactly one ledger
//! row. The loser gets `None` back and re-reads the winner's row.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        cars::models::{BookingUuid, CarUuid},
        payments::models::{NewPayment, Payment, PaymentStatus, PaymentUuid},
    },
    users::UserUuid,
};

const INSERT_PAYMENT_SQL: &str = include_str!("sql/insert_payment.sql");
const GET_PAYMENT_SQL: &str = include_str!("sql/get_payment.sql");
const FIND_BY_BOOKING_SQL: &str = include_str!("sql/find_by_booking.sql");
const COMPLETE_PAYMENT_SQL: &str = include_str!("sql/complete_payment.sql");
const DELETE_PENDING_BY_BOOKING_SQL: &str = include_str!("sql/delete_pending_by_booking.sql");
const LIST_PAYMENTS_SQL: &str = include_str!("sql/list_payments.sql");

#[automock]
#[async_trait]
pub trait PaymentsRepository: Send + Sync {
    /// Persist a new payment. Returns `None` when a payment already exists
    /// for the same booking occurrence.
    async fn insert_payment(&self, payment: &NewPayment)
    -> Result<Option<Payment>, sqlx::Error>;

    /// Fetch a payment by id.
    async fn get_payment(&self, payment: PaymentUuid) -> Result<Option<Payment>, sqlx::Error>;

    /// Fetch the payment for a booking occurrence, if one was initiated.
    async fn find_by_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<Option<Payment>, sqlx::Error>;

    /// Mark a payment completed. Returns the updated row, or `None` when the
    /// payment does not exist.
    async fn complete_payment(
        &self,
        payment: PaymentUuid,
    ) -> Result<Option<Payment>, sqlx::Error>;

    /// Drop any still-pending payment for a booking occurrence. Returns the
    /// number of rows removed.
    async fn delete_pending_by_booking(&self, booking: BookingUuid)
    -> Result<u64, sqlx::Error>;

    /// Payments matching the given filters, newest first. `owner` of `None`
    /// lists across all users.
    async fn list_payments(
        &self,
        owner: Option<UserUuid>,
        status: Option<PaymentStatus>,
        since: Option<Timestamp>,
    ) -> Result<Vec<Payment>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgPaymentsRepository {
    pool: PgPool,
}

impl PgPaymentsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentsRepository for PgPaymentsRepository {
    async fn insert_payment(
        &self,
        payment: &NewPayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(INSERT_PAYMENT_SQL)
            .bind(payment.uuid.into_uuid())
            .bind(payment.user_uuid.into_uuid())
            .bind(payment.booking_uuid.into_uuid())
            .bind(payment.car_uuid.into_uuid())
            .bind(&payment.car_name)
            .bind(
                i64::try_from(payment.amount)
                    .map_err(|e| sqlx::Error::Encode(Box::new(e)))?,
            )
            .bind(payment.status.as_str())
            .bind(SqlxTimestamp::from(payment.created_at))
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_payment(&self, payment: PaymentUuid) -> Result<Option<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(GET_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<Option<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(FIND_BY_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn complete_payment(
        &self,
        payment: PaymentUuid,
    ) -> Result<Option<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(COMPLETE_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_pending_by_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PENDING_BY_BOOKING_SQL)
            .bind(booking.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn list_payments(
        &self,
        owner: Option<UserUuid>,
        status: Option<PaymentStatus>,
        since: Option<Timestamp>,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(LIST_PAYMENTS_SQL)
            .bind(owner.map(UserUuid::into_uuid))
            .bind(status.map(PaymentStatus::as_str))
            .bind(since.map(SqlxTimestamp::from))
            .fetch_all(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Payment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount: i64 = row.try_get("amount")?;

        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get::<Uuid, _>("user_uuid")?),
            booking_uuid: BookingUuid::from_uuid(row.try_get::<Uuid, _>("booking_uuid")?),
            car_uuid: CarUuid::from_uuid(row.try_get::<Uuid, _>("car_uuid")?),
            car_name: row.try_get("car_name")?,
            amount: u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
                index: "amount".to_string(),
                source: Box::new(e),
            })?,
            status: row
                .try_get::<String, _>("status")?
                .parse()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: Box::new(e),
                })?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
