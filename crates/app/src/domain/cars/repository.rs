//! Cars repository.
//!
//! Every mutation of booking state is a single conditional `UPDATE`, so two
//! writers can never both pass a "car is free" check and both claim it: the
//! database applies exactly one of them and the loser sees zero rows.

use std::str::FromStr;

use async_trait::async_trait;
use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    domain::cars::models::{
        BookingDetails, BookingUuid, CarCategory, CarRecord, CarUuid, FuelType, NewCar,
        Transmission,
    },
    users::UserUuid,
};

const GET_CAR_SQL: &str = include_str!("sql/get_car.sql");
const TRY_BOOK_CAR_SQL: &str = include_str!("sql/try_book_car.sql");
const CLEAR_BOOKING_SQL: &str = include_str!("sql/clear_booking.sql");
const FORCE_BOOK_CAR_SQL: &str = include_str!("sql/force_book_car.sql");
const FORCE_FREE_CAR_SQL: &str = include_str!("sql/force_free_car.sql");
const LIST_BOOKED_BY_USER_SQL: &str = include_str!("sql/list_booked_by_user.sql");
const LIST_EXPIRED_SQL: &str = include_str!("sql/list_expired.sql");
const INSERT_CAR_SQL: &str = include_str!("sql/insert_car.sql");

#[automock]
#[async_trait]
pub trait CarsRepository: Send + Sync {
    /// Fetch a car by id.
    async fn get_car(&self, car: CarUuid) -> Result<Option<CarRecord>, sqlx::Error>;

    /// Claim a free car for the given booking. Returns `false` when the car
    /// was already booked by the time the write landed.
    async fn try_book(&self, car: CarUuid, booking: &BookingDetails)
    -> Result<bool, sqlx::Error>;

    /// Release a car, conditioned on the booking occurrence still being the
    /// one the caller observed. Returns `false` when another writer already
    /// cleared or replaced it.
    async fn clear_booking(
        &self,
        car: CarUuid,
        booking: BookingUuid,
    ) -> Result<bool, sqlx::Error>;

    /// Admin override: set or clear booking state unconditionally. Returns
    /// the updated record, or `None` when the car does not exist.
    async fn force_set_booking(
        &self,
        car: CarUuid,
        booking: Option<BookingDetails>,
    ) -> Result<Option<CarRecord>, sqlx::Error>;

    /// All cars currently booked by the given user.
    async fn list_booked_by_user(&self, user: UserUuid) -> Result<Vec<CarRecord>, sqlx::Error>;

    /// All booked cars whose return date is strictly before `today`.
    async fn list_expired(&self, today: Date) -> Result<Vec<CarRecord>, sqlx::Error>;

    /// Persist a new, unbooked car.
    async fn insert_car(&self, car: &NewCar) -> Result<CarRecord, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgCarsRepository {
    pool: PgPool,
}

impl PgCarsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarsRepository for PgCarsRepository {
    async fn get_car(&self, car: CarUuid) -> Result<Option<CarRecord>, sqlx::Error> {
        query_as::<Postgres, CarRecord>(GET_CAR_SQL)
            .bind(car.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn try_book(
        &self,
        car: CarUuid,
        booking: &BookingDetails,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(TRY_BOOK_CAR_SQL)
            .bind(car.into_uuid())
            .bind(booking.booking_uuid.into_uuid())
            .bind(booking.user_uuid.into_uuid())
            .bind(&booking.booked_by)
            .bind(SqlxDate::from(booking.booking_date))
            .bind(SqlxDate::from(booking.return_date))
            .bind(booking.total_price.map(i64::try_from).transpose().map_err(
                |e| sqlx::Error::Encode(Box::new(e)),
            )?)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn clear_booking(
        &self,
        car: CarUuid,
        booking: BookingUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CLEAR_BOOKING_SQL)
            .bind(car.into_uuid())
            .bind(booking.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn force_set_booking(
        &self,
        car: CarUuid,
        booking: Option<BookingDetails>,
    ) -> Result<Option<CarRecord>, sqlx::Error> {
        match booking {
            Some(booking) => {
                query_as::<Postgres, CarRecord>(FORCE_BOOK_CAR_SQL)
                    .bind(car.into_uuid())
                    .bind(booking.booking_uuid.into_uuid())
                    .bind(booking.user_uuid.into_uuid())
                    .bind(&booking.booked_by)
                    .bind(SqlxDate::from(booking.booking_date))
                    .bind(SqlxDate::from(booking.return_date))
                    .bind(booking.total_price.map(i64::try_from).transpose().map_err(
                        |e| sqlx::Error::Encode(Box::new(e)),
                    )?)
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                query_as::<Postgres, CarRecord>(FORCE_FREE_CAR_SQL)
                    .bind(car.into_uuid())
                    .fetch_optional(&self.pool)
                    .await
            }
        }
    }

    async fn list_booked_by_user(&self, user: UserUuid) -> Result<Vec<CarRecord>, sqlx::Error> {
        query_as::<Postgres, CarRecord>(LIST_BOOKED_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&self.pool)
            .await
    }

    async fn list_expired(&self, today: Date) -> Result<Vec<CarRecord>, sqlx::Error> {
        query_as::<Postgres, CarRecord>(LIST_EXPIRED_SQL)
            .bind(SqlxDate::from(today))
            .fetch_all(&self.pool)
            .await
    }

    async fn insert_car(&self, car: &NewCar) -> Result<CarRecord, sqlx::Error> {
        query_as::<Postgres, CarRecord>(INSERT_CAR_SQL)
            .bind(car.uuid.into_uuid())
            .bind(&car.name)
            .bind(&car.brand)
            .bind(i64::try_from(car.price_per_day).map_err(|e| sqlx::Error::Encode(Box::new(e)))?)
            .bind(car.category.as_str())
            .bind(car.transmission.as_str())
            .bind(i16::from(car.seats))
            .bind(car.fuel_type.as_str())
            .bind(&car.description)
            .bind(&car.image)
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CarRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let is_booked: bool = row.try_get("is_booked")?;

        let booking = if is_booked {
            Some(BookingDetails {
                booking_uuid: BookingUuid::from_uuid(try_get_booking_column(
                    row,
                    "booking_uuid",
                )?),
                user_uuid: UserUuid::from_uuid(try_get_booking_column(row, "booking_user_uuid")?),
                booked_by: try_get_booking_column(row, "booked_by")?,
                booking_date: try_get_booking_column::<SqlxDate>(row, "booking_date")?.to_jiff(),
                return_date: try_get_booking_column::<SqlxDate>(row, "return_date")?.to_jiff(),
                total_price: row
                    .try_get::<Option<i64>, _>("booking_total_price")?
                    .map(|amount| try_into_amount(amount, "booking_total_price"))
                    .transpose()?,
            })
        } else {
            None
        };

        Ok(Self {
            uuid: CarUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            price_per_day: try_into_amount(row.try_get("price_per_day")?, "price_per_day")?,
            category: parse_attribute(row, "category")?,
            transmission: parse_attribute(row, "transmission")?,
            seats: u8::try_from(row.try_get::<i16, _>("seats")?).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "seats".to_string(),
                    source: Box::new(e),
                }
            })?,
            fuel_type: parse_attribute(row, "fuel_type")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            booking,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

/// Decode a booking column that must be present on a booked row. A `NULL`
/// here means the row violates the booked-iff-details-present invariant.
fn try_get_booking_column<'r, T>(row: &'r PgRow, col: &str) -> sqlx::Result<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<Option<T>, _>(col)?
        .ok_or_else(|| sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: "booked car is missing booking details".into(),
        })
}

fn parse_attribute<T>(row: &PgRow, col: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.try_get(col)?;

    text.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn try_into_amount(amount: i64, col: &str) -> sqlx::Result<u64> {
    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
