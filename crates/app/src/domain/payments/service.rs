//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Caller,
    domain::{
        cars::repository::CarsRepository,
        payments::{
            errors::PaymentsServiceError,
            models::{
                InitiatedPayment, NewPayment, Payment, PaymentFilters, PaymentRequest,
                PaymentStatus, PaymentUuid,
            },
            repository::PaymentsRepository,
        },
    },
};

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Start (or re-surface) the payment for the caller's current booking of
    /// a car. Repeating the call for the same booking occurrence returns the
    /// existing ledger row unchanged.
    async fn initiate_payment(
        &self,
        caller: Caller,
        request: PaymentRequest,
        now: Timestamp,
    ) -> Result<InitiatedPayment, PaymentsServiceError>;

    /// Mark the caller's payment completed. Completing an already-completed
    /// payment is a no-op success.
    async fn complete_payment(
        &self,
        caller: Caller,
        payment: PaymentUuid,
    ) -> Result<Payment, PaymentsServiceError>;

    /// The caller's payment history, newest first. Admins see every user's
    /// rows.
    async fn list_payments(
        &self,
        caller: Caller,
        filters: PaymentFilters,
        now: Timestamp,
    ) -> Result<Vec<Payment>, PaymentsServiceError>;
}

pub struct CarPaymentsService {
    payments: Arc<dyn PaymentsRepository>,
    cars: Arc<dyn CarsRepository>,
}

impl std::fmt::Debug for CarPaymentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarPaymentsService").finish_non_exhaustive()
    }
}

impl CarPaymentsService {
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentsRepository>, cars: Arc<dyn CarsRepository>) -> Self {
        Self { payments, cars }
    }
}

#[async_trait]
impl PaymentsService for CarPaymentsService {
    async fn initiate_payment(
        &self,
        caller: Caller,
        request: PaymentRequest,
        now: Timestamp,
    ) -> Result<InitiatedPayment, PaymentsServiceError> {
        if request.car_name.trim().is_empty() || request.amount == 0 {
            return Err(PaymentsServiceError::MissingRequiredFields);
        }

        let car = self
            .cars
            .get_car(request.car_uuid)
            .await?
            .ok_or(PaymentsServiceError::CarNotFound)?;

        let Some(booking) = &car.booking else {
            return Err(PaymentsServiceError::NoActiveBooking);
        };

        if let Some(existing) = self.payments.find_by_booking(booking.booking_uuid).await? {
            return Ok(InitiatedPayment {
                payment: existing,
                created: false,
            });
        }

        let new_payment = NewPayment {
            uuid: PaymentUuid::new(),
            user_uuid: caller.user_uuid,
            booking_uuid: booking.booking_uuid,
            car_uuid: car.uuid,
            car_name: request.car_name,
            amount: request.amount,
            status: PaymentStatus::Pending,
            created_at: now,
        };

        match self.payments.insert_payment(&new_payment).await? {
            Some(payment) => {
                info!(payment = %payment.uuid, car = %car.uuid, "payment initiated");

                Ok(InitiatedPayment {
                    payment,
                    created: true,
                })
            }
            // Lost an initiation race. The winner's row is the payment.
            None => {
                let payment = self
                    .payments
                    .find_by_booking(booking.booking_uuid)
                    .await?
                    .ok_or(PaymentsServiceError::NoActiveBooking)?;

                Ok(InitiatedPayment {
                    payment,
                    created: false,
                })
            }
        }
    }

    async fn complete_payment(
        &self,
        caller: Caller,
        payment: PaymentUuid,
    ) -> Result<Payment, PaymentsServiceError> {
        let existing = self
            .payments
            .get_payment(payment)
            .await?
            .ok_or(PaymentsServiceError::NotFound)?;

        if existing.user_uuid != caller.user_uuid {
            return Err(PaymentsServiceError::NotOwner);
        }

        if existing.status == PaymentStatus::Completed {
            return Ok(existing);
        }

        let completed = self
            .payments
            .complete_payment(payment)
            .await?
            .ok_or(PaymentsServiceError::NotFound)?;

        info!(payment = %completed.uuid, "payment completed");

        Ok(completed)
    }

    async fn list_payments(
        &self,
        caller: Caller,
        filters: PaymentFilters,
        now: Timestamp,
    ) -> Result<Vec<Payment>, PaymentsServiceError> {
        let owner = if caller.is_admin() {
            None
        } else {
            Some(caller.user_uuid)
        };

        let since = filters.date_range.map(|range| range.since(now));

        Ok(self
            .payments
            .list_payments(owner, filters.status, since)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::Date;
    use testresult::TestResult;

    use super::*;
    use crate::{
        auth::Role,
        domain::{
            cars::{
                models::{BookingDetails, BookingUuid, CarUuid},
                repository::MockCarsRepository,
            },
            payments::{models::DateRange, repository::MockPaymentsRepository},
        },
        test::fixtures,
        users::UserUuid,
    };

    fn caller() -> Caller {
        Caller {
            user_uuid: UserUuid::new(),
            role: Role::User,
        }
    }

    fn booked_car(car: CarUuid, booking: BookingUuid, user: UserUuid) -> crate::domain::cars::models::CarRecord {
        let mut record = fixtures::car(car);

        record.booking = Some(BookingDetails {
            booking_uuid: booking,
            user_uuid: user,
            booked_by: "Jo Renter".to_string(),
            booking_date: Date::constant(2026, 3, 14),
            return_date: Date::constant(2026, 3, 17),
            total_price: None,
        });

        record
    }

    fn payment_row(caller: &Caller, booking: BookingUuid, car: CarUuid) -> Payment {
        Payment {
            uuid: PaymentUuid::new(),
            user_uuid: caller.user_uuid,
            booking_uuid: booking,
            car_uuid: car,
            car_name: "Aurora GT".to_string(),
            amount: 15_000,
            status: PaymentStatus::Pending,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn initiating_a_payment_requires_name_and_amount() -> TestResult {
        let mut payments = MockPaymentsRepository::new();
        let mut cars = MockCarsRepository::new();
        payments.expect_insert_payment().never();
        cars.expect_get_car().never();

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let result = service
            .initiate_payment(
                caller(),
                PaymentRequest {
                    car_uuid: CarUuid::new(),
                    car_name: "  ".to_string(),
                    amount: 15_000,
                },
                Timestamp::now(),
            )
            .await;

        assert!(matches!(
            result,
            Err(PaymentsServiceError::MissingRequiredFields)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn initiating_a_payment_requires_an_active_booking() -> TestResult {
        let caller = caller();
        let car_uuid = CarUuid::new();

        let mut payments = MockPaymentsRepository::new();
        let mut cars = MockCarsRepository::new();
        payments.expect_insert_payment().never();
        cars.expect_get_car()
            .withf(move |car| *car == car_uuid)
            .returning(move |car| Ok(Some(fixtures::car(car))));

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let result = service
            .initiate_payment(
                caller,
                PaymentRequest {
                    car_uuid,
                    car_name: "Aurora GT".to_string(),
                    amount: 15_000,
                },
                Timestamp::now(),
            )
            .await;

        assert!(matches!(
            result,
            Err(PaymentsServiceError::NoActiveBooking)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn repeat_initiation_returns_the_existing_payment() -> TestResult {
        let caller = caller();
        let car_uuid = CarUuid::new();
        let booking_uuid = BookingUuid::new();
        let existing = payment_row(&caller, booking_uuid, car_uuid);

        let mut payments = MockPaymentsRepository::new();
        let mut cars = MockCarsRepository::new();

        let user_uuid = caller.user_uuid;
        cars.expect_get_car()
            .returning(move |car| Ok(Some(booked_car(car, booking_uuid, user_uuid))));

        let found = existing.clone();
        payments
            .expect_find_by_booking()
            .withf(move |booking| *booking == booking_uuid)
            .returning(move |_| Ok(Some(found.clone())));
        payments.expect_insert_payment().never();

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let initiated = service
            .initiate_payment(
                caller,
                PaymentRequest {
                    car_uuid,
                    car_name: "Aurora GT".to_string(),
                    amount: 15_000,
                },
                Timestamp::now(),
            )
            .await?;

        assert!(!initiated.created);
        assert_eq!(initiated.payment, existing);

        Ok(())
    }

    #[tokio::test]
    async fn losing_an_insert_race_returns_the_winning_row() -> TestResult {
        let caller = caller();
        let car_uuid = CarUuid::new();
        let booking_uuid = BookingUuid::new();
        let winner = payment_row(&caller, booking_uuid, car_uuid);

        let mut payments = MockPaymentsRepository::new();
        let mut cars = MockCarsRepository::new();

        let user_uuid = caller.user_uuid;
        cars.expect_get_car()
            .returning(move |car| Ok(Some(booked_car(car, booking_uuid, user_uuid))));

        // First lookup misses, the insert conflicts, the second lookup
        // finds the concurrent winner.
        payments
            .expect_find_by_booking()
            .times(1)
            .returning(|_| Ok(None));
        payments.expect_insert_payment().returning(|_| Ok(None));
        let found = winner.clone();
        payments
            .expect_find_by_booking()
            .returning(move |_| Ok(Some(found.clone())));

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let initiated = service
            .initiate_payment(
                caller,
                PaymentRequest {
                    car_uuid,
                    car_name: "Aurora GT".to_string(),
                    amount: 15_000,
                },
                Timestamp::now(),
            )
            .await?;

        assert!(!initiated.created);
        assert_eq!(initiated.payment, winner);

        Ok(())
    }

    #[tokio::test]
    async fn completing_anothers_payment_is_forbidden() -> TestResult {
        let caller = caller();
        let foreign = payment_row(
            &Caller {
                user_uuid: UserUuid::new(),
                role: Role::User,
            },
            BookingUuid::new(),
            CarUuid::new(),
        );
        let payment_uuid = foreign.uuid;

        let mut payments = MockPaymentsRepository::new();
        let cars = MockCarsRepository::new();
        payments
            .expect_get_payment()
            .returning(move |_| Ok(Some(foreign.clone())));
        payments.expect_complete_payment().never();

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let result = service.complete_payment(caller, payment_uuid).await;

        assert!(matches!(
            result,
            Err(PaymentsServiceError::NotOwner)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn completing_twice_is_a_noop_success() -> TestResult {
        let caller = caller();
        let mut completed = payment_row(&caller, BookingUuid::new(), CarUuid::new());
        completed.status = PaymentStatus::Completed;
        let expected = completed.clone();

        let mut payments = MockPaymentsRepository::new();
        let cars = MockCarsRepository::new();
        payments
            .expect_get_payment()
            .returning(move |_| Ok(Some(completed.clone())));
        payments.expect_complete_payment().never();

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let payment = service.complete_payment(caller, expected.uuid).await?;

        assert_eq!(payment, expected);

        Ok(())
    }

    #[tokio::test]
    async fn non_admins_only_see_their_own_payments() -> TestResult {
        let caller = caller();
        let owner = caller.user_uuid;

        let mut payments = MockPaymentsRepository::new();
        let cars = MockCarsRepository::new();
        payments
            .expect_list_payments()
            .withf(move |listed_owner, status, since| {
                *listed_owner == Some(owner)
                    && *status == Some(PaymentStatus::Completed)
                    && since.is_some()
            })
            .returning(|_, _, _| Ok(Vec::new()));

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        let listed = service
            .list_payments(
                caller,
                PaymentFilters {
                    status: Some(PaymentStatus::Completed),
                    date_range: Some(DateRange::Last30),
                },
                Timestamp::now(),
            )
            .await?;

        assert!(listed.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn admins_list_across_all_users() -> TestResult {
        let admin = Caller {
            user_uuid: UserUuid::new(),
            role: Role::Admin,
        };

        let mut payments = MockPaymentsRepository::new();
        let cars = MockCarsRepository::new();
        payments
            .expect_list_payments()
            .withf(|owner, status, since| owner.is_none() && status.is_none() && since.is_none())
            .returning(|_, _, _| Ok(Vec::new()));

        let service = CarPaymentsService::new(Arc::new(payments), Arc::new(cars));

        service
            .list_payments(admin, PaymentFilters::default(), Timestamp::now())
            .await?;

        Ok(())
    }
}
