//! Reclamation: returning overdue cars to the fleet.
//!
//! A booking whose return date has elapsed is either a finished paid rental
//! or an abandoned unpaid one; both end with the car freed. The sweep uses
//! the same occurrence-keyed release as cancellation, so overlapping with a
//! customer cancel clears the booking exactly once.

use std::{sync::Arc, time::Duration};

use jiff::civil::Date;
use tokio::{sync::watch, task::JoinHandle, time};
use tracing::{debug, error, info};

use crate::domain::{
    cars::repository::CarsRepository,
    payments::{models::PaymentStatus, repository::PaymentsRepository},
};

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub freed: u64,
    pub skipped: u64,
}

/// Free every car whose booking's return date is strictly before `today`.
///
/// A car is freed when its occurrence has a completed payment (the paid
/// cycle is over) or when the booking itself started before today (the
/// renter never paid). Anything else is left alone. Per-car failures are
/// logged and do not stop the pass.
pub async fn sweep(
    cars: &dyn CarsRepository,
    payments: &dyn PaymentsRepository,
    today: Date,
) -> SweepStats {
    let expired = match cars.list_expired(today).await {
        Ok(expired) => expired,
        Err(error) => {
            error!(%error, "reclamation sweep could not list expired bookings");
            return SweepStats::default();
        }
    };

    let mut stats = SweepStats::default();

    for car in expired {
        let Some(booking) = &car.booking else {
            continue;
        };

        let paid = match payments.find_by_booking(booking.booking_uuid).await {
            Ok(payment) => {
                payment.is_some_and(|payment| payment.status == PaymentStatus::Completed)
            }
            Err(error) => {
                error!(car = %car.uuid, %error, "reclamation sweep could not check payment");
                stats.skipped += 1;
                continue;
            }
        };

        if !paid && booking.booking_date >= today {
            stats.skipped += 1;
            continue;
        }

        match cars.clear_booking(car.uuid, booking.booking_uuid).await {
            Ok(cleared) => {
                // A raced cancel already freed it; either way it is free now.
                if cleared {
                    info!(car = %car.uuid, booking = %booking.booking_uuid, paid, "car reclaimed");
                }

                stats.freed += 1;
            }
            Err(error) => {
                error!(car = %car.uuid, %error, "reclamation sweep could not free car");
                stats.skipped += 1;
            }
        }
    }

    stats
}

/// Periodic sweep driver, spawned at startup and stopped on shutdown.
#[derive(Debug)]
pub struct ReclamationJob {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

impl ReclamationJob {
    pub fn spawn(
        cars: Arc<dyn CarsRepository>,
        payments: Arc<dyn PaymentsRepository>,
        period: Duration,
    ) -> Self {
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let today = jiff::Zoned::now().date();
                        let stats = sweep(cars.as_ref(), payments.as_ref(), today).await;

                        debug!(freed = stats.freed, skipped = stats.skipped, "reclamation sweep finished");
                    }
                    _ = stopped.changed() => {
                        info!("reclamation job stopping");
                        break;
                    }
                }
            }
        });

        Self { handle, stop }
    }

    /// Signal the loop to exit and wait for it.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;
    use crate::{
        auth::{Caller, Role},
        domain::{
            bookings::{BookingRequest, BookingsService, CarBookingsService},
            cars::models::CarUuid,
            payments::{CarPaymentsService, PaymentRequest, PaymentsService},
        },
        test::context::TestContext,
    };

    const TODAY: Date = Date::constant(2026, 3, 20);

    fn bookings_service(ctx: &TestContext) -> CarBookingsService {
        CarBookingsService::new(
            ctx.cars_repository(),
            ctx.payments_repository(),
            ctx.users_repository(),
        )
    }

    fn payments_service(ctx: &TestContext) -> CarPaymentsService {
        CarPaymentsService::new(ctx.payments_repository(), ctx.cars_repository())
    }

    async fn book_through_service(
        ctx: &TestContext,
        caller: Caller,
    ) -> Result<CarUuid, Box<dyn std::error::Error>> {
        let car = ctx.seed_car().await?;

        bookings_service(ctx)
            .create_booking(
                caller,
                car,
                BookingRequest {
                    name: "Jo Renter".to_string(),
                    email: "jo@example.com".to_string(),
                    start_date: Some(Date::constant(2026, 3, 14)),
                    return_date: Some(Date::constant(2026, 3, 17)),
                },
                Date::constant(2026, 3, 14),
            )
            .await?;

        Ok(car)
    }

    #[tokio::test]
    async fn paid_and_elapsed_bookings_are_freed() -> TestResult {
        let ctx = TestContext::new();
        let caller = ctx.seed_user(Role::User).await?;

        let (car, booking) = ctx
            .seed_booked_car(
                caller,
                Date::constant(2026, 3, 14),
                Date::constant(2026, 3, 17),
            )
            .await?;

        let payment = ctx
            .payments
            .insert_payment(&crate::test::fixtures::new_payment(
                caller.user_uuid,
                booking,
                car,
                PaymentStatus::Pending,
            ))
            .await?
            .expect("payment should insert");
        ctx.payments.complete_payment(payment.uuid).await?;

        let stats = sweep(ctx.cars.as_ref(), ctx.payments.as_ref(), TODAY).await;

        assert_eq!(stats, SweepStats { freed: 1, skipped: 0 });

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        assert!(record.booking.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn abandoned_unpaid_bookings_are_freed() -> TestResult {
        let ctx = TestContext::new();
        let caller = ctx.seed_user(Role::User).await?;

        let (car, _) = ctx
            .seed_booked_car(
                caller,
                Date::constant(2026, 3, 14),
                Date::constant(2026, 3, 17),
            )
            .await?;

        let stats = sweep(ctx.cars.as_ref(), ctx.payments.as_ref(), TODAY).await;

        assert_eq!(stats.freed, 1);

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        assert!(record.booking.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn future_bookings_are_untouched() -> TestResult {
        let ctx = TestContext::new();
        let caller = ctx.seed_user(Role::User).await?;

        let (car, _) = ctx
            .seed_booked_car(
                caller,
                Date::constant(2026, 3, 21),
                Date::constant(2026, 3, 24),
            )
            .await?;

        let stats = sweep(ctx.cars.as_ref(), ctx.payments.as_ref(), TODAY).await;

        assert_eq!(stats, SweepStats::default());

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        assert!(record.booking.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn paid_rental_lifecycle_frees_the_car_and_keeps_the_ledger() -> TestResult {
        let ctx = TestContext::new();
        let payments = payments_service(&ctx);
        let caller = ctx.seed_user(Role::User).await?;

        let car = book_through_service(&ctx, caller).await?;

        let initiated = payments
            .initiate_payment(
                caller,
                PaymentRequest {
                    car_uuid: car,
                    car_name: "Aurora GT".to_string(),
                    amount: 15_000,
                },
                Timestamp::now(),
            )
            .await?;
        payments
            .complete_payment(caller, initiated.payment.uuid)
            .await?;

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        let booking = record.booking.expect("car should be booked");

        let stats = sweep(ctx.cars.as_ref(), ctx.payments.as_ref(), TODAY).await;

        assert_eq!(stats, SweepStats { freed: 1, skipped: 0 });

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        assert!(record.booking.is_none());

        // The completed payment stays in history after the car is freed.
        let ledger = ctx
            .payments
            .find_by_booking(booking.booking_uuid)
            .await?
            .expect("ledger row should survive reclamation");
        assert_eq!(ledger.status, PaymentStatus::Completed);

        Ok(())
    }

    #[tokio::test]
    async fn abandoned_rental_lifecycle_frees_the_car_with_no_ledger_row() -> TestResult {
        let ctx = TestContext::new();
        let caller = ctx.seed_user(Role::User).await?;

        let car = book_through_service(&ctx, caller).await?;

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        let booking = record.booking.expect("car should be booked");

        let stats = sweep(ctx.cars.as_ref(), ctx.payments.as_ref(), TODAY).await;

        assert_eq!(stats, SweepStats { freed: 1, skipped: 0 });

        let record = ctx.cars.get_car(car).await?.expect("car should exist");
        assert!(record.booking.is_none());
        assert!(
            ctx.payments
                .find_by_booking(booking.booking_uuid)
                .await?
                .is_none(),
            "no payment was ever initiated"
        );

        Ok(())
    }

    #[tokio::test]
    async fn spawned_job_stops_cleanly() -> TestResult {
        let ctx = TestContext::new();

        let job = ReclamationJob::spawn(
            ctx.cars_repository(),
            ctx.payments_repository(),
            Duration::from_secs(3600),
        );

        job.stop().await;

        Ok(())
    }
}
