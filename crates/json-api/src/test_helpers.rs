//! Shared scaffolding for handler tests.
//!
//! Every service the handlers never touch is mocked strictly, so a handler
//! reaching for the wrong service fails its test immediately.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use rental_app::{
    auth::{Caller, MockAuthService, Role},
    domain::{
        bookings::MockBookingsService,
        cars::models::{
            BookingDetails, BookingUuid, CarCategory, CarRecord, CarUuid, FuelType, Transmission,
        },
        payments::{MockPaymentsService, Payment, PaymentStatus, PaymentUuid},
    },
    users::UserUuid,
};
use salvo::{affix_state::inject, prelude::*};

use crate::{extensions::*, state::State};

/// The caller every handler test runs as.
pub(crate) const TEST_CALLER: Caller = Caller::new(UserUuid::from_uuid(uuid::Uuid::nil()), Role::User);

/// Stands in for the auth middleware in handler tests.
#[salvo::handler]
async fn authenticate_as_test_caller(depot: &mut Depot) {
    depot.insert_caller(TEST_CALLER);
}

fn strict_bookings() -> MockBookingsService {
    let mut bookings = MockBookingsService::new();

    bookings.expect_create_booking().never();
    bookings.expect_cancel_booking().never();
    bookings.expect_set_availability().never();
    bookings.expect_list_reserved().never();
    bookings.expect_list_rented().never();

    bookings
}

fn strict_payments() -> MockPaymentsService {
    let mut payments = MockPaymentsService::new();

    payments.expect_initiate_payment().never();
    payments.expect_complete_payment().never();
    payments.expect_list_payments().never();

    payments
}

fn strict_auth() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_bookings()),
        Arc::new(strict_payments()),
        Arc::new(auth),
    ))
}

fn service_with_state(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(authenticate_as_test_caller)
            .push(route),
    )
}

/// A service routing to `route` backed by the given bookings mock.
pub(crate) fn bookings_service(bookings: MockBookingsService, route: Router) -> Service {
    let state = Arc::new(State::new(
        Arc::new(bookings),
        Arc::new(strict_payments()),
        Arc::new(strict_auth()),
    ));

    service_with_state(state, route)
}

/// A service routing to `route` backed by the given payments mock.
pub(crate) fn payments_service(payments: MockPaymentsService, route: Router) -> Service {
    let state = Arc::new(State::new(
        Arc::new(strict_bookings()),
        Arc::new(payments),
        Arc::new(strict_auth()),
    ));

    service_with_state(state, route)
}

/// A free car with the given id.
pub(crate) fn make_car(uuid: CarUuid) -> CarRecord {
    let now = Timestamp::now();

    CarRecord {
        uuid,
        name: "Aurora GT".to_string(),
        brand: "Vela".to_string(),
        price_per_day: 5_000,
        category: CarCategory::Sedan,
        transmission: Transmission::Automatic,
        seats: 5,
        fuel_type: FuelType::Petrol,
        description: "A dependable mid-size sedan.".to_string(),
        image: "https://cars.example.com/aurora-gt.jpg".to_string(),
        booking: None,
        created_at: now,
        updated_at: now,
    }
}

/// A car currently booked by `user`.
pub(crate) fn booked_car(uuid: CarUuid, user: UserUuid) -> CarRecord {
    let mut car = make_car(uuid);

    car.booking = Some(BookingDetails {
        booking_uuid: BookingUuid::new(),
        user_uuid: user,
        booked_by: "Jo Renter".to_string(),
        booking_date: date(2026, 3, 14),
        return_date: date(2026, 3, 17),
        total_price: Some(15_000),
    });

    car
}

/// A pending payment by `user` for a booking of `car`.
pub(crate) fn make_payment(user: UserUuid, car: CarUuid) -> Payment {
    Payment {
        uuid: PaymentUuid::new(),
        user_uuid: user,
        booking_uuid: BookingUuid::new(),
        car_uuid: car,
        car_name: "Aurora GT".to_string(),
        amount: 15_000,
        status: PaymentStatus::Pending,
        created_at: Timestamp::now(),
    }
}
