//! State

use std::sync::Arc;

use rental_app::{
    auth::AuthService,
    context::AppContext,
    domain::{bookings::BookingsService, payments::PaymentsService},
};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) bookings: Arc<dyn BookingsService>,
    pub(crate) payments: Arc<dyn PaymentsService>,
    pub(crate) auth: Arc<dyn AuthService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(
        bookings: Arc<dyn BookingsService>,
        payments: Arc<dyn PaymentsService>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            bookings,
            payments,
            auth,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: &AppContext) -> Arc<Self> {
        Arc::new(Self::new(
            Arc::clone(&app.bookings),
            Arc::clone(&app.payments),
            Arc::clone(&app.auth),
        ))
    }
}
