//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database,
    domain::{
        bookings::{BookingsService, CarBookingsService},
        cars::{PgCarsRepository, repository::CarsRepository},
        payments::{CarPaymentsService, PaymentsService, PgPaymentsRepository,
            repository::PaymentsRepository},
    },
    users::{PgUsersRepository, UsersRepository},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub bookings: Arc<dyn BookingsService>,
    pub payments: Arc<dyn PaymentsService>,
    pub auth: Arc<dyn AuthService>,
    /// Shared with the reclamation job, which works below the service layer.
    pub cars_repository: Arc<dyn CarsRepository>,
    pub payments_repository: Arc<dyn PaymentsRepository>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL, applying any pending
    /// schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::MIGRATOR
            .run(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let cars: Arc<dyn CarsRepository> = Arc::new(PgCarsRepository::new(pool.clone()));
        let payments: Arc<dyn PaymentsRepository> =
            Arc::new(PgPaymentsRepository::new(pool.clone()));
        let users: Arc<dyn UsersRepository> = Arc::new(PgUsersRepository::new(pool.clone()));

        Ok(Self {
            bookings: Arc::new(CarBookingsService::new(
                Arc::clone(&cars),
                Arc::clone(&payments),
                users,
            )),
            payments: Arc::new(CarPaymentsService::new(
                Arc::clone(&payments),
                Arc::clone(&cars),
            )),
            auth: Arc::new(PgAuthService::new(pool)),
            cars_repository: cars,
            payments_repository: payments,
        })
    }
}
