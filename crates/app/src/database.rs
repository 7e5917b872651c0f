//! Database connection management

use sqlx::{PgPool, migrate::Migrator};

/// Embedded schema migrations, applied on startup.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}
