//! Users repository.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::users::models::{NewUser, UserProfile, UserUuid};

const GET_USER_PROFILE_SQL: &str = include_str!("sql/get_user_profile.sql");
const INSERT_USER_SQL: &str = include_str!("sql/insert_user.sql");

#[automock]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Resolve a caller to their stored profile, if any.
    async fn get_profile(&self, user: UserUuid) -> Result<Option<UserProfile>, sqlx::Error>;

    /// Persist a new user.
    async fn insert_user(&self, user: &NewUser) -> Result<UserProfile, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn get_profile(&self, user: UserUuid) -> Result<Option<UserProfile>, sqlx::Error> {
        query_as::<Postgres, UserProfile>(GET_USER_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserProfile, sqlx::Error> {
        query(INSERT_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.token_hash)
            .execute(&self.pool)
            .await?;

        Ok(UserProfile {
            uuid: user.uuid,
            name: user.name.clone(),
            email: user.email.clone(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserProfile {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
        })
    }
}
