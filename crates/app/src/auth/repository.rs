//! Auth repository.

use std::str::FromStr;

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    auth::models::{Caller, Role},
    users::UserUuid,
};

const FIND_CALLER_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_caller_by_token_hash.sql");

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_caller_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Caller>, sqlx::Error> {
        query_as::<Postgres, Caller>(FIND_CALLER_BY_TOKEN_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Caller {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            role: Role::from_str(&role).map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?,
        })
    }
}
