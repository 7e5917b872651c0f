//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::auth::{
    AuthServiceError, Caller, repository::PgAuthRepository, token::hash_api_token,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Caller, AuthServiceError> {
        self.repository
            .find_caller_by_token_hash(&hash_api_token(bearer_token))
            .await
            .map_err(AuthServiceError::from)?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the caller it identifies.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Caller, AuthServiceError>;
}
