//! In-memory users repository for single-node use and tests.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;

use crate::users::{
    models::{NewUser, UserProfile, UserUuid},
    repository::UsersRepository,
};

#[derive(Debug, Default)]
pub struct MemoryUsersRepository {
    users: RwLock<HashMap<UserUuid, UserProfile>>,
}

impl MemoryUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for MemoryUsersRepository {
    async fn get_profile(&self, user: UserUuid) -> Result<Option<UserProfile>, sqlx::Error> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);

        Ok(users.get(&user).cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserProfile, sqlx::Error> {
        let profile = UserProfile {
            uuid: user.uuid,
            name: user.name.clone(),
            email: user.email.clone(),
        };

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);

        users.insert(user.uuid, profile.clone());

        Ok(profile)
    }
}
