//! User Models

use crate::{auth::Role, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserProfile>;

/// User Profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
}

/// New User persistence payload, used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token_hash: String,
}
