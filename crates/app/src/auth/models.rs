//! Auth data models.

use std::{fmt, str::FromStr};

use crate::users::UserUuid;

/// The authenticated identity issuing a request.
///
/// Resolved once by the auth middleware; every service operating on shared
/// resources receives the whole caller, role included, rather than
/// re-deriving privileges ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub const fn new(user_uuid: UserUuid, role: Role) -> Self {
        Self { user_uuid, role }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Caller role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRole),
        }
    }
}

/// A stored role did not match any known variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown role value")]
pub struct UnknownRole;
