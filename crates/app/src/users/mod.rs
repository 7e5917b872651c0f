//! User profiles, consumed as a collaborator boundary.
//!
//! Registration and credential storage live outside this core; the booking
//! flow only needs to resolve a caller to a known profile.

mod memory;
mod models;
mod repository;

pub use memory::MemoryUsersRepository;
pub use models::*;
pub use repository::{MockUsersRepository, PgUsersRepository, UsersRepository};
