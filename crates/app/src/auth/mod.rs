//! Authentication: the access guard that turns bearer tokens into callers.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::{generate_api_token, hash_api_token};
