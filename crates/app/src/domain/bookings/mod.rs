//! Bookings: claiming and releasing cars.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::BookingsServiceError;
pub use models::*;
pub use service::{BookingsService, CarBookingsService, MockBookingsService};
