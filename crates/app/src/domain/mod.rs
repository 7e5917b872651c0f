//! Domain modules.

pub mod bookings;
pub mod cars;
pub mod payments;
