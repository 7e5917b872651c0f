//! Cars: the rentable fleet and its booking state.

pub mod memory;
pub mod models;
pub mod repository;

pub use memory::MemoryCarsRepository;
pub use repository::{CarsRepository, MockCarsRepository, PgCarsRepository};
