//! Payments: the ledger tied to booking occurrences.

pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;

pub use errors::PaymentsServiceError;
pub use memory::MemoryPaymentsRepository;
pub use models::*;
pub use repository::{MockPaymentsRepository, PaymentsRepository, PgPaymentsRepository};
pub use service::{CarPaymentsService, MockPaymentsService, PaymentsService};
