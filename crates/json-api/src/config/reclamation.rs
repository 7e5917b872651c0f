//! Reclamation Config

use clap::Args;

/// Booking reclamation job settings.
#[derive(Debug, Args)]
pub struct ReclamationConfig {
    /// Seconds between reclamation sweeps
    #[arg(long, env = "RECLAMATION_PERIOD_SECS", default_value_t = 3600)]
    pub reclamation_period_secs: u64,
}
