//! Balance sweep bot.
//!
//! Orchestrates one sweep run:
//! - Load and validate configuration
//! - Fetch the market snapshot and build the conversion graph
//! - Route and execute each sweepable balance toward the target currency
//! - Recover from abandoned routes by rebuilding from fresh state
//! - Report the run total and any stranded balances

pub mod config;
pub mod error;
pub mod session;

pub use config::{ApiConfig, AppConfig};
pub use error::{AppError, AppResult};
pub use session::{SweepSession, WorkItem};
