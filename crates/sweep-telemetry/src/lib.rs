//! Structured logging and run reporting for the balance sweep bot.
//!
//! - Tracing setup with compact or JSON output
//! - End-of-run sweep summaries with stranded balance accounting

pub mod error;
pub mod logging;
pub mod report;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogFormat};
pub use report::{RunReport, SweepOutcome, SweepRecord};
