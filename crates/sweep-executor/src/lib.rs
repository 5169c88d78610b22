//! Trade execution engine for the balance sweep bot.
//!
//! Splits execution into a pure planning step (`plan_hop`) and the
//! effectful walk (`TradeExecutor`), so order parameter math stays
//! testable without a venue.

pub mod error;
pub mod executor;
pub mod plan;

pub use error::{ExecutorError, Result};
pub use executor::{ExecutionConfig, HopOutcome, RouteOutcome, TradeExecutor};
pub use plan::{plan_hop, HopPlan, PlanPolicy};
