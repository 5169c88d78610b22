//! Core domain types for the balance sweep bot.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Amount`, `Rate`: precision-safe numeric types
//! - `Precision`, `RoundingMode`: venue quantization policy
//! - `OrderSide`, `TradeOrder`: order parameters for one hop
//! - `Route`, `RouteLeg`: a conversion path with projected quantities

pub mod decimal;
pub mod error;
pub mod order;
pub mod route;

pub use decimal::{Amount, Precision, Rate, RoundingMode};
pub use error::{CoreError, Result};
pub use order::{OrderSide, TradeOrder};
pub use route::{Route, RouteLeg};
