//! Error types for sweep-market.

use thiserror::Error;

/// Market graph and lookup errors.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("No trade pair for {0}/{1}")]
    NoPair(String, String),

    #[error("Multiple trade pairs for {0}/{1}")]
    AmbiguousPair(String, String),

    #[error("No quote for trade pair {0}")]
    NoQuote(u64),
}

/// Result type alias for market operations.
pub type Result<T> = std::result::Result<T, MarketError>;
