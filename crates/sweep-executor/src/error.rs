//! Error types for sweep-executor.

use sweep_client::ClientError;
use sweep_market::MarketError;
use thiserror::Error;

/// Execution errors.
///
/// `PairMismatch` and `RateUnderflow` are precondition failures: the first
/// indicates a graph/pair inconsistency bug, the second a quote too small
/// for the venue's precision. Both are fatal to the run. Client errors are
/// recoverable at route granularity and handled by the route walker.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Route leg {from}->{to} does not match pair {pair_label}")]
    PairMismatch {
        pair_label: String,
        from: String,
        to: String,
    },

    #[error("Order rate quantized to zero: {raw}")]
    RateUnderflow { raw: String },

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result type alias for executor operations.
pub type Result<T> = std::result::Result<T, ExecutorError>;
