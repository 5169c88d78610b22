//! Error types for sweep-client.

use thiserror::Error;

/// Venue client errors.
///
/// `Venue` carries a failure the exchange itself reported (bad auth,
/// malformed request, insufficient funds detected server-side); everything
/// else is transport or decoding trouble on our side.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Venue reported failure: {0}")]
    Venue(String),

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Invalid API credentials: {0}")]
    Credentials(String),

    #[error("Rate limited by venue")]
    RateLimited,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
