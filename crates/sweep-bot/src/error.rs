//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Market error: {0}")]
    Market(#[from] sweep_market::MarketError),

    #[error("Client error: {0}")]
    Client(#[from] sweep_client::ClientError),

    #[error("Executor error: {0}")]
    Executor(#[from] sweep_executor::ExecutorError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] sweep_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
