//! Tracing setup for sweep runs.
//!
//! A sweep run is a short-lived batch job whose log is read top to
//! bottom, so the default output is compact single-line text. JSON lines
//! are available for shipping run logs into a collector.

use crate::error::TelemetryResult;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for run logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line text, one event per line.
    Compact,
    /// JSON lines for log shipping.
    Json,
}

impl LogFormat {
    /// Resolve the format from the environment.
    ///
    /// `SWEEP_LOG=json` or `SWEEP_LOG=compact` selects explicitly;
    /// otherwise production runs (`RUST_ENV=production`) ship JSON and
    /// everything else gets the compact form.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var("SWEEP_LOG").ok().as_deref(),
            std::env::var("RUST_ENV").ok().as_deref(),
        )
    }

    fn resolve(sweep_log: Option<&str>, rust_env: Option<&str>) -> Self {
        match sweep_log {
            Some("json") => LogFormat::Json,
            Some("compact") => LogFormat::Compact,
            _ if rust_env == Some("production") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Install the process-wide tracing subscriber.
///
/// The default filter keeps the sweep crates at debug and quiets the
/// HTTP stack, whose per-request chatter would drown the hop narration.
/// `RUST_LOG` overrides it entirely.
pub fn init_logging(format: LogFormat) -> TelemetryResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sweep=debug,reqwest=warn,hyper=warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true))
            .init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false))
            .init(),
    }

    Ok(())
}
