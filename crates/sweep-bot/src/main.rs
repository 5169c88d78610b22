//! Balance sweep bot - entry point.

use anyhow::Result;
use clap::Parser;
use sweep_bot::{AppConfig, SweepSession};
use sweep_client::{Credentials, HttpExchangeClient};
use tracing::info;

/// Balance sweep bot: convert held balances into one target currency.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SWEEP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Plan and narrate without submitting orders
    #[arg(long)]
    dry_run: bool,

    /// Only sweep this one currency
    #[arg(long)]
    coin: Option<String>,

    /// Maximum conversions per route (overrides max_hops)
    #[arg(short = 'm', long)]
    max_trades: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    sweep_telemetry::init_logging(sweep_telemetry::LogFormat::from_env())?;

    info!("Starting sweep bot v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > SWEEP_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("SWEEP_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let mut config = AppConfig::from_file(&config_path)?;
    if args.dry_run {
        config.dry_run = true;
    }
    if args.coin.is_some() {
        config.coin_filter = args.coin;
    }
    if let Some(max) = args.max_trades {
        config.max_hops = max;
    }
    config.validate()?;
    info!(
        target = %config.target_currency,
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    let credentials = Credentials::new(config.api.public_key.clone(), &config.api.private_key)?;
    let client = HttpExchangeClient::new(config.api.base_url.clone(), credentials)?;

    let session = SweepSession::new(client, config);
    let report = session.run().await?;

    info!(total = %report.total_delivered(), "Sweep run finished");
    Ok(())
}
