//! Application configuration.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use sweep_core::Precision;
use sweep_executor::{ExecutionConfig, PlanPolicy};
use sweep_market::RouteParams;

/// Venue API endpoint and credentials.
///
/// The private key is the venue's base64-encoded HMAC secret. Keep it out
/// of version control; the config file should be readable only by the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API public key.
    pub public_key: String,
    /// API private key, base64 encoded.
    pub private_key: String,
}

fn default_base_url() -> String {
    "https://www.cryptopia.co.nz/api".to_string()
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Currency every balance is converted into.
    pub target_currency: String,
    /// Fraction of each available balance to sell, in (0, 1].
    #[serde(default = "default_sell_fraction")]
    pub sell_fraction: Decimal,
    /// Maximum conversions per route (normally set via --max-trades).
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    /// Fractional rate concession per hop, both in route projection and in
    /// order pricing.
    #[serde(default)]
    pub slippage_buffer: Decimal,
    /// A hop is skipped when its quantity exceeds the edge's 24h volume
    /// divided by this.
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: Decimal,
    /// Seconds to wait for a hop to settle before canceling.
    #[serde(default = "default_settlement_timeout_secs")]
    pub settlement_timeout_secs: u64,
    /// Seconds between settlement polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Fractional digits the venue accepts on rates and amounts.
    #[serde(default = "default_price_digits")]
    pub price_digits: u32,
    /// Whether the venue deducts the Buy fee from the order amount.
    #[serde(default = "default_buy_fee_in_amount")]
    pub buy_fee_in_amount: bool,
    /// Per-currency balance to leave untouched.
    #[serde(default)]
    pub stop_balances: HashMap<String, Decimal>,
    /// Percent of the run total to transfer to `donation_user` post-run.
    #[serde(default)]
    pub donation_pct: Decimal,
    /// Venue username receiving the donation transfer.
    #[serde(default)]
    pub donation_user: Option<String>,
    /// External address to withdraw the remaining target balance to.
    #[serde(default)]
    pub withdraw_address: Option<String>,
    /// Only sweep this one currency (normally set via --coin).
    #[serde(default)]
    pub coin_filter: Option<String>,
    /// Plan and narrate without submitting anything.
    #[serde(default)]
    pub dry_run: bool,
    /// Venue API settings.
    pub api: ApiConfig,
}

fn default_sell_fraction() -> Decimal {
    Decimal::ONE
}

fn default_max_hops() -> usize {
    3
}

fn default_volume_threshold() -> Decimal {
    Decimal::from(20)
}

fn default_settlement_timeout_secs() -> u64 {
    120
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_price_digits() -> u32 {
    8
}

fn default_buy_fee_in_amount() -> bool {
    true
}

impl AppConfig {
    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            return Err(AppError::Config(format!("Config file not found: {path}")));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Check the invariants no later stage re-checks.
    ///
    /// Runs before any network call; a violation is fatal.
    pub fn validate(&self) -> AppResult<()> {
        if self.target_currency.trim().is_empty() {
            return Err(AppError::Config("target_currency must be set".into()));
        }
        if self.sell_fraction <= Decimal::ZERO || self.sell_fraction > Decimal::ONE {
            return Err(AppError::Config(format!(
                "sell_fraction must be in (0, 1], got {}",
                self.sell_fraction
            )));
        }
        if self.max_hops < 1 {
            return Err(AppError::Config("max_hops must be at least 1".into()));
        }
        if self.volume_threshold <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "volume_threshold must be positive, got {}",
                self.volume_threshold
            )));
        }
        if self.price_digits > 28 {
            return Err(AppError::Config(format!(
                "price_digits must be at most 28, got {}",
                self.price_digits
            )));
        }
        if self.donation_pct < Decimal::ZERO || self.donation_pct > Decimal::ONE_HUNDRED {
            return Err(AppError::Config(format!(
                "donation_pct must be in [0, 100], got {}",
                self.donation_pct
            )));
        }
        Ok(())
    }

    /// Route finder parameters derived from this config.
    pub fn route_params(&self) -> RouteParams {
        RouteParams {
            max_hops: self.max_hops,
            slippage_buffer: self.slippage_buffer,
            volume_threshold: self.volume_threshold,
        }
    }

    /// Execution settings derived from this config.
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            policy: PlanPolicy {
                precision: Precision::new(self.price_digits),
                slippage_buffer: self.slippage_buffer,
                buy_fee_in_amount: self.buy_fee_in_amount,
            },
            settlement_timeout: Duration::from_secs(self.settlement_timeout_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            dry_run: self.dry_run,
            ..ExecutionConfig::default()
        }
    }

    /// Balance floor to leave untouched for a currency.
    pub fn stop_balance(&self, symbol: &str) -> Decimal {
        self.stop_balances.get(symbol).copied().unwrap_or(Decimal::ZERO)
    }
}
