//! The capability contract the rest of the system consumes.
//!
//! The executor and orchestrator only ever see this trait; signing, rate
//! pacing, and HTTP retry stay behind it. A call either returns a
//! venue-level success or an error — no HTTP mechanics leak through.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use sweep_core::{Amount, TradeOrder};
use sweep_market::{Currency, MarketQuote, MarketSnapshot, TradePair};

/// Venue-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One currency balance as the venue reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Available")]
    pub available: Amount,
    #[serde(rename = "HeldForTrades")]
    pub held_for_trades: Amount,
    #[serde(rename = "Status")]
    pub status: String,
}

impl Balance {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Exchange API capability contract.
#[allow(async_fn_in_trait)]
pub trait ExchangeApi {
    /// All currencies the venue lists.
    async fn get_currencies(&self) -> Result<Vec<Currency>>;

    /// All trade pairs the venue lists.
    async fn get_trade_pairs(&self) -> Result<Vec<TradePair>>;

    /// Live quotes for every market.
    async fn get_markets(&self) -> Result<Vec<MarketQuote>>;

    /// Account balances, optionally filtered to one currency symbol.
    async fn get_balances(&self, currency: Option<&str>) -> Result<Vec<Balance>>;

    /// Submit a limit order.
    ///
    /// Returns the venue order id, or `None` when the venue filled the
    /// order immediately and left nothing on the book.
    async fn submit_trade(&self, order: &TradeOrder) -> Result<Option<OrderId>>;

    /// Cancel an open order.
    async fn cancel_trade(&self, order_id: OrderId) -> Result<()>;

    /// Transfer funds to another account on the venue.
    async fn submit_transfer(&self, currency: &str, user: &str, amount: Amount) -> Result<()>;

    /// Withdraw funds to an external address.
    async fn submit_withdraw(&self, currency: &str, address: &str, amount: Amount) -> Result<()>;

    /// Fetch one full snapshot generation: currencies, pairs, quotes.
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot> {
        let currencies = self.get_currencies().await?;
        let pairs = self.get_trade_pairs().await?;
        let quotes = self.get_markets().await?;
        Ok(MarketSnapshot::new(currencies, pairs, quotes))
    }

    /// Convenience lookup for a single currency balance.
    async fn get_balance(&self, symbol: &str) -> Result<Option<Balance>> {
        let balances = self.get_balances(Some(symbol)).await?;
        Ok(balances.into_iter().find(|b| b.symbol == symbol))
    }
}

impl<T: ExchangeApi> ExchangeApi for &T {
    async fn get_currencies(&self) -> Result<Vec<Currency>> {
        (**self).get_currencies().await
    }

    async fn get_trade_pairs(&self) -> Result<Vec<TradePair>> {
        (**self).get_trade_pairs().await
    }

    async fn get_markets(&self) -> Result<Vec<MarketQuote>> {
        (**self).get_markets().await
    }

    async fn get_balances(&self, currency: Option<&str>) -> Result<Vec<Balance>> {
        (**self).get_balances(currency).await
    }

    async fn submit_trade(&self, order: &TradeOrder) -> Result<Option<OrderId>> {
        (**self).submit_trade(order).await
    }

    async fn cancel_trade(&self, order_id: OrderId) -> Result<()> {
        (**self).cancel_trade(order_id).await
    }

    async fn submit_transfer(&self, currency: &str, user: &str, amount: Amount) -> Result<()> {
        (**self).submit_transfer(currency, user, amount).await
    }

    async fn submit_withdraw(&self, currency: &str, address: &str, amount: Amount) -> Result<()> {
        (**self).submit_withdraw(currency, address, amount).await
    }
}
