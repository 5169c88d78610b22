//! Raw venue metadata records and the one-shot market snapshot.
//!
//! Field names mirror the venue wire format (PascalCase JSON). Records are
//! immutable once loaded; a refresh replaces the whole snapshot, never
//! patches it in place.

use serde::{Deserialize, Serialize};
use sweep_core::{Amount, Rate};

/// Per-currency metadata from the venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "Id")]
    pub id: u64,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Smallest base-currency order the venue accepts for this currency.
    #[serde(rename = "MinBaseTrade")]
    pub min_base_trade: Amount,
    #[serde(rename = "Status")]
    pub status: String,
}

impl Currency {
    pub fn is_tradeable(&self) -> bool {
        self.status == "OK"
    }
}

/// Per-pair metadata from the venue.
///
/// A pair is labelled `Symbol/BaseSymbol` (e.g. `XVG/BTC`); orders are
/// placed in trade-symbol units at a rate in base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePair {
    #[serde(rename = "Id")]
    pub id: u64,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "BaseSymbol")]
    pub base_symbol: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "TradeFee")]
    pub trade_fee_pct: rust_decimal::Decimal,
    #[serde(rename = "MinimumTrade")]
    pub minimum_trade: Amount,
    #[serde(rename = "MaximumTrade")]
    pub maximum_trade: Amount,
    #[serde(rename = "MinimumBaseTrade")]
    pub minimum_base_trade: Amount,
    #[serde(rename = "MaximumBaseTrade")]
    pub maximum_base_trade: Amount,
}

impl TradePair {
    pub fn is_open(&self) -> bool {
        self.status == "OK"
    }

    /// True when `symbol` is one of the pair's two currencies.
    pub fn involves(&self, symbol: &str) -> bool {
        self.symbol == symbol || self.base_symbol == symbol
    }

    /// True when the pair trades exactly these two currencies, either way.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.symbol == a && self.base_symbol == b)
            || (self.symbol == b && self.base_symbol == a)
    }
}

/// Live quote for one pair at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    #[serde(rename = "TradePairId")]
    pub trade_pair_id: u64,
    #[serde(rename = "BidPrice")]
    pub bid: Rate,
    #[serde(rename = "AskPrice")]
    pub ask: Rate,
    /// 24h traded volume in trade-symbol units.
    #[serde(rename = "Volume")]
    pub volume: Amount,
    /// 24h traded volume in base-symbol units.
    #[serde(rename = "BaseVolume")]
    pub base_volume: Amount,
}

impl MarketQuote {
    /// A quote with a non-positive side marks an illiquid market; such
    /// pairs are pruned from the graph entirely.
    pub fn is_liquid(&self) -> bool {
        self.bid.is_positive() && self.ask.is_positive()
    }
}

/// One generation of venue state: everything the graph builds from.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub currencies: Vec<Currency>,
    pub pairs: Vec<TradePair>,
    pub quotes: Vec<MarketQuote>,
}

impl MarketSnapshot {
    pub fn new(currencies: Vec<Currency>, pairs: Vec<TradePair>, quotes: Vec<MarketQuote>) -> Self {
        Self {
            currencies,
            pairs,
            quotes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_deserializes_wire_format() {
        let raw = r#"{
            "Id": 2,
            "Symbol": "XVG",
            "Name": "Verge",
            "MinBaseTrade": 0.00005,
            "Status": "OK"
        }"#;
        let currency: Currency = serde_json::from_str(raw).unwrap();
        assert_eq!(currency.symbol, "XVG");
        assert_eq!(currency.min_base_trade.inner(), dec!(0.00005));
        assert!(currency.is_tradeable());
    }

    #[test]
    fn test_pair_matches_either_direction() {
        let pair = TradePair {
            id: 100,
            symbol: "XVG".into(),
            base_symbol: "BTC".into(),
            label: "XVG/BTC".into(),
            status: "OK".into(),
            trade_fee_pct: dec!(0.2),
            minimum_trade: Amount::new(dec!(0.00000001)),
            maximum_trade: Amount::new(dec!(100000000)),
            minimum_base_trade: Amount::new(dec!(0.00005)),
            maximum_base_trade: Amount::new(dec!(100000000)),
        };
        assert!(pair.matches("XVG", "BTC"));
        assert!(pair.matches("BTC", "XVG"));
        assert!(!pair.matches("BTC", "ETH"));
        assert!(pair.involves("BTC"));
        assert!(!pair.involves("ETH"));
    }

    #[test]
    fn test_quote_liquidity() {
        let mut quote = MarketQuote {
            trade_pair_id: 100,
            bid: Rate::new(dec!(0.00001119)),
            ask: Rate::new(dec!(0.00001125)),
            volume: Amount::new(dec!(1000000)),
            base_volume: Amount::new(dec!(11.2)),
        };
        assert!(quote.is_liquid());
        quote.ask = Rate::ZERO;
        assert!(!quote.is_liquid());
    }
}
