//! Order-related types.
//!
//! Provides the order side and the quantized trade order submitted to the
//! venue for one hop of a route.

use crate::{Amount, Rate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
///
/// Determined by where the source currency sits in the pair label: selling
/// the pair's trade symbol is a Sell, spending the base symbol is a Buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Wire name expected by the venue API.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// A fully-parameterized order ready for submission.
///
/// Rate and amount are already quantized per the venue precision policy.
/// Ephemeral: discarded once the hop settles or the route is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOrder {
    /// Venue trade pair identifier.
    pub pair_id: u64,
    /// Buy or sell.
    pub side: OrderSide,
    /// Limit rate in base currency per trade-symbol unit.
    pub rate: Rate,
    /// Amount, always in trade-symbol units regardless of side.
    pub amount: Amount,
}

impl fmt::Display for TradeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {} (pair {})",
            self.side, self.amount, self.rate, self.pair_id
        )
    }
}
