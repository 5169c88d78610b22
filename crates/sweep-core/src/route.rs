//! Conversion routes through the pair graph.

use crate::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node visited along a route: a currency and the quantity held there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Currency symbol at this node.
    pub symbol: String,
    /// Quantity at this node: the sell quantity at the source, the
    /// projected delivered quantity everywhere downstream.
    pub quantity: Amount,
}

impl RouteLeg {
    pub fn new(symbol: impl Into<String>, quantity: Amount) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
        }
    }
}

/// An ordered path of currencies from a source to a target.
///
/// Invariants maintained by the route finder: no symbol repeats, and the
/// leg count never exceeds the configured hop limit plus one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
}

impl Route {
    pub fn new(legs: Vec<RouteLeg>) -> Self {
        Self { legs }
    }

    pub fn empty() -> Self {
        Self { legs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Number of conversions the route performs.
    pub fn hop_count(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    /// A route with fewer than two legs converts nothing.
    pub fn is_actionable(&self) -> bool {
        self.legs.len() > 1
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.legs.iter().any(|leg| leg.symbol == symbol)
    }

    /// Projected quantity delivered at the target, zero for an empty route.
    pub fn delivered(&self) -> Amount {
        self.legs.last().map(|leg| leg.quantity).unwrap_or(Amount::ZERO)
    }

    /// Consecutive (from, to) leg pairs, one per hop.
    pub fn hops(&self) -> impl Iterator<Item = (&RouteLeg, &RouteLeg)> {
        self.legs.iter().zip(self.legs.iter().skip(1))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for leg in &self.legs {
            if !first {
                write!(f, " -> ")?;
            }
            write!(f, "[{} ({})]", leg.symbol, leg.quantity)?;
            first = false;
        }
        Ok(())
    }
}
