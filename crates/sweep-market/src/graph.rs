//! The directed conversion graph built from one market snapshot.
//!
//! Each currency is a node; each open, liquid pair contributes two directed
//! edges, one per conversion direction. The graph is immutable once built
//! and is rebuilt wholesale from a fresh snapshot after any execution
//! failure, so its state always reflects exactly one snapshot generation.

use crate::error::{MarketError, Result};
use crate::snapshot::{MarketQuote, MarketSnapshot, TradePair};
use rust_decimal::Decimal;
use std::collections::HashMap;
use sweep_core::{Amount, Rate};
use tracing::debug;

/// A directed conversion edge from one currency to a neighbor.
///
/// Edges are derived from pair quotes during the build, never constructed
/// by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Destination currency symbol.
    pub to: String,
    /// Units of the destination obtained per unit of the source.
    pub rate: Rate,
    /// Pair fee in percent.
    pub fee_pct: Decimal,
    /// Smallest input quantity the venue accepts on this edge.
    pub min_input: Amount,
    /// 24h traded volume in destination units, used as a liquidity cap.
    pub volume_ceiling: Amount,
}

/// A currency node with its outgoing edges.
#[derive(Debug, Clone)]
pub struct CurrencyNode {
    pub symbol: String,
    pub name: String,
    /// Smallest base-currency order for this currency.
    pub min_base_trade: Amount,
    edges: Vec<Edge>,
}

impl CurrencyNode {
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn has_edge_to(&self, symbol: &str) -> bool {
        self.edges.iter().any(|e| e.to == symbol)
    }
}

/// The conversion graph plus pair/quote lookup for execution.
#[derive(Debug, Clone, Default)]
pub struct MarketGraph {
    nodes: HashMap<String, CurrencyNode>,
    pairs: HashMap<u64, TradePair>,
    quotes: HashMap<u64, MarketQuote>,
}

impl MarketGraph {
    /// Build a graph from a snapshot.
    ///
    /// Pairs with non-OK status or a non-positive bid or ask contribute no
    /// edges. At most one edge exists per ordered (from, to) pair; a
    /// duplicate pair in the snapshot is skipped.
    pub fn build(snapshot: MarketSnapshot) -> Self {
        let mut nodes: HashMap<String, CurrencyNode> = snapshot
            .currencies
            .iter()
            .map(|c| {
                (
                    c.symbol.clone(),
                    CurrencyNode {
                        symbol: c.symbol.clone(),
                        name: c.name.clone(),
                        min_base_trade: c.min_base_trade,
                        edges: Vec::new(),
                    },
                )
            })
            .collect();

        let pairs: HashMap<u64, TradePair> =
            snapshot.pairs.into_iter().map(|p| (p.id, p)).collect();

        // Walk quotes in snapshot order so identical snapshots always
        // produce identical edge lists; map iteration order would not.
        let mut edge_count = 0usize;
        for quote in &snapshot.quotes {
            let Some(pair) = pairs.get(&quote.trade_pair_id) else {
                continue;
            };
            if !pair.is_open() || !quote.is_liquid() {
                continue;
            }
            let Some(inverse) = quote.ask.invert() else {
                continue;
            };
            if !nodes.contains_key(&pair.symbol) || !nodes.contains_key(&pair.base_symbol) {
                continue;
            }

            // symbol -> base: sell at the bid. The venue minimum is quoted
            // in base units, so the input floor is min_base_trade / bid.
            let min_input_sell = Amount::new(pair.minimum_base_trade.inner() / quote.bid.inner());
            if let Some(sym_node) = nodes.get_mut(&pair.symbol) {
                if !sym_node.has_edge_to(&pair.base_symbol) {
                    sym_node.edges.push(Edge {
                        to: pair.base_symbol.clone(),
                        rate: quote.bid,
                        fee_pct: pair.trade_fee_pct,
                        min_input: min_input_sell,
                        volume_ceiling: quote.volume,
                    });
                    edge_count += 1;
                }
            }

            // base -> symbol: buy at the ask, so the rate is 1/ask.
            if let Some(base_node) = nodes.get_mut(&pair.base_symbol) {
                if !base_node.has_edge_to(&pair.symbol) {
                    base_node.edges.push(Edge {
                        to: pair.symbol.clone(),
                        rate: inverse,
                        fee_pct: pair.trade_fee_pct,
                        min_input: pair.minimum_base_trade,
                        volume_ceiling: quote.base_volume,
                    });
                    edge_count += 1;
                }
            }
        }

        debug!(
            currencies = nodes.len(),
            pairs = pairs.len(),
            edges = edge_count,
            "Market graph built"
        );

        let quotes: HashMap<u64, MarketQuote> = snapshot
            .quotes
            .into_iter()
            .map(|q| (q.trade_pair_id, q))
            .collect();

        Self {
            nodes,
            pairs,
            quotes,
        }
    }

    pub fn node(&self, symbol: &str) -> Option<&CurrencyNode> {
        self.nodes.get(symbol)
    }

    pub fn currency_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the unique pair trading these two currencies, in either order.
    pub fn pair_for(&self, a: &str, b: &str) -> Result<&TradePair> {
        let mut found = None;
        for pair in self.pairs.values() {
            if pair.matches(a, b) {
                if found.is_some() {
                    return Err(MarketError::AmbiguousPair(a.to_string(), b.to_string()));
                }
                found = Some(pair);
            }
        }
        found.ok_or_else(|| MarketError::NoPair(a.to_string(), b.to_string()))
    }

    /// Quote for a pair id, as of this snapshot generation.
    pub fn quote_for(&self, pair_id: u64) -> Result<&MarketQuote> {
        self.quotes
            .get(&pair_id)
            .ok_or(MarketError::NoQuote(pair_id))
    }
}
