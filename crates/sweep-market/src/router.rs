//! Depth-bounded route search over the market graph.
//!
//! Exhaustive DFS, not heuristic-pruned: the branching factor is bounded by
//! the currency count and the hop limit, which is small in practice
//! (hop limit around 3). The slippage buffer and the minimum/volume checks
//! are applied during the search so the chosen path is one the execution
//! engine can plausibly fill; they hedge against stale quotes, they do not
//! guarantee fills.

use crate::graph::MarketGraph;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sweep_core::{Amount, Route, RouteLeg};

/// Search constraints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteParams {
    /// Maximum number of conversions in a route.
    pub max_hops: usize,
    /// Fractional rate discount applied at every hop to improve fill odds.
    pub slippage_buffer: Decimal,
    /// Divisor on the 24h volume ceiling: inputs larger than
    /// `ceiling / volume_threshold` are rejected as likely to move the
    /// market or fail to fill.
    pub volume_threshold: Decimal,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            max_hops: 3,
            slippage_buffer: Decimal::ZERO,
            volume_threshold: Decimal::from(20),
        }
    }
}

/// Find the acyclic path from `source` to `target` that maximizes the
/// projected delivered quantity.
///
/// Returns `(Amount::ZERO, empty route)` when no path reaches the target
/// within the hop budget, or when the source currency is not in the graph.
/// Deterministic for a fixed graph and inputs; ties keep the first branch
/// found.
pub fn find_route(
    graph: &MarketGraph,
    source: &str,
    target: &str,
    quantity: Amount,
    params: &RouteParams,
) -> (Amount, Route) {
    if graph.node(source).is_none() {
        return (Amount::ZERO, Route::empty());
    }
    descend(graph, source, target, quantity, Route::empty(), params)
}

/// One DFS step: the path so far is taken by value and extended, never
/// shared mutably across branches.
fn descend(
    graph: &MarketGraph,
    symbol: &str,
    target: &str,
    quantity: Amount,
    mut path: Route,
    params: &RouteParams,
) -> (Amount, Route) {
    path.legs.push(RouteLeg::new(symbol, quantity));

    if symbol == target {
        return (quantity, path);
    }
    if path.len() > params.max_hops {
        return (Amount::ZERO, Route::empty());
    }

    let Some(node) = graph.node(symbol) else {
        return (Amount::ZERO, Route::empty());
    };

    let mut best_value = Amount::ZERO;
    let mut best_route = Route::empty();

    for edge in node.edges() {
        if path.contains(&edge.to) {
            continue;
        }
        // Too small to satisfy the venue minimum once the fee is taken.
        if quantity.after_fee_pct(edge.fee_pct) < edge.min_input {
            continue;
        }
        // Too large relative to recent liquidity.
        if quantity.inner() > edge.volume_ceiling.inner() / params.volume_threshold {
            continue;
        }

        let buffered = quantity.convert(edge.rate) * (Decimal::ONE - params.slippage_buffer);
        let delivered = buffered.after_fee_pct(edge.fee_pct);

        let (value, route) = descend(graph, &edge.to, target, delivered, path.clone(), params);
        if value > best_value {
            best_value = value;
            best_route = route;
        }
    }

    (best_value, best_route)
}
