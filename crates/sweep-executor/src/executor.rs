//! Hop and route execution against the venue.
//!
//! A hop is submitted as a limit order and considered settled only when the
//! destination balance actually grows by the planned quantity, less one
//! quantum of venue-side rounding. An order the venue never fills is
//! canceled at the timeout and the route is abandoned with funds parked in
//! whatever currency the last confirmed hop delivered.

use crate::error::{ExecutorError, Result};
use crate::plan::{plan_hop, HopPlan, PlanPolicy};
use std::time::Duration;
use sweep_client::ExchangeApi;
use sweep_core::{Amount, Route};
use sweep_market::MarketGraph;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Runtime execution settings.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionConfig {
    pub policy: PlanPolicy,
    /// How long to wait for a hop to settle before canceling the order.
    /// Also bounds the pre-hop wait for held balances to release.
    pub settlement_timeout: Duration,
    /// Spacing between destination balance polls.
    pub poll_interval: Duration,
    /// When set, no orders are submitted and every hop confirms at its
    /// planned delivered quantity.
    pub dry_run: bool,
    /// Simulated settlement latency per hop in dry-run mode.
    pub dry_run_delay: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            policy: PlanPolicy::default(),
            settlement_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(5),
            dry_run: false,
            dry_run_delay: Duration::from_secs(1),
        }
    }
}

/// Result of executing one hop.
#[derive(Debug, Clone, PartialEq)]
pub enum HopOutcome {
    /// The destination balance grew by at least the planned quantity.
    Confirmed { delivered: Amount },
    /// The order did not settle within the timeout and was canceled.
    TimedOut,
}

/// Result of walking one route.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// Every hop settled; `delivered` is the quantity confirmed at the
    /// target currency.
    Completed { delivered: Amount },
    /// The walk stopped before the target. Funds sit in the currency the
    /// hop at `at_hop` (zero-based) was converting from.
    Abandoned { at_hop: usize, reason: String },
}

/// Executes planned hops and walks routes against an exchange client.
pub struct TradeExecutor<'a, C: ExchangeApi> {
    client: &'a C,
    config: ExecutionConfig,
}

impl<'a, C: ExchangeApi> TradeExecutor<'a, C> {
    pub fn new(client: &'a C, config: ExecutionConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    async fn available(&self, symbol: &str) -> Result<Amount> {
        let balance = self.client.get_balance(symbol).await?;
        Ok(balance.map(|b| b.available).unwrap_or(Amount::ZERO))
    }

    /// Submit one planned hop and wait for settlement.
    ///
    /// Settlement is verified against the balance ledger, not the order
    /// book: the destination balance must grow by the planned quantity
    /// within one precision quantum. On timeout the order is canceled if
    /// the venue assigned it an id; a failed cancel is logged but does not
    /// escalate, since the order may have filled in the race.
    pub async fn execute_hop(&self, plan: &HopPlan) -> Result<HopOutcome> {
        if self.config.dry_run {
            info!(order = %plan.order, destination = %plan.destination, "Dry run, order not submitted");
            tokio::time::sleep(self.config.dry_run_delay).await;
            return Ok(HopOutcome::Confirmed {
                delivered: plan.expected_delivered,
            });
        }

        let baseline = self.available(&plan.destination).await?;
        info!(order = %plan.order, destination = %plan.destination, "Submitting order");
        let order_id = self.client.submit_trade(&plan.order).await?;

        let floor = plan.expected_delivered.inner() - self.config.policy.precision.quantum();
        let deadline = Instant::now() + self.config.settlement_timeout;
        loop {
            tokio::time::sleep(self.config.poll_interval).await;

            let current = self.available(&plan.destination).await?;
            let delta = current - baseline;
            debug!(destination = %plan.destination, delta = %delta, "Settlement poll");
            if delta.inner() >= floor {
                info!(destination = %plan.destination, delivered = %delta, "Hop settled");
                return Ok(HopOutcome::Confirmed { delivered: delta });
            }

            if Instant::now() >= deadline {
                warn!(order = %plan.order, "Hop did not settle within timeout");
                if let Some(id) = order_id {
                    if let Err(e) = self.client.cancel_trade(id).await {
                        warn!(order_id = %id, error = %e, "Failed to cancel unsettled order");
                    }
                }
                return Ok(HopOutcome::TimedOut);
            }
        }
    }

    /// Reconcile the projected hop input against the live balance.
    ///
    /// Waits for held balances to release while any remain, bounded by the
    /// settlement timeout, then shrinks the input to what is actually
    /// available. The projection can overstate reality when a prior run
    /// left partial fills behind.
    async fn settle_input(&self, symbol: &str, wanted: Amount) -> Result<Amount> {
        let deadline = Instant::now() + self.config.settlement_timeout;
        loop {
            let balance = self.client.get_balance(symbol).await?;
            let (available, held) = match balance {
                Some(b) => (b.available, b.held_for_trades),
                None => (Amount::ZERO, Amount::ZERO),
            };

            if available >= wanted {
                return Ok(wanted);
            }
            if held.is_positive() && Instant::now() < deadline {
                debug!(%symbol, %available, %held, "Waiting for held balance to release");
                tokio::time::sleep(self.config.poll_interval).await;
                continue;
            }
            if available < wanted {
                warn!(%symbol, %wanted, %available, "Shrinking hop input to available balance");
            }
            return Ok(available);
        }
    }

    /// Walk a route hop by hop, threading each confirmed delivery into the
    /// next hop's input.
    ///
    /// Venue and transport failures abandon the route rather than the run:
    /// funds stay where the last confirmed hop left them and the caller
    /// rebuilds its view of the market before trying again. Plan
    /// precondition failures and graph lookup failures propagate as errors.
    pub async fn execute_route(&self, graph: &MarketGraph, route: &Route) -> Result<RouteOutcome> {
        if !route.is_actionable() {
            return Ok(RouteOutcome::Completed {
                delivered: route.delivered(),
            });
        }

        info!(%route, "Executing route");
        let mut carried = route.legs[0].quantity;

        for (index, (from, to)) in route.hops().enumerate() {
            let pair = graph.pair_for(&from.symbol, &to.symbol)?;
            let quote = graph.quote_for(pair.id)?;

            if !self.config.dry_run {
                carried = match self.settle_input(&from.symbol, carried).await {
                    Ok(amount) => amount,
                    Err(ExecutorError::Client(e)) => {
                        return Ok(RouteOutcome::Abandoned {
                            at_hop: index,
                            reason: format!("balance check failed: {e}"),
                        });
                    }
                    Err(e) => return Err(e),
                };
                if !carried.is_positive() {
                    return Ok(RouteOutcome::Abandoned {
                        at_hop: index,
                        reason: format!("no available {} balance", from.symbol),
                    });
                }
            }

            let plan = plan_hop(pair, quote, &from.symbol, &to.symbol, carried, &self.config.policy)?;

            match self.execute_hop(&plan).await {
                Ok(HopOutcome::Confirmed { delivered }) => {
                    carried = delivered;
                }
                Ok(HopOutcome::TimedOut) => {
                    return Ok(RouteOutcome::Abandoned {
                        at_hop: index,
                        reason: "settlement timed out".to_string(),
                    });
                }
                Err(ExecutorError::Client(e)) => {
                    warn!(hop = index, error = %e, "Hop failed, abandoning route");
                    return Ok(RouteOutcome::Abandoned {
                        at_hop: index,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(delivered = %carried, "Route completed");
        Ok(RouteOutcome::Completed { delivered: carried })
    }
}
