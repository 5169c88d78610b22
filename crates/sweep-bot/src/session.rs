//! Session orchestration.
//!
//! Owns the sweep run end to end: build the worklist from sweepable
//! balances, route and execute each entry, and recover from abandoned
//! routes by rebuilding the whole market view from fresh state. Confirmed
//! hops are never unwound; an abandoned route leaves its funds where the
//! last confirmed hop delivered them, and the rebuilt worklist carries
//! both the stranded currency and the abandoned one, so the failed
//! conversion is retried against current prices. Only currencies already
//! completed or skipped this run stay off rebuilt worklists; a currency
//! that keeps timing out is dropped after [`MAX_ROUTE_ATTEMPTS`] so a
//! dead market cannot spin the run forever.

use crate::config::AppConfig;
use crate::error::AppResult;
use std::collections::{HashMap, HashSet, VecDeque};
use sweep_client::ExchangeApi;
use sweep_core::Amount;
use sweep_executor::{RouteOutcome, TradeExecutor};
use sweep_market::{find_route, MarketGraph};
use sweep_telemetry::{RunReport, SweepOutcome};
use tracing::{info, warn};

/// Abandonments tolerated per currency before it is given up on.
const MAX_ROUTE_ATTEMPTS: u32 = 3;

/// One sweepable balance queued for conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub symbol: String,
    pub quantity: Amount,
}

/// Drives one sweep run against the venue.
pub struct SweepSession<C: ExchangeApi> {
    client: C,
    config: AppConfig,
}

impl<C: ExchangeApi> SweepSession<C> {
    pub fn new(client: C, config: AppConfig) -> Self {
        Self { client, config }
    }

    /// Balances worth sweeping, minus anything already settled this run.
    ///
    /// Sell quantity = available * sell_fraction - stop balance; entries
    /// that come out non-positive are dropped. Abandoned currencies are
    /// deliberately not excluded: rebuilt worklists retry them.
    async fn build_worklist(&self, settled: &HashSet<String>) -> AppResult<VecDeque<WorkItem>> {
        let balances = self.client.get_balances(None).await?;
        let mut worklist = VecDeque::new();

        for balance in balances {
            if !balance.is_ok() || balance.symbol == self.config.target_currency {
                continue;
            }
            if settled.contains(&balance.symbol) {
                continue;
            }
            if let Some(filter) = &self.config.coin_filter {
                if &balance.symbol != filter {
                    continue;
                }
            }

            let quantity = balance.available.inner() * self.config.sell_fraction
                - self.config.stop_balance(&balance.symbol);
            if quantity <= rust_decimal::Decimal::ZERO {
                continue;
            }
            worklist.push_back(WorkItem {
                symbol: balance.symbol,
                quantity: Amount::new(quantity),
            });
        }

        info!(entries = worklist.len(), "Worklist built");
        Ok(worklist)
    }

    /// Run the sweep to completion and return the report.
    pub async fn run(&self) -> AppResult<RunReport> {
        let mut report = RunReport::new(self.config.target_currency.as_str());
        let executor = TradeExecutor::new(&self.client, self.config.execution_config());
        let params = self.config.route_params();

        let snapshot = self.client.fetch_snapshot().await?;
        let mut graph = MarketGraph::build(snapshot);

        let mut settled: HashSet<String> = HashSet::new();
        let mut abandonments: HashMap<String, u32> = HashMap::new();
        let mut worklist = self.build_worklist(&settled).await?;

        while let Some(item) = worklist.pop_front() {
            let (projected, route) = find_route(
                &graph,
                &item.symbol,
                &self.config.target_currency,
                item.quantity,
                &params,
            );

            if !route.is_actionable() {
                info!(symbol = %item.symbol, "No actionable route, skipping");
                settled.insert(item.symbol.clone());
                report.record(
                    item.symbol.clone(),
                    item.quantity,
                    SweepOutcome::Skipped {
                        reason: "no actionable route".into(),
                    },
                );
                continue;
            }

            info!(symbol = %item.symbol, %route, %projected, "Route found");

            match executor.execute_route(&graph, &route).await? {
                RouteOutcome::Completed { delivered } => {
                    settled.insert(item.symbol.clone());
                    report.record(
                        item.symbol.clone(),
                        item.quantity,
                        SweepOutcome::Completed { delivered },
                    );
                }
                RouteOutcome::Abandoned { at_hop, reason } => {
                    let stranded_in = route.legs[at_hop].symbol.clone();
                    let attempts = abandonments.entry(item.symbol.clone()).or_insert(0);
                    *attempts += 1;

                    if *attempts >= MAX_ROUTE_ATTEMPTS {
                        warn!(
                            symbol = %item.symbol,
                            attempts = *attempts,
                            %stranded_in,
                            %reason,
                            "Giving up on currency after repeated abandonment"
                        );
                        settled.insert(item.symbol.clone());
                        report.record(
                            item.symbol.clone(),
                            item.quantity,
                            SweepOutcome::Abandoned {
                                stranded_in,
                                reason,
                            },
                        );
                    } else {
                        warn!(
                            symbol = %item.symbol,
                            at_hop,
                            %stranded_in,
                            %reason,
                            "Route abandoned, rebuilding market view to retry"
                        );
                    }

                    // Fresh snapshot and fresh balances: the abandoned
                    // currency comes back onto the worklist, and anything
                    // its confirmed hops stranded midway does too.
                    let snapshot = self.client.fetch_snapshot().await?;
                    graph = MarketGraph::build(snapshot);
                    worklist = self.build_worklist(&settled).await?;
                }
            }
        }

        self.post_run(report.total_delivered()).await?;
        report.output_summary();
        Ok(report)
    }

    /// Optional donation transfer and withdrawal of the swept total.
    ///
    /// Both are skipped in dry-run and when the run converted nothing.
    async fn post_run(&self, total: Amount) -> AppResult<()> {
        if self.config.dry_run || !total.is_positive() {
            return Ok(());
        }
        let target = &self.config.target_currency;

        if let Some(user) = &self.config.donation_user {
            if self.config.donation_pct > rust_decimal::Decimal::ZERO {
                let donation = Amount::new(
                    total.inner() * self.config.donation_pct / rust_decimal::Decimal::ONE_HUNDRED,
                );
                info!(%user, amount = %donation, "Sending donation transfer");
                self.client.submit_transfer(target, user, donation).await?;
            }
        }

        if let Some(address) = &self.config.withdraw_address {
            let balance = self.client.get_balance(target).await?;
            let available = balance.map(|b| b.available).unwrap_or(Amount::ZERO);
            if available.is_positive() {
                info!(%address, amount = %available, "Withdrawing swept balance");
                self.client
                    .submit_withdraw(target, address, available)
                    .await?;
            }
        }

        Ok(())
    }
}
