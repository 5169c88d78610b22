//! End-of-run sweep reporting.
//!
//! Collects the per-coin outcome of a sweep run and writes a summary to the
//! logs when the run finishes, including balances stranded mid-route by
//! abandoned conversions.

use chrono::{DateTime, Utc};
use sweep_core::Amount;
use tracing::info;

/// How one source coin fared.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepOutcome {
    /// Delivered this much of the target currency.
    Completed { delivered: Amount },
    /// Execution stopped mid-route; `stranded_in` names where the funds sit.
    Abandoned { stranded_in: String, reason: String },
    /// No actionable route existed, the balance was untouched.
    Skipped { reason: String },
}

/// One source coin's record within a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRecord {
    pub symbol: String,
    pub starting_balance: Amount,
    pub outcome: SweepOutcome,
}

/// Accumulates per-coin outcomes across one sweep run.
pub struct RunReport {
    target: String,
    started: DateTime<Utc>,
    records: Vec<SweepRecord>,
}

impl RunReport {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            started: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, symbol: impl Into<String>, starting_balance: Amount, outcome: SweepOutcome) {
        self.records.push(SweepRecord {
            symbol: symbol.into(),
            starting_balance,
            outcome,
        });
    }

    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    /// Total of the target currency delivered across the run.
    pub fn total_delivered(&self) -> Amount {
        self.records
            .iter()
            .filter_map(|r| match &r.outcome {
                SweepOutcome::Completed { delivered } => Some(*delivered),
                _ => None,
            })
            .fold(Amount::ZERO, |acc, d| acc + d)
    }

    /// Coins whose funds ended up somewhere other than source or target.
    pub fn stranded(&self) -> Vec<&SweepRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, SweepOutcome::Abandoned { .. }))
            .collect()
    }

    /// Output the run summary to logs.
    pub fn output_summary(&self) {
        let duration = Utc::now() - self.started;
        let minutes = duration.num_minutes();
        let seconds = duration.num_seconds() % 60;

        info!("========== Sweep Run Summary ==========");
        info!(
            "Started: {} (ran {}m {}s)",
            self.started.format("%Y-%m-%d %H:%M:%S UTC"),
            minutes,
            seconds
        );
        info!("Target currency: {}", self.target);

        for r in &self.records {
            match &r.outcome {
                SweepOutcome::Completed { delivered } => {
                    info!(
                        "  {} ({}): delivered {} {}",
                        r.symbol, r.starting_balance, delivered, self.target
                    );
                }
                SweepOutcome::Abandoned {
                    stranded_in,
                    reason,
                } => {
                    info!(
                        "  {} ({}): abandoned, funds in {} ({})",
                        r.symbol, r.starting_balance, stranded_in, reason
                    );
                }
                SweepOutcome::Skipped { reason } => {
                    info!("  {} ({}): skipped ({})", r.symbol, r.starting_balance, reason);
                }
            }
        }

        info!(
            "Total delivered: {} {} across {} coins",
            self.total_delivered(),
            self.target,
            self.records.len()
        );
        let stranded = self.stranded();
        if !stranded.is_empty() {
            info!("Stranded balances: {}", stranded.len());
        }
        info!("=======================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_delivered_sums_completions_only() {
        let mut report = RunReport::new("BTC");
        report.record(
            "XVG",
            Amount::new(dec!(1000)),
            SweepOutcome::Completed {
                delivered: Amount::new(dec!(0.011)),
            },
        );
        report.record(
            "DOGE",
            Amount::new(dec!(500)),
            SweepOutcome::Abandoned {
                stranded_in: "LTC".into(),
                reason: "settlement timed out".into(),
            },
        );
        report.record(
            "DUST",
            Amount::new(dec!(0.0001)),
            SweepOutcome::Skipped {
                reason: "no actionable route".into(),
            },
        );

        assert_eq!(report.total_delivered().inner(), dec!(0.011));
        assert_eq!(report.stranded().len(), 1);
        assert_eq!(report.stranded()[0].symbol, "DOGE");
        assert_eq!(report.records().len(), 3);
    }
}
