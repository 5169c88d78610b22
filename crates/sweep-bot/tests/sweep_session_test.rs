//! Sweep session integration tests.
//!
//! Drives whole runs against a simulated venue:
//! - Multi-coin sweep with direct and multi-hop routes
//! - Abandonment on a stuck pair, market-view rebuild, retry
//! - Dry-run, hop budgets, stop balances, post-run transfers

mod integration;
use integration::common::mock_exchange::MockExchange;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sweep_bot::{AppConfig, SweepSession};
use sweep_core::{Amount, Rate};
use sweep_market::{Currency, MarketQuote, TradePair};
use sweep_telemetry::SweepOutcome;

fn currency(id: u64, symbol: &str) -> Currency {
    Currency {
        id,
        symbol: symbol.into(),
        name: symbol.into(),
        min_base_trade: Amount::new(dec!(0.00005)),
        status: "OK".into(),
    }
}

fn pair(id: u64, symbol: &str, base: &str) -> TradePair {
    TradePair {
        id,
        symbol: symbol.into(),
        base_symbol: base.into(),
        label: format!("{symbol}/{base}"),
        status: "OK".into(),
        trade_fee_pct: dec!(0.2),
        minimum_trade: Amount::new(dec!(0.00000001)),
        maximum_trade: Amount::new(dec!(100000000)),
        minimum_base_trade: Amount::new(dec!(0.00005)),
        maximum_base_trade: Amount::new(dec!(100000000)),
    }
}

fn quote(pair_id: u64, bid: Decimal, ask: Decimal) -> MarketQuote {
    MarketQuote {
        trade_pair_id: pair_id,
        bid: Rate::new(bid),
        ask: Rate::new(ask),
        volume: Amount::new(dec!(1000000)),
        base_volume: Amount::new(dec!(1000)),
    }
}

/// XVG and LTC trade directly against BTC; DOGE only against LTC; DUST
/// trades nowhere.
fn venue() -> MockExchange {
    MockExchange::new(
        vec![
            currency(1, "XVG"),
            currency(2, "DOGE"),
            currency(3, "LTC"),
            currency(4, "DUST"),
            currency(5, "BTC"),
        ],
        vec![
            pair(100, "XVG", "BTC"),
            pair(200, "LTC", "BTC"),
            pair(300, "DOGE", "LTC"),
        ],
        vec![
            quote(100, dec!(0.00001119), dec!(0.00001125)),
            quote(200, dec!(0.005), dec!(0.0051)),
            quote(300, dec!(0.01), dec!(0.0102)),
        ],
    )
}

fn config(extra: &str) -> AppConfig {
    let toml = format!(
        r#"
        target_currency = "BTC"
        settlement_timeout_secs = 1
        poll_interval_secs = 0
        {extra}

        [api]
        public_key = "pub"
        private_key = "c2VjcmV0"
        "#
    );
    let config: AppConfig = toml::from_str(&toml).unwrap();
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_sweeps_direct_and_multihop_routes() {
    let venue = venue();
    venue.set_balance("XVG", dec!(1000));
    venue.set_balance("DOGE", dec!(500));
    venue.set_balance("LTC", dec!(5));
    venue.set_balance("DUST", dec!(10));

    let session = SweepSession::new(&venue, config(""));
    let report = session.run().await.unwrap();

    // XVG and LTC convert directly, DOGE goes through LTC, DUST has no
    // route anywhere.
    let completed: Vec<_> = report
        .records()
        .iter()
        .filter(|r| matches!(r.outcome, SweepOutcome::Completed { .. }))
        .map(|r| r.symbol.as_str())
        .collect();
    assert_eq!(completed, vec!["XVG", "DOGE", "LTC"]);
    assert!(matches!(
        report.records().iter().find(|r| r.symbol == "DUST").unwrap().outcome,
        SweepOutcome::Skipped { .. }
    ));

    // The DOGE route took two hops, so four orders in total.
    assert_eq!(venue.submitted.lock().unwrap().len(), 4);
    assert!(venue.canceled.lock().unwrap().is_empty());

    // Everything the report claims was delivered actually landed in BTC.
    assert_eq!(venue.available("BTC"), report.total_delivered().inner());
    assert!(report.total_delivered().is_positive());
    assert_eq!(venue.available("XVG"), Decimal::ZERO);
    assert_eq!(venue.available("DOGE"), Decimal::ZERO);
    assert_eq!(venue.available("LTC"), Decimal::ZERO);
}

#[tokio::test]
async fn test_dead_pair_retried_then_given_up() {
    let venue = venue().stick_pair(200);
    venue.set_balance("XVG", dec!(1000));
    venue.set_balance("LTC", dec!(5));

    let session = SweepSession::new(&venue, config(""));
    let report = session.run().await.unwrap();

    let ltc = report.records().iter().find(|r| r.symbol == "LTC").unwrap();
    match &ltc.outcome {
        SweepOutcome::Abandoned {
            stranded_in,
            reason,
        } => {
            assert_eq!(stranded_in, "LTC");
            assert!(reason.contains("timed out"));
        }
        other => panic!("expected abandonment, got {other:?}"),
    }

    // Three attempts against the dead pair, each canceled, each followed
    // by a market-view rebuild; the report carries one final record.
    assert_eq!(venue.canceled.lock().unwrap().len(), 3);
    assert_eq!(venue.snapshot_fetch_count(), 4);
    assert_eq!(venue.submitted.lock().unwrap().len(), 4);
    assert_eq!(
        report.records().iter().filter(|r| r.symbol == "LTC").count(),
        1
    );

    // XVG still converted; its delivery is the whole run total.
    let xvg = report.records().iter().find(|r| r.symbol == "XVG").unwrap();
    match xvg.outcome {
        SweepOutcome::Completed { delivered } => {
            assert_eq!(report.total_delivered(), delivered);
        }
        ref other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(report.stranded().len(), 1);
}

#[tokio::test]
async fn test_abandoned_currency_retried_after_rebuild() {
    // The first order sits unfilled until it times out; every later one
    // fills. A single retry against the rebuilt market view converts.
    let venue = venue().stick_next(1);
    venue.set_balance("XVG", dec!(1000));

    let session = SweepSession::new(&venue, config(""));
    let report = session.run().await.unwrap();

    assert_eq!(venue.submitted.lock().unwrap().len(), 2);
    assert_eq!(venue.canceled.lock().unwrap().len(), 1);
    assert_eq!(venue.snapshot_fetch_count(), 2);

    // The retry converted, so the run reports one completion and nothing
    // stranded.
    let records = report.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].symbol, "XVG");
    match records[0].outcome {
        SweepOutcome::Completed { delivered } => {
            assert_eq!(
                delivered.inner(),
                dec!(1000) * dec!(0.00001119) * dec!(0.998)
            );
        }
        ref other => panic!("expected completion, got {other:?}"),
    }
    assert!(report.stranded().is_empty());
    assert_eq!(venue.available("XVG"), Decimal::ZERO);
    assert_eq!(venue.available("BTC"), report.total_delivered().inner());
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let venue = venue();
    venue.set_balance("XVG", dec!(1000));
    venue.set_balance("BTC", dec!(0.5));

    let session = SweepSession::new(&venue, config("dry_run = true"));
    let report = session.run().await.unwrap();

    assert!(venue.submitted.lock().unwrap().is_empty());
    assert!(venue.transfers.lock().unwrap().is_empty());
    assert!(venue.withdrawals.lock().unwrap().is_empty());
    assert_eq!(venue.available("XVG"), dec!(1000));
    assert_eq!(venue.available("BTC"), dec!(0.5));
    // The projection is still reported.
    assert_eq!(
        report.total_delivered().inner(),
        dec!(1000) * dec!(0.00001119) * dec!(0.998)
    );
}

#[tokio::test]
async fn test_hop_budget_caps_conversions_per_route() {
    let venue = venue();
    venue.set_balance("XVG", dec!(1000));
    venue.set_balance("DOGE", dec!(500));

    let session = SweepSession::new(&venue, config("max_hops = 1"));
    let report = session.run().await.unwrap();

    // XVG converts in a single trade; DOGE would need two, which the
    // budget of one conversion per route rules out.
    let xvg = report.records().iter().find(|r| r.symbol == "XVG").unwrap();
    assert!(matches!(xvg.outcome, SweepOutcome::Completed { .. }));
    let doge = report.records().iter().find(|r| r.symbol == "DOGE").unwrap();
    assert!(matches!(doge.outcome, SweepOutcome::Skipped { .. }));
    assert_eq!(venue.submitted.lock().unwrap().len(), 1);
    assert_eq!(venue.available("DOGE"), dec!(500));
}

#[tokio::test]
async fn test_coin_filter_restricts_worklist() {
    let venue = venue();
    venue.set_balance("XVG", dec!(1000));
    venue.set_balance("LTC", dec!(5));

    let session = SweepSession::new(&venue, config(r#"coin_filter = "LTC""#));
    let report = session.run().await.unwrap();

    assert_eq!(report.records().len(), 1);
    assert_eq!(report.records()[0].symbol, "LTC");
    assert_eq!(venue.available("XVG"), dec!(1000));
}

#[tokio::test]
async fn test_sell_fraction_and_stop_balance_shape_quantity() {
    let venue = venue();
    venue.set_balance("XVG", dec!(1000));

    let session = SweepSession::new(
        &venue,
        config(
            r#"
            sell_fraction = 0.5

            [stop_balances]
            XVG = 400
            "#,
        ),
    );
    session.run().await.unwrap();

    // 1000 * 0.5 - 400 = 100 sold.
    let submitted = venue.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].amount.inner(), dec!(100));
    assert_eq!(venue.available("XVG"), dec!(900));
}

#[tokio::test]
async fn test_stop_balance_above_available_skips_coin() {
    let venue = venue();
    venue.set_balance("XVG", dec!(100));

    let session = SweepSession::new(
        &venue,
        config(
            r#"
            [stop_balances]
            XVG = 100
            "#,
        ),
    );
    let report = session.run().await.unwrap();

    assert!(report.records().is_empty());
    assert!(venue.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_run_donation_and_withdrawal() {
    let venue = venue();
    venue.set_balance("XVG", dec!(1000));

    let session = SweepSession::new(
        &venue,
        config(
            r#"
            donation_pct = 10
            donation_user = "goodcause"
            withdraw_address = "1BitcoinAddr"
            "#,
        ),
    );
    let report = session.run().await.unwrap();
    let total = report.total_delivered().inner();

    let transfers = venue.transfers.lock().unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].0, "BTC");
    assert_eq!(transfers[0].1, "goodcause");
    assert_eq!(transfers[0].2.inner(), total * dec!(0.1));

    // The withdrawal drains whatever remained after the donation.
    let withdrawals = venue.withdrawals.lock().unwrap();
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].1, "1BitcoinAddr");
    assert_eq!(withdrawals[0].2.inner(), total - total * dec!(0.1));
    assert_eq!(venue.available("BTC"), Decimal::ZERO);
}
