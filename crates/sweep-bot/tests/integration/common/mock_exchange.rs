//! Simulated venue for integration tests.
//!
//! Serves a fixed snapshot and a live balance ledger. Submitted orders
//! settle instantly by moving balances the way the venue would, except on
//! pairs listed as stuck, or while the stuck-next counter is positive;
//! those accept the order and never fill.

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use sweep_client::{Balance, ExchangeApi, OrderId};
use sweep_core::{Amount, OrderSide, TradeOrder};
use sweep_market::{Currency, MarketQuote, TradePair};

pub struct MockExchange {
    currencies: Vec<Currency>,
    pairs: Vec<TradePair>,
    quotes: Vec<MarketQuote>,
    balances: Mutex<HashMap<String, Balance>>,
    /// Pairs whose orders are accepted but never fill.
    stuck_pairs: HashSet<u64>,
    /// How many of the next submissions are accepted but never fill.
    stuck_next: AtomicUsize,
    pub submitted: Mutex<Vec<TradeOrder>>,
    pub canceled: Mutex<Vec<OrderId>>,
    pub transfers: Mutex<Vec<(String, String, Amount)>>,
    pub withdrawals: Mutex<Vec<(String, String, Amount)>>,
    snapshot_fetches: AtomicUsize,
    next_order_id: AtomicU64,
}

impl MockExchange {
    pub fn new(
        currencies: Vec<Currency>,
        pairs: Vec<TradePair>,
        quotes: Vec<MarketQuote>,
    ) -> Self {
        Self {
            currencies,
            pairs,
            quotes,
            balances: Mutex::new(HashMap::new()),
            stuck_pairs: HashSet::new(),
            stuck_next: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            canceled: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
            withdrawals: Mutex::new(Vec::new()),
            snapshot_fetches: AtomicUsize::new(0),
            next_order_id: AtomicU64::new(1),
        }
    }

    /// Mark a pair as accepting orders that never fill.
    pub fn stick_pair(mut self, pair_id: u64) -> Self {
        self.stuck_pairs.insert(pair_id);
        self
    }

    /// Leave the next `count` submissions unfilled; later ones fill normally.
    pub fn stick_next(self, count: usize) -> Self {
        self.stuck_next.store(count, Ordering::SeqCst);
        self
    }

    pub fn set_balance(&self, symbol: &str, available: Decimal) {
        self.balances.lock().unwrap().insert(
            symbol.to_string(),
            Balance {
                symbol: symbol.to_string(),
                available: Amount::new(available),
                held_for_trades: Amount::ZERO,
                status: "OK".into(),
            },
        );
    }

    pub fn available(&self, symbol: &str) -> Decimal {
        self.balances
            .lock()
            .unwrap()
            .get(symbol)
            .map(|b| b.available.inner())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn snapshot_fetch_count(&self) -> usize {
        self.snapshot_fetches.load(Ordering::SeqCst)
    }

    fn adjust(&self, symbol: &str, delta: Decimal) {
        let mut balances = self.balances.lock().unwrap();
        let entry = balances
            .entry(symbol.to_string())
            .or_insert_with(|| Balance {
                symbol: symbol.to_string(),
                available: Amount::ZERO,
                held_for_trades: Amount::ZERO,
                status: "OK".into(),
            });
        entry.available = Amount::new(entry.available.inner() + delta);
    }

    /// Apply the venue-side effect of a filled order.
    fn fill(&self, order: &TradeOrder) {
        let pair = self
            .pairs
            .iter()
            .find(|p| p.id == order.pair_id)
            .cloned()
            .unwrap();
        let fee_factor = Decimal::ONE - pair.trade_fee_pct / Decimal::ONE_HUNDRED;
        match order.side {
            OrderSide::Sell => {
                self.adjust(&pair.symbol, -order.amount.inner());
                self.adjust(
                    &pair.base_symbol,
                    order.amount.inner() * order.rate.inner() * fee_factor,
                );
            }
            OrderSide::Buy => {
                self.adjust(&pair.base_symbol, -(order.amount.inner() * order.rate.inner()));
                self.adjust(&pair.symbol, order.amount.inner() * fee_factor);
            }
        }
    }
}

impl ExchangeApi for MockExchange {
    async fn get_currencies(&self) -> sweep_client::Result<Vec<Currency>> {
        self.snapshot_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.currencies.clone())
    }

    async fn get_trade_pairs(&self) -> sweep_client::Result<Vec<TradePair>> {
        Ok(self.pairs.clone())
    }

    async fn get_markets(&self) -> sweep_client::Result<Vec<MarketQuote>> {
        Ok(self.quotes.clone())
    }

    async fn get_balances(&self, currency: Option<&str>) -> sweep_client::Result<Vec<Balance>> {
        let balances = self.balances.lock().unwrap();
        Ok(match currency {
            Some(symbol) => balances.get(symbol).cloned().into_iter().collect(),
            None => self
                .currencies
                .iter()
                .filter_map(|c| balances.get(&c.symbol).cloned())
                .collect(),
        })
    }

    async fn submit_trade(&self, order: &TradeOrder) -> sweep_client::Result<Option<OrderId>> {
        self.submitted.lock().unwrap().push(order.clone());
        let stuck_once = self
            .stuck_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !stuck_once && !self.stuck_pairs.contains(&order.pair_id) {
            self.fill(order);
        }
        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        Ok(Some(OrderId(id)))
    }

    async fn cancel_trade(&self, order_id: OrderId) -> sweep_client::Result<()> {
        self.canceled.lock().unwrap().push(order_id);
        Ok(())
    }

    async fn submit_transfer(
        &self,
        currency: &str,
        user: &str,
        amount: Amount,
    ) -> sweep_client::Result<()> {
        self.adjust(currency, -amount.inner());
        self.transfers
            .lock()
            .unwrap()
            .push((currency.to_string(), user.to_string(), amount));
        Ok(())
    }

    async fn submit_withdraw(
        &self,
        currency: &str,
        address: &str,
        amount: Amount,
    ) -> sweep_client::Result<()> {
        self.adjust(currency, -amount.inner());
        self.withdrawals
            .lock()
            .unwrap()
            .push((currency.to_string(), address.to_string(), amount));
        Ok(())
    }
}
