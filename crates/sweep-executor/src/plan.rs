//! Order parameter computation for one hop.
//!
//! All rounding here is deliberately asymmetric: amounts and Sell rates
//! round down, Buy rates round up. Understating an amount or a Sell rate
//! costs a little yield; overstating either gets the order rejected or
//! left unfilled.

use crate::error::{ExecutorError, Result};
use rust_decimal::Decimal;
use sweep_core::{Amount, OrderSide, Precision, Rate, RoundingMode, TradeOrder};
use sweep_market::{MarketQuote, TradePair};

/// A computed, quantized order plus what it should deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct HopPlan {
    pub order: TradeOrder,
    /// Currency the hop delivers into.
    pub destination: String,
    /// Quantity expected in the destination balance once the hop settles.
    pub expected_delivered: Amount,
}

/// Per-venue execution policy knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanPolicy {
    pub precision: Precision,
    /// Fractional rate concession applied to improve fill odds: Sell rates
    /// are shaded down by this, Buy rates up.
    pub slippage_buffer: Decimal,
    /// When set, a Buy amount is divided by (1 + fee/100) before
    /// quantization so the venue's fee deduction lands on the planned
    /// delivered quantity. Venue-specific quirk, not a general rule.
    pub buy_fee_in_amount: bool,
}

impl Default for PlanPolicy {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            slippage_buffer: Decimal::ZERO,
            buy_fee_in_amount: true,
        }
    }
}

/// Compute order side, rate, and amount for converting `input` of `from`
/// into `to` across `pair`.
///
/// The side follows from where the source currency sits in the pair:
/// selling the trade symbol is a Sell, spending the base symbol is a Buy.
/// A leg that names a currency outside the pair is a `PairMismatch`,
/// an internal consistency failure rather than a market condition.
pub fn plan_hop(
    pair: &TradePair,
    quote: &MarketQuote,
    from: &str,
    to: &str,
    input: Amount,
    policy: &PlanPolicy,
) -> Result<HopPlan> {
    if !pair.involves(from) || !pair.involves(to) || from == to {
        return Err(ExecutorError::PairMismatch {
            pair_label: pair.label.clone(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let precision = policy.precision;
    let one = Decimal::ONE;
    let fee_factor = one - pair.trade_fee_pct / Decimal::ONE_HUNDRED;

    let (side, rate, amount, expected) = if from == pair.symbol {
        // Sell: shade the bid down, send the literal input quantity; the
        // venue takes its fee from the proceeds.
        let raw_rate = quote.bid * (one - policy.slippage_buffer);
        let rate = precision.quantize_rate(raw_rate, RoundingMode::Down);
        let amount = precision.quantize_amount(input);
        let expected = Amount::new(amount.inner() * rate.inner() * fee_factor);
        (OrderSide::Sell, rate, amount, expected)
    } else {
        // Buy: shade the ask up. The amount field is in trade-symbol
        // units, so the base-currency input is divided through the rate.
        let raw_rate = quote.ask * (one + policy.slippage_buffer);
        let rate = precision.quantize_rate(raw_rate, RoundingMode::Up);
        if rate.is_zero() {
            return Err(ExecutorError::RateUnderflow {
                raw: raw_rate.to_string(),
            });
        }
        let mut raw_amount = input.inner() / rate.inner();
        if policy.buy_fee_in_amount {
            raw_amount /= one + pair.trade_fee_pct / Decimal::ONE_HUNDRED;
        }
        let amount = precision.quantize_amount(Amount::new(raw_amount));
        let expected = Amount::new(amount.inner() * fee_factor);
        (OrderSide::Buy, rate, amount, expected)
    };

    if rate.is_zero() {
        return Err(ExecutorError::RateUnderflow {
            raw: rate.to_string(),
        });
    }

    Ok(HopPlan {
        order: TradeOrder {
            pair_id: pair.id,
            side,
            rate,
            amount,
        },
        destination: to.to_string(),
        expected_delivered: expected,
    })
}
