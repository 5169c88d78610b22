//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors critical in financial calculations.

use crate::error::CoreError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

/// Quantity of a currency with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// amounts with rates in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Convert this amount at a rate: units of the neighbor currency obtained.
    #[inline]
    pub fn convert(&self, rate: Rate) -> Self {
        Self(self.0 * rate.0)
    }

    /// Apply a percentage fee, returning what remains.
    #[inline]
    pub fn after_fee_pct(&self, fee_pct: Decimal) -> Self {
        Self(self.0 * (Decimal::ONE - fee_pct / Decimal::ONE_HUNDRED))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<Decimal>()?))
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Amount {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Amount {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Conversion rate with exact decimal precision.
///
/// Units of the destination currency obtained per unit of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(pub Decimal);

impl Rate {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Reciprocal rate for the opposite conversion direction.
    ///
    /// Returns `None` for a zero rate.
    #[inline]
    pub fn invert(&self) -> Option<Self> {
        if self.0.is_zero() {
            return None;
        }
        Some(Self(Decimal::ONE / self.0))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<Decimal>()?))
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Mul<Decimal> for Rate {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Rounding direction for order quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Truncate toward zero. Used for amounts and Sell rates: never
    /// overstate what is being sent or the price accepted.
    Down,
    /// Round away from zero. Used for Buy rates: never understate the
    /// price offered, which would lose fill priority.
    Up,
}

/// Venue quantization policy.
///
/// The venue accepts a fixed number of fractional digits on rates and
/// amounts; the digit count is a venue constant supplied at construction,
/// not hard-coded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    pub fn new(digits: u32) -> Self {
        Self { digits }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// One unit in the last accepted fractional place.
    ///
    /// Settlement checks allow this much shortfall to absorb venue-side
    /// rounding of the delivered amount.
    pub fn quantum(&self) -> Decimal {
        Decimal::new(1, self.digits)
    }

    /// Quantize a raw decimal to the venue digit count.
    ///
    /// Idempotent: quantizing an already-quantized value is a no-op.
    pub fn quantize(&self, value: Decimal, mode: RoundingMode) -> Decimal {
        let strategy = match mode {
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
        };
        value.round_dp_with_strategy(self.digits, strategy)
    }

    /// Quantize an amount. Amounts always round down.
    pub fn quantize_amount(&self, amount: Amount) -> Amount {
        Amount(self.quantize(amount.inner(), RoundingMode::Down))
    }

    /// Quantize an order rate with the side-appropriate direction.
    pub fn quantize_rate(&self, rate: Rate, mode: RoundingMode) -> Rate {
        Rate(self.quantize(rate.inner(), mode))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self { digits: 8 }
    }
}
