//! # Money Module
//!
//! Fixed-point numeric types for all financial math.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summed over a year of orders, the drift becomes visible in the        │
//! │  period reports and the books stop balancing.                          │
//! │                                                                         │
//! │  OUR SOLUTION: Scaled Integers                                          │
//! │    Money is i64 in units of 1/10,000 of a dollar (four decimals).      │
//! │    A 25% cut of a $69.30 commission is exactly $17.3250 —              │
//! │    representable, comparable, and summable without loss.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Four Decimals, Not Cents?
//! Commission distribution splits a dollar amount four ways by percentage.
//! Two decimal places cannot hold the exact quarter-share of $69.30
//! ($17.325); four can, and the balance check (`Σ shares == commission`)
//! stays exact instead of accumulating rounding noise.
//!
//! ## Usage
//! ```rust
//! use quantum_core::money::{Money, Percent};
//!
//! let gross = Money::from_cents(35_000);          // $350.00
//! let charge = gross.apply_percent(Percent::from_bps(100)); // 1%
//! assert_eq!(charge, Money::from_cents(350));     // $3.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Scale factor: one dollar is 10,000 internal units (four decimal places).
pub const MONEY_SCALE: i64 = 10_000;

/// Scale factor for quantities: three decimal places.
pub const QUANTITY_SCALE: i64 = 1_000;

/// Multiplies `value` by `num / den` with round-half-away-from-zero.
///
/// Uses i128 so intermediate products cannot overflow for any realistic
/// amount. `den` must be positive.
fn mul_div_round(value: i64, num: i64, den: i64) -> i64 {
    debug_assert!(den > 0);
    let prod = value as i128 * num as i128;
    let den = den as i128;
    let q = prod / den;
    let r = prod % den;
    if r.abs() * 2 >= den {
        (q + prod.signum()) as i64
    } else {
        q as i64
    }
}

// =============================================================================
// Money
// =============================================================================

/// A monetary value in units of 1/10,000 of a dollar.
///
/// ## Design Decisions
/// - **i64 (signed)**: gross profit goes negative when the vendor cost
///   exceeds the purchase amount; that is a valid, reportable state
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serializes as the bare scaled integer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole cents.
    ///
    /// ## Example
    /// ```rust
    /// use quantum_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.scaled(), 109_900);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents * 100)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50, not -$4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money((major * 100 - minor) * 100)
        } else {
            Money((major * 100 + minor) * 100)
        }
    }

    /// Creates a Money value directly from scaled units (1/10,000 dollar).
    #[inline]
    pub const fn from_scaled(scaled: i64) -> Self {
        Money(scaled)
    }

    /// Converts a raw floating-point amount coming off an input field.
    ///
    /// Rounds to the fourth decimal place. Belongs at the input boundary
    /// only; everything past the boundary stays in integer units.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Money((value * MONEY_SCALE as f64).round() as i64)
        } else {
            Money(0)
        }
    }

    /// Returns the raw scaled value (1/10,000 dollar units).
    #[inline]
    pub const fn scaled(&self) -> i64 {
        self.0
    }

    /// Returns the value in whole cents, rounding sub-cent precision.
    pub fn cents(&self) -> i64 {
        mul_div_round(self.0, 1, 100)
    }

    /// Returns the major unit (dollars) portion, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / MONEY_SCALE
    }

    /// The value as f64 dollars, for display-layer consumption only.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / MONEY_SCALE as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative amounts to zero (document totals never go below $0).
    #[inline]
    pub const fn max_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Applies a percentage, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use quantum_core::money::{Money, Percent};
    ///
    /// let actual = Money::from_scaled(3_465_000);          // $346.50
    /// let commission = actual.apply_percent(Percent::from_bps(2_000)); // 20%
    /// assert_eq!(commission, Money::from_scaled(693_000)); // $69.30
    /// ```
    pub fn apply_percent(&self, percent: Percent) -> Money {
        Money(mul_div_round(self.0, percent.bps() as i64, 10_000))
    }

    /// Multiplies by a fractional quantity (line totals).
    pub fn times(&self, quantity: Quantity) -> Money {
        Money(mul_div_round(self.0, quantity.scaled(), QUANTITY_SCALE))
    }

    /// Converts through an exchange rate (e.g. USD → PKR for display).
    pub fn convert(&self, rate: ExchangeRate) -> Money {
        Money(mul_div_round(self.0, rate.scaled(), MONEY_SCALE))
    }
}

/// Display implementation shows money in a human-readable format.
///
/// Amounts carrying sub-cent precision (commission splits) print all four
/// decimals; everything else prints the usual two.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / MONEY_SCALE).abs();
        let frac = (self.0 % MONEY_SCALE).abs();
        if frac % 100 == 0 {
            write!(f, "{}${}.{:02}", sign, whole, frac / 100)
        } else {
            write!(f, "{}${}.{:04}", sign, whole, frac)
        }
    }
}

/// Parses decimal literals like `"1234.56"` or `"-17.325"`.
///
/// At most four decimal places; anything else is a [`CoreError`]. The
/// lenient zero-defaulting variant for raw user input lives in
/// [`crate::validation`].
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = body.splitn(2, '.');
        let whole = parts.next().unwrap_or("");
        let frac = parts.next().unwrap_or("");

        if whole.is_empty() && frac.is_empty() {
            return Err(CoreError::InvalidMoney(s.to_string()));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidMoney(s.to_string()));
        }
        if frac.len() > 4 {
            return Err(CoreError::InvalidMoney(s.to_string()));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| CoreError::InvalidMoney(s.to_string()))?
        };
        let mut frac_scaled: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse()
                .map_err(|_| CoreError::InvalidMoney(s.to_string()))?
        };
        for _ in frac.len()..4 {
            frac_scaled *= 10;
        }

        let scaled = whole * MONEY_SCALE + frac_scaled;
        Ok(Money(if negative { -scaled } else { scaled }))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage or rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. One representation covers both kinds
/// of bounded input in the system:
/// - percentages in [0, 100] (commission percent, role splits, tax rate)
/// - fractional rates in [0, 1] (the card-processing charge rate)
///
/// 100 bps = 1% = a rate of 0.01.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percent from basis points (2_000 = 20%).
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percent from a percentage figure, clamped to [0, 100].
    ///
    /// ## Example
    /// ```rust
    /// use quantum_core::money::Percent;
    ///
    /// assert_eq!(Percent::from_percent(20.0).bps(), 2_000);
    /// assert_eq!(Percent::from_percent(250.0).bps(), 10_000); // clamped
    /// assert_eq!(Percent::from_percent(-3.0).bps(), 0);       // clamped
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        if !pct.is_finite() {
            return Percent(0);
        }
        let clamped = pct.clamp(0.0, 100.0);
        Percent((clamped * 100.0).round() as u32)
    }

    /// Creates a percent from a fraction, clamped to [0, 1].
    ///
    /// The card-processing rate arrives in this form (0.01 = 1%).
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() {
            return Percent(0);
        }
        let clamped = fraction.clamp(0.0, 1.0);
        Percent((clamped * 10_000.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage figure (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// A line-item quantity with three decimal places.
///
/// Purchase orders and invoices allow fractional quantities (hours,
/// partial cases), so quantities get the same scaled-integer treatment
/// as money instead of a bare float.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a whole-unit quantity.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * QUANTITY_SCALE)
    }

    /// Converts a raw floating-point quantity, clamped to be non-negative.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Quantity((value * QUANTITY_SCALE as f64).round() as i64)
        } else {
            Quantity(0)
        }
    }

    /// Returns the raw scaled value (1/1,000 units).
    #[inline]
    pub const fn scaled(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / QUANTITY_SCALE as f64
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// A currency exchange rate (units of the target currency per dollar),
/// stored with four decimal places.
///
/// The rate is a manually configured scalar, never fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(i64);

impl ExchangeRate {
    /// Creates a rate from scaled units (1/10,000).
    #[inline]
    pub const fn from_scaled(scaled: i64) -> Self {
        ExchangeRate(scaled)
    }

    /// Converts a raw floating-point rate, clamped to be non-negative.
    pub fn from_f64(rate: f64) -> Self {
        if rate.is_finite() && rate > 0.0 {
            ExchangeRate((rate * MONEY_SCALE as f64).round() as i64)
        } else {
            ExchangeRate(0)
        }
    }

    #[inline]
    pub const fn scaled(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / MONEY_SCALE as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.scaled(), 109_900);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        // Quarter-share of $69.30 keeps its sub-cent precision visible
        assert_eq!(format!("{}", Money::from_scaled(173_250)), "$17.3250");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1234.56".parse::<Money>().unwrap(), Money::from_cents(123_456));
        assert_eq!("-17.325".parse::<Money>().unwrap(), Money::from_scaled(-173_250));
        assert_eq!("600".parse::<Money>().unwrap(), Money::from_cents(60_000));
        assert_eq!(".5".parse::<Money>().unwrap(), Money::from_scaled(5_000));
        assert!("12.34567".parse::<Money>().is_err());
        assert!("12,50".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_apply_percent() {
        // 1% card charge on $350.00 = $3.50
        let gross = Money::from_cents(35_000);
        assert_eq!(gross.apply_percent(Percent::from_bps(100)), Money::from_cents(350));

        // 20% of $346.50 = $69.30
        let actual = Money::from_scaled(3_465_000);
        assert_eq!(
            actual.apply_percent(Percent::from_bps(2_000)),
            Money::from_scaled(693_000)
        );

        // 25% of $69.30 = $17.3250 exactly
        let commission = Money::from_scaled(693_000);
        assert_eq!(
            commission.apply_percent(Percent::from_bps(2_500)),
            Money::from_scaled(173_250)
        );
    }

    #[test]
    fn test_apply_percent_rounds_half_away_from_zero() {
        // 0.0001 * 50% = 0.00005 → rounds to 0.0001
        assert_eq!(
            Money::from_scaled(1).apply_percent(Percent::from_bps(5_000)),
            Money::from_scaled(1)
        );
        // Negative amounts round away from zero symmetrically
        assert_eq!(
            Money::from_scaled(-1).apply_percent(Percent::from_bps(5_000)),
            Money::from_scaled(-1)
        );
    }

    #[test]
    fn test_times_quantity() {
        let unit = Money::from_cents(299);
        assert_eq!(unit.times(Quantity::from_units(3)), Money::from_cents(897));
        // 2.5 × $10.00 = $25.00
        assert_eq!(
            Money::from_cents(1_000).times(Quantity::from_f64(2.5)),
            Money::from_cents(2_500)
        );
        assert_eq!(unit.times(Quantity::from_f64(0.0)), Money::zero());
    }

    #[test]
    fn test_percent_clamping() {
        assert_eq!(Percent::from_percent(20.0).bps(), 2_000);
        assert_eq!(Percent::from_percent(150.0).bps(), 10_000);
        assert_eq!(Percent::from_percent(-5.0).bps(), 0);
        assert_eq!(Percent::from_percent(f64::NAN).bps(), 0);

        assert_eq!(Percent::from_fraction(0.01).bps(), 100);
        assert_eq!(Percent::from_fraction(1.5).bps(), 10_000);
        assert_eq!(Percent::from_fraction(-0.2).bps(), 0);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(format!("{}", Percent::from_bps(2_000)), "20%");
        assert_eq!(format!("{}", Percent::from_bps(825)), "8.25%");
    }

    #[test]
    fn test_exchange_rate_conversion() {
        // $69.30 at 278.00 PKR/USD = PKR 19,265.40
        let rate = ExchangeRate::from_f64(278.0);
        let amount = Money::from_scaled(693_000);
        assert_eq!(amount.convert(rate), Money::from_cents(1_926_540));
    }

    #[test]
    fn test_max_zero() {
        assert_eq!(Money::from_cents(-100).max_zero(), Money::zero());
        assert_eq!(Money::from_cents(100).max_zero(), Money::from_cents(100));
    }
}
