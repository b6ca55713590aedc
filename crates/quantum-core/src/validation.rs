//! # Input Boundary
//!
//! Normalization of raw user input into the core's numeric types.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form field (string / float, possibly blank or junk)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  THIS MODULE: clamp / default                                           │
//! │  ├── percentages        → clamped to [0, 100]                           │
//! │  ├── fractional rates   → clamped to [0, 1]                             │
//! │  ├── missing numbers    → 0                                             │
//! │  └── unparseable text   → 0                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Derivation layer: never sees an out-of-range or missing value          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad numeric input is never an error past this point; it degrades to a
//! neutral value so a half-filled form can still be saved.

use crate::money::{Money, Percent, Quantity};

/// Normalizes a percentage field (commission percent, role splits,
/// tax rate). Out-of-range values clamp to [0, 100]; NaN becomes 0.
#[inline]
pub fn percent_input(raw: f64) -> Percent {
    Percent::from_percent(raw)
}

/// Normalizes a fractional rate field (the card-processing rate arrives
/// as 0.01-style fractions). Clamps to [0, 1].
#[inline]
pub fn rate_input(raw: f64) -> Percent {
    Percent::from_fraction(raw)
}

/// Normalizes an optional amount field: absent means zero.
#[inline]
pub fn money_input(raw: Option<f64>) -> Money {
    raw.map(Money::from_f64).unwrap_or_else(Money::zero)
}

/// Parses an amount typed into a text field; anything unparseable
/// degrades to zero rather than blocking the save.
pub fn money_text_input(raw: &str) -> Money {
    raw.trim().parse().unwrap_or_else(|_| Money::zero())
}

/// Normalizes an optional quantity field: absent or negative means zero.
#[inline]
pub fn quantity_input(raw: Option<f64>) -> Quantity {
    raw.map(Quantity::from_f64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_clamps() {
        assert_eq!(percent_input(20.0).bps(), 2_000);
        assert_eq!(percent_input(130.0).bps(), 10_000);
        assert_eq!(percent_input(-4.0).bps(), 0);
        assert_eq!(percent_input(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_rate_clamps() {
        assert_eq!(rate_input(0.01).bps(), 100);
        assert_eq!(rate_input(2.0).bps(), 10_000);
        assert_eq!(rate_input(-0.5).bps(), 0);
    }

    #[test]
    fn test_missing_money_defaults_to_zero() {
        assert_eq!(money_input(None), Money::zero());
        assert_eq!(money_input(Some(346.5)), Money::from_scaled(3_465_000));
    }

    #[test]
    fn test_money_text_degrades_to_zero() {
        assert_eq!(money_text_input("1000"), Money::from_cents(100_000));
        assert_eq!(money_text_input("  49.99 "), Money::from_cents(4_999));
        assert_eq!(money_text_input("not a number"), Money::zero());
        assert_eq!(money_text_input(""), Money::zero());
    }

    #[test]
    fn test_quantity_input() {
        assert_eq!(quantity_input(Some(2.5)).scaled(), 2_500);
        assert_eq!(quantity_input(Some(-1.0)).scaled(), 0);
        assert_eq!(quantity_input(None).scaled(), 0);
    }
}
