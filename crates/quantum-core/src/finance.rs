//! # Financial Derivation
//!
//! Pure functions from raw record inputs to derived monetary figures.
//!
//! ## The Profit Waterfall
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PO Amount (what the customer pays)                    $1,000.00       │
//! │      − Vendor Amount (what the supplier charges)         $600.00       │
//! │      − Special Expenses (freight, fees, ...)              $50.00       │
//! │      ─────────────────────────────────────────────────────────────     │
//! │  = GROSS PROFIT                                          $350.00       │
//! │      − Card Charge (gross × cc rate, default 1%)           $3.50       │
//! │      ─────────────────────────────────────────────────────────────     │
//! │  = ACTUAL PROFIT                                         $346.50       │
//! │      × Commission Percent (default 20%)                                │
//! │      ─────────────────────────────────────────────────────────────     │
//! │  = COMMISSION AMOUNT                                      $69.30       │
//! │      split four ways: hunter / sourcer / submitter / executor          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is deterministic and side-effect free. Rate and
//! percentage clamping happens at the input boundary
//! ([`crate::validation`]), never in here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent, Quantity};
use crate::types::{Distribution, LineItem};

/// Two role amounts (or a distribution sum and its commission) are
/// considered equal within one cent.
pub const BALANCE_TOLERANCE: Money = Money::from_cents(1);

// =============================================================================
// Profit Waterfall
// =============================================================================

/// The three derived stages of one record's profit calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitWaterfall {
    pub gross_profit: Money,
    pub cc_charge: Money,
    pub actual_profit: Money,
}

/// `po_amount − vendor_amount − special_expenses`.
#[inline]
pub fn gross_profit(po_amount: Money, vendor_amount: Money, special_expenses: Money) -> Money {
    po_amount - vendor_amount - special_expenses
}

/// `gross_profit × rate`. The rate is whatever the caller resolved; the
/// 1% default is applied once, at [`crate::types::Order::effective_cc_rate`].
#[inline]
pub fn cc_charge(gross_profit: Money, rate: Percent) -> Money {
    gross_profit.apply_percent(rate)
}

/// `gross_profit − cc_charge`.
#[inline]
pub fn actual_profit(gross_profit: Money, cc_charge: Money) -> Money {
    gross_profit - cc_charge
}

/// Runs the whole waterfall in one call.
pub fn waterfall(
    po_amount: Money,
    vendor_amount: Money,
    special_expenses: Money,
    cc_rate: Percent,
) -> ProfitWaterfall {
    let gross = gross_profit(po_amount, vendor_amount, special_expenses);
    let charge = cc_charge(gross, cc_rate);
    ProfitWaterfall {
        gross_profit: gross,
        cc_charge: charge,
        actual_profit: actual_profit(gross, charge),
    }
}

/// `actual_profit × commission_percent`.
#[inline]
pub fn commission_amount(actual_profit: Money, commission_percent: Percent) -> Money {
    actual_profit.apply_percent(commission_percent)
}

// =============================================================================
// Distribution
// =============================================================================

/// The four derived role amounts of a commission split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DistributionAmounts {
    pub hunter: Money,
    pub sourcer: Money,
    pub submitter: Money,
    pub executor: Money,
}

impl DistributionAmounts {
    /// Sum of all four role amounts.
    pub fn total(&self) -> Money {
        self.hunter + self.sourcer + self.submitter + self.executor
    }
}

/// `role_amount = commission_amount × role_percent` for each role.
pub fn distribution_amounts(
    commission_amount: Money,
    distribution: &Distribution,
) -> DistributionAmounts {
    DistributionAmounts {
        hunter: commission_amount.apply_percent(distribution.hunter.percent),
        sourcer: commission_amount.apply_percent(distribution.sourcer.percent),
        submitter: commission_amount.apply_percent(distribution.submitter.percent),
        executor: commission_amount.apply_percent(distribution.executor.percent),
    }
}

/// Whether a distribution sum matches its commission amount within the
/// tolerance. An unbalanced split is reportable, never auto-corrected.
pub fn is_balanced(distribution_total: Money, commission_amount: Money) -> bool {
    (distribution_total - commission_amount).abs() <= BALANCE_TOLERANCE
}

// =============================================================================
// Document Totals
// =============================================================================

/// `quantity × unit_price`.
#[inline]
pub fn line_item_total(quantity: Quantity, unit_price: Money) -> Money {
    unit_price.times(quantity)
}

/// `Σ item.total`.
pub fn document_subtotal(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::total).sum()
}

/// `max(0, subtotal + subtotal × tax_rate − discount + shipping)`.
pub fn document_total(
    items: &[LineItem],
    tax_rate: Percent,
    discount: Money,
    shipping: Money,
) -> Money {
    let subtotal = document_subtotal(items);
    (subtotal + subtotal.apply_percent(tax_rate) - discount + shipping).max_zero()
}

// =============================================================================
// Period Summaries
// =============================================================================

/// One record's contribution to a period report.
///
/// Orders and archived orders carry no commission deduction
/// (`commission_amount: None`); commissions carry theirs.
#[derive(Debug, Clone, Copy)]
pub struct FinancialRow {
    pub po_amount: Money,
    pub vendor_amount: Money,
    pub additional_charges: Money,
    pub cc_charges: Money,
    pub commission_amount: Option<Money>,
}

/// Totals for one year (or one month of one year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodSummary {
    pub year: i32,
    pub month: Option<u32>,
    pub total_po_amount: Money,
    pub total_vendor_amount: Money,
    pub total_additional_charges: Money,
    pub total_cc_charges: Money,
    pub total_commission_amount: Money,
    /// `po − vendor − additional − cc − commission` across the period.
    pub net_profit: Money,
    pub count: usize,
}

/// Folds a filtered set of rows into a period summary.
///
/// The caller selects the rows (by submission date or archive bucket);
/// this function only sums.
pub fn summarize_period<I>(year: i32, month: Option<u32>, rows: I) -> PeriodSummary
where
    I: IntoIterator<Item = FinancialRow>,
{
    let mut summary = PeriodSummary {
        year,
        month,
        total_po_amount: Money::zero(),
        total_vendor_amount: Money::zero(),
        total_additional_charges: Money::zero(),
        total_cc_charges: Money::zero(),
        total_commission_amount: Money::zero(),
        net_profit: Money::zero(),
        count: 0,
    };

    for row in rows {
        summary.total_po_amount += row.po_amount;
        summary.total_vendor_amount += row.vendor_amount;
        summary.total_additional_charges += row.additional_charges;
        summary.total_cc_charges += row.cc_charges;
        if let Some(commission) = row.commission_amount {
            summary.total_commission_amount += commission;
        }
        summary.count += 1;
    }

    summary.net_profit = summary.total_po_amount
        - summary.total_vendor_amount
        - summary.total_additional_charges
        - summary.total_cc_charges
        - summary.total_commission_amount;

    summary
}

// =============================================================================
// Unit Tests
// =============================================================================
