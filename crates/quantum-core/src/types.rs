//! # Domain Types
//!
//! Entity types and status vocabularies for Quantum ERP.
//!
//! ## Entity Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      How the Entities Relate                            │
//! │                                                                         │
//! │   Customer ──spawns──► Order ◄──patches── Vendor                        │
//! │                          │    ◄──patches── PurchaseOrder (qms_po)      │
//! │                          │    ◄──patches── Invoice (qms_invoice)       │
//! │                          │                                              │
//! │                          ├──hook──► Commission  (financial snapshot)   │
//! │                          └──copy──► ArchivedOrder (frozen + bucketed)  │
//! │                                                                         │
//! │   The join key everywhere is the externally-assigned QMS ID.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Fields Are Functions
//! Records store raw inputs only (amounts, rates, percentages). Gross
//! profit, card charges, actual profit, commission amounts, role shares
//! and document totals are accessor methods, so a rendered figure can
//! never disagree with the stored inputs. The one exception is the
//! archive's `archived_year`/`archived_month` pair, which is the stored
//! period index of the archive and is recomputed on every date change.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::finance::{
    self, DistributionAmounts, FinancialRow, PeriodSummary, ProfitWaterfall,
};
use crate::money::{Money, Percent};
use crate::DEFAULT_CC_CHARGE_RATE;

// =============================================================================
// Status Vocabularies
// =============================================================================

/// Order tracking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Freshly created, not yet picked up by the tracking workflow.
    Pending,
    InProcess,
    Cancelled,
    ClosedCheckReceived,
    ActionAwaited,
    CheckAwaited,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// Attention bucket shown on the tracking board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum AttentionCategory {
    PoReceived,
    InProcess,
    FollowUp,
    Cancelled,
    ChequeAwaited,
    ChequeReceived,
    Completed,
    ClosedChqRec,
    ClosedIssue,
    AdjustmentNet30,
}

/// Where the order sits in the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SupplyChainStage {
    VendorAssessment,
    InitialCoord,
    ReSourcing,
    QmsPoSent,
    PaymentToSupplier,
    Shipped,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
    Other,
    WaitingPeriod,
    CheckAwaited,
}

/// Payment status shared by vendors and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Due,
    DueThisWeek,
    DueToday,
    Paid,
    #[serde(rename = "net-30")]
    Net30,
    Cancelled,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Due
    }
}

/// Invoice document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

/// Purchase order document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PurchaseOrderStatus {
    Draft,
    Approved,
    Cancelled,
}

impl Default for PurchaseOrderStatus {
    fn default() -> Self {
        PurchaseOrderStatus::Draft
    }
}

/// Overall commission record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CommissionStatus {
    Active,
    Pending,
    Completed,
    Cancelled,
}

impl Default for CommissionStatus {
    fn default() -> Self {
        CommissionStatus::Active
    }
}

/// Payout state of a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CommissionPaymentStatus {
    Pending,
    PaymentMade,
    NoPaymentReq,
    VerificationRequired,
    Cancelled,
}

impl Default for CommissionPaymentStatus {
    fn default() -> Self {
        CommissionPaymentStatus::Pending
    }
}

// =============================================================================
// Vendor
// =============================================================================

/// A supplier the operation buys from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vendor {
    /// Sequential identifier (`V001`). Immutable after creation.
    pub id: String,
    pub name: String,
    pub product_link: Option<String>,
    /// Join key to the matching order.
    pub qms_id: String,
    pub vendor_amount: Money,
    pub special_expense: Money,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A buying customer. Creating one spawns the matching order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    /// Sequential identifier (`C001`). Immutable after creation.
    pub id: String,
    /// Company / organization name.
    pub customer: String,
    /// Contact person.
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_po: String,
    pub po_amount: Money,
    pub qms_id: String,
}

// =============================================================================
// Order
// =============================================================================

/// The central mutable record: one tracked trade from customer PO to
/// closed cheque.
///
/// ## Financial Raw Inputs
/// `po_amount`, `vendor_amount`, `special_expenses` and `cc_charge_rate`
/// are the only stored financial facts. The profit waterfall
/// (gross → card charge → actual) is always derived through
/// [`Order::waterfall`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// Sequential identifier (`ORD001`). Immutable after creation.
    pub id: String,
    /// Externally-assigned tracking number; the universal join key.
    pub qms_id: String,
    pub customer: String,
    pub customer_po: String,
    /// Internal PO number, back-filled when a purchase order is submitted.
    pub qms_po: Option<String>,
    /// Internal invoice number, back-filled when an invoice is submitted.
    pub qms_invoice: Option<String>,
    pub po_amount: Money,
    pub vendor_name: Option<String>,
    pub vendor_product_link: Option<String>,
    pub vendor_amount: Money,
    pub special_expenses: Money,
    /// Card-processing charge rate override. `None` means the global
    /// default applies; resolve through [`Order::effective_cc_rate`].
    pub cc_charge_rate: Option<Percent>,
    pub status: OrderStatus,
    pub attention_category: Option<AttentionCategory>,
    pub supply_chain_stage: Option<SupplyChainStage>,
    pub payment_status: Option<PaymentStatus>,
    pub hunter: Option<String>,
    pub sourcer: Option<String>,
    #[ts(as = "Option<String>")]
    pub customer_po_issue_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub submission_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub anticipated_cheque_date: Option<NaiveDate>,
    /// Set when the order has been copied into the archive. The copy and
    /// the source are independent from that point on.
    #[ts(as = "Option<String>")]
    pub archive_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// The card-processing rate in effect for this order.
    ///
    /// This is the single place the global 1% default is applied.
    #[inline]
    pub fn effective_cc_rate(&self) -> Percent {
        self.cc_charge_rate.unwrap_or(DEFAULT_CC_CHARGE_RATE)
    }

    /// Derives the full profit waterfall from the raw inputs.
    pub fn waterfall(&self) -> ProfitWaterfall {
        finance::waterfall(
            self.po_amount,
            self.vendor_amount,
            self.special_expenses,
            self.effective_cc_rate(),
        )
    }

    #[inline]
    pub fn gross_profit(&self) -> Money {
        self.waterfall().gross_profit
    }

    #[inline]
    pub fn actual_profit(&self) -> Money {
        self.waterfall().actual_profit
    }

    /// Whether this order has been copied into the archive.
    #[inline]
    pub fn is_archived(&self) -> bool {
        self.archive_date.is_some()
    }

    /// This order's contribution to a period summary.
    pub fn financial_row(&self) -> FinancialRow {
        let w = self.waterfall();
        FinancialRow {
            po_amount: self.po_amount,
            vendor_amount: self.vendor_amount,
            additional_charges: self.special_expenses,
            cc_charges: w.cc_charge,
            commission_amount: None,
        }
    }
}

// =============================================================================
// Archived Order
// =============================================================================

/// A frozen copy of an order, relocated into the date-bucketed archive.
///
/// ## Snapshot Pattern
/// The embedded [`Order`] is a copy taken at archival time. Later edits
/// to the live order do not propagate here, and edits here never flow
/// back.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ArchivedOrder {
    pub order: Order,
    #[ts(as = "String")]
    pub archive_date: NaiveDate,
    #[ts(as = "String")]
    pub archived_at: DateTime<Utc>,
    /// Stored period index, derived from `archive_date`.
    pub archived_year: i32,
    /// Stored period index (1-12), derived from `archive_date`.
    pub archived_month: u32,
}

impl ArchivedOrder {
    /// Builds the frozen copy and stamps the period buckets.
    pub fn from_order(order: &Order, archive_date: NaiveDate, archived_at: DateTime<Utc>) -> Self {
        ArchivedOrder {
            order: order.clone(),
            archive_date,
            archived_at,
            archived_year: archive_date.year(),
            archived_month: archive_date.month(),
        }
    }

    /// The archived record keeps the source order's identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.order.id
    }

    /// Re-derives `archived_year`/`archived_month` from `archive_date`.
    ///
    /// Must be called whenever the date changes, otherwise the record
    /// silently stays in its old period bucket.
    pub fn rebucket(&mut self) {
        self.archived_year = self.archive_date.year();
        self.archived_month = self.archive_date.month();
    }

    pub fn financial_row(&self) -> FinancialRow {
        self.order.financial_row()
    }
}

// =============================================================================
// Line Items & Documents
// =============================================================================

/// One row of a purchase order or invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub description: String,
    pub quantity: crate::money::Quantity,
    pub unit_price: Money,
}

impl LineItem {
    /// `quantity × unit_price`.
    #[inline]
    pub fn total(&self) -> Money {
        finance::line_item_total(self.quantity, self.unit_price)
    }
}

/// An outbound purchase order document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseOrder {
    /// Sequential identifier (`PO001`). Immutable after creation.
    pub id: String,
    pub vendor_name: String,
    pub vendor_address: Option<String>,
    pub ship_to_address: Option<String>,
    pub company_name: String,
    pub company_address: String,
    pub items: Vec<LineItem>,
    pub tax_rate: Percent,
    pub discount: Money,
    pub shipping: Money,
    pub status: PurchaseOrderStatus,
    pub qms_id: Option<String>,
    pub qms_po: Option<String>,
    pub payment_terms: String,
    pub shipping_method: String,
    pub terms_and_conditions: Option<String>,
    pub approved_by: Option<String>,
    #[ts(as = "Option<String>")]
    pub approved_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Sum of line totals.
    #[inline]
    pub fn subtotal(&self) -> Money {
        finance::document_subtotal(&self.items)
    }

    /// Subtotal plus tax, minus discount, plus shipping, floored at $0.
    #[inline]
    pub fn total(&self) -> Money {
        finance::document_total(&self.items, self.tax_rate, self.discount, self.shipping)
    }
}

/// An outbound invoice document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    /// Sequential identifier (`INV001`). Immutable after creation.
    pub id: String,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub tax_rate: Percent,
    pub discount: Money,
    pub shipping: Money,
    pub status: InvoiceStatus,
    pub qms_id: Option<String>,
    pub qms_invoice: Option<String>,
    pub amount_paid: Money,
    #[ts(as = "Option<String>")]
    pub paid_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        finance::document_subtotal(&self.items)
    }

    #[inline]
    pub fn total(&self) -> Money {
        finance::document_total(&self.items, self.tax_rate, self.discount, self.shipping)
    }
}

// =============================================================================
// Commission
// =============================================================================

/// One named participant's slice of a commission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Share {
    pub name: Option<String>,
    pub percent: Percent,
}

/// The four-way payout split: hunter, sourcer, submitter, executor.
///
/// Percentages are independent; nothing forces them to sum to 100.
/// When they don't, the distribution is reported as unbalanced — never
/// silently corrected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Distribution {
    pub hunter: Share,
    pub sourcer: Share,
    pub submitter: Share,
    pub executor: Share,
}

/// A sales-commission record derived from an order.
///
/// ## Raw vs Derived
/// Stored: the financial snapshot taken from the order (`po_amount`,
/// `vendor_amount`, `additional_charges`, `cc_charge_rate`), the
/// commission percentage, and the four role splits. Derived on read:
/// card charges, actual profit, commission amount and every role amount.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Commission {
    /// Sequential identifier (`COM0001`). Immutable after creation.
    pub id: String,
    /// The originating order. Unique across commissions when present.
    pub order_id: Option<String>,
    pub qms_id: String,
    pub customer: String,
    pub customer_po: String,
    #[ts(as = "Option<String>")]
    pub customer_po_issue_date: Option<NaiveDate>,
    /// Drives year/month bucketing of commission reports.
    #[ts(as = "String")]
    pub submission_date: NaiveDate,
    pub status: CommissionStatus,
    pub po_amount: Money,
    pub vendor_amount: Money,
    pub additional_charges: Money,
    /// Card-processing rate snapshotted from the order at creation.
    pub cc_charge_rate: Percent,
    pub commission_percent: Percent,
    pub distribution: Distribution,
    pub payment_made: CommissionPaymentStatus,
    pub payment_details: Option<String>,
    #[ts(as = "Option<String>")]
    pub anticipated_cheque_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub anticipated_payment_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Commission {
    /// Derives the profit waterfall from the snapshotted inputs.
    pub fn waterfall(&self) -> ProfitWaterfall {
        finance::waterfall(
            self.po_amount,
            self.vendor_amount,
            self.additional_charges,
            self.cc_charge_rate,
        )
    }

    /// Card-processing charges on this commission's gross profit.
    #[inline]
    pub fn cc_charges(&self) -> Money {
        self.waterfall().cc_charge
    }

    /// Profit after the card-processing deduction.
    #[inline]
    pub fn actual_profit(&self) -> Money {
        self.waterfall().actual_profit
    }

    /// `actual_profit × commission_percent`.
    pub fn commission_amount(&self) -> Money {
        finance::commission_amount(self.actual_profit(), self.commission_percent)
    }

    /// The four role amounts derived from the splits.
    pub fn share_amounts(&self) -> DistributionAmounts {
        finance::distribution_amounts(self.commission_amount(), &self.distribution)
    }

    /// Whether the role amounts add back up to the commission amount
    /// (within the $0.01 tolerance).
    pub fn is_balanced(&self) -> bool {
        finance::is_balanced(self.share_amounts().total(), self.commission_amount())
    }

    /// This commission's contribution to a period summary. The commission
    /// amount is included so period net profit deducts it.
    pub fn financial_row(&self) -> FinancialRow {
        let w = self.waterfall();
        FinancialRow {
            po_amount: self.po_amount,
            vendor_amount: self.vendor_amount,
            additional_charges: self.additional_charges,
            cc_charges: w.cc_charge,
            commission_amount: Some(self.commission_amount()),
        }
    }
}

/// Summarizes any collection of financial rows for a period.
///
/// Shared by order, archive and commission reporting; only the date field
/// used to select the rows differs between the three.
pub fn summarize<I>(year: i32, month: Option<u32>, rows: I) -> PeriodSummary
where
    I: IntoIterator<Item = FinancialRow>,
{
    finance::summarize_period(year, month, rows)
}

// =============================================================================
// Unit Tests
// =============================================================================
