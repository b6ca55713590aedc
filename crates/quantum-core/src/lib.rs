//! # quantum-core: Pure Business Logic for Quantum ERP
//!
//! This crate is the **heart** of Quantum ERP. It contains the financial
//! rules of a small trading/brokerage operation as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quantum ERP Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Frontend (React)                           │   │
//! │  │   Vendors ── Customers ── Order Tracking ── Commission ── ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                quantum-store (Entity Stores)                    │   │
//! │  │   containers • snapshots • cross-store sync • archive           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quantum-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐ │   │
//! │  │   │   types   │  │   money   │  │  finance  │  │ validation │ │   │
//! │  │   │  Order    │  │   Money   │  │ waterfall │  │   clamps   │ │   │
//! │  │   │Commission │  │  Percent  │  │  splits   │  │  defaults  │ │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, Commission, Vendor, etc.)
//! - [`money`] - Fixed-point Money/Percent/Quantity arithmetic
//! - [`finance`] - Profit waterfall, distribution, document totals,
//!   period summaries
//! - [`validation`] - Input-boundary clamping and defaulting
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, no side effects
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Fixed-Point Money**: scaled i64, never floating point
//! 4. **Derived fields are computed on read**: stored records hold raw
//!    inputs only, so figures can never go stale
//!
//! ## Example Usage
//!
//! ```rust
//! use quantum_core::finance;
//! use quantum_core::money::Money;
//!
//! let w = finance::waterfall(
//!     Money::from_cents(100_000), // $1,000 customer PO
//!     Money::from_cents(60_000),  // $600 vendor cost
//!     Money::from_cents(5_000),   // $50 special expenses
//!     quantum_core::DEFAULT_CC_CHARGE_RATE,
//! );
//! assert_eq!(w.actual_profit, Money::from_scaled(3_465_000)); // $346.50
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod finance;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use finance::{DistributionAmounts, FinancialRow, PeriodSummary, ProfitWaterfall};
pub use money::{ExchangeRate, Money, Percent, Quantity};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

use money::Percent as Pct;

/// Default card-processing charge rate: 1% of gross profit.
///
/// This is the ONLY place the default lives. Records store an optional
/// override; every consumer resolves through
/// [`types::Order::effective_cc_rate`] or the commission's snapshotted
/// rate, so there is no per-call-site `?? 0.01` to drift.
pub const DEFAULT_CC_CHARGE_RATE: Pct = Pct::from_bps(100);

/// Default commission percentage applied when a commission record is
/// derived from an order: 20% of actual profit.
pub const DEFAULT_COMMISSION_PERCENT: Pct = Pct::from_bps(2_000);

/// Default USD → PKR conversion rate until the operator configures one.
pub const DEFAULT_USD_TO_PKR: money::ExchangeRate = money::ExchangeRate::from_scaled(278_0000);
