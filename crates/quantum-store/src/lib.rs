//! # quantum-store: Entity Stores for Quantum ERP
//!
//! This crate owns the record containers for the operation's eight
//! stores, their snapshot persistence, and the cross-entity
//! synchronization rules that keep them consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Quantum ERP Data Flow                              │
//! │                                                                         │
//! │  UI event handler (add vendor, archive order, ...)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  quantum-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │   │
//! │  │   │    stores    │   │     sync     │   │     snapshot     │  │   │
//! │  │   │ vendor ...   │◄──│ trigger →    │   │ namespace → JSON │  │   │
//! │  │   │ commission   │   │ match →      │   │ rows in SQLite   │  │   │
//! │  │   │ archive      │   │ effect rules │   │                  │  │   │
//! │  │   └──────┬───────┘   └──────────────┘   └────────▲─────────┘  │   │
//! │  │          │ derivations (quantum-core)            │ save after  │   │
//! │  │          ▼                                       │ every       │   │
//! │  │   pure financial math                            │ mutation    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`snapshot`] - whole-container JSON persistence (SQLite-backed)
//! - [`container`] - generic record container + sequential ID counter
//! - [`store`] - one store module per entity kind
//! - [`sync`] - cross-store trigger → match → effect rules
//! - [`error`] - persistence error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use quantum_store::snapshot::Snapshot;
//! use quantum_store::store::commission::CommissionStore;
//! use quantum_store::store::customer::{CustomerStore, NewCustomer};
//! use quantum_store::store::order::OrderStore;
//! use quantum_store::sync;
//!
//! # fn main() -> Result<(), quantum_store::StoreError> {
//! let snapshot = Snapshot::in_memory()?;
//! let mut customers = CustomerStore::load(snapshot.clone())?;
//! let mut orders = OrderStore::load(snapshot.clone())?;
//! let commissions = Arc::new(Mutex::new(CommissionStore::load(snapshot)?));
//!
//! // Composition root: orders derive commissions through the hook.
//! sync::register_commission_hook(&mut orders, commissions.clone());
//!
//! // Creating a customer spawns its order, which derives its commission.
//! let (_customer, order) = sync::create_customer_with_order(
//!     &mut customers,
//!     &mut orders,
//!     NewCustomer {
//!         customer: "Acme Corp".into(),
//!         customer_name: "Jo Field".into(),
//!         customer_po: "PO-9".into(),
//!         qms_id: "QMS-100".into(),
//!         ..Default::default()
//!     },
//! )?;
//! assert!(commissions.lock().unwrap().get_by_order_id(&order.id).is_some());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod container;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod sync;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use snapshot::Snapshot;

pub use store::archive::{ArchiveStore, ArchivedOrderPatch};
pub use store::commission::{CommissionPatch, CommissionStore};
pub use store::customer::{CustomerPatch, CustomerStore, NewCustomer};
pub use store::invoice::{InvoicePatch, InvoiceStore, NewInvoice};
pub use store::order::{NewOrder, OrderCreatedHook, OrderPatch, OrderStore};
pub use store::purchase_order::{NewPurchaseOrder, PurchaseOrderPatch, PurchaseOrderStore};
pub use store::settings::SettingsStore;
pub use store::vendor::{NewVendor, VendorPatch, VendorStore};
pub use sync::{SyncReport, SyncWarning};
