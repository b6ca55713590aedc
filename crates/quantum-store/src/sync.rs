//! # Cross-Entity Synchronization
//!
//! The trigger → match → effect rules that keep independently-edited
//! stores consistent, joined by the externally-assigned QMS ID.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Trigger                      Match                Effect               │
//! │  ────────────────────────     ─────────────────    ──────────────────   │
//! │  customer created             (always)             spawn order          │
//! │  vendor created               first qms_id match   patch vendor fields  │
//! │  purchase order submitted     first qms_id match   patch qms_po only    │
//! │  invoice submitted            first qms_id match   patch qms_invoice    │
//! │  order created                (always, via hook)   derive commission    │
//! │  order archived               by order id          freeze + bucket      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! An unmatched QMS ID is never an error. The originating record is
//! created regardless and the caller gets a [`SyncReport`] with
//! `matched: false` and an [`SyncWarning::UnmatchedJoin`] to surface.
//!
//! ## Direction Discipline
//! Customer/Vendor/PO/Invoice → Order are one-directional and call the
//! order store directly. Order → Commission would close a cycle, so it
//! goes through the registered hook on [`OrderStore`] instead; this
//! module only wires it up.

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{error, warn};

use quantum_core::{
    ArchivedOrder, AttentionCategory, Commission, Customer, Invoice, Money, Order, OrderStatus,
    PurchaseOrder, SupplyChainStage, Vendor,
};

use crate::error::StoreResult;
use crate::store::archive::ArchiveStore;
use crate::store::commission::CommissionStore;
use crate::store::customer::{CustomerStore, NewCustomer};
use crate::store::invoice::{InvoiceStore, NewInvoice};
use crate::store::order::{NewOrder, OrderPatch, OrderStore};
use crate::store::purchase_order::{NewPurchaseOrder, PurchaseOrderStore};
use crate::store::vendor::{NewVendor, VendorStore};

// =============================================================================
// Reports & Warnings
// =============================================================================

/// A reportable, non-fatal condition raised by a synchronization rule or
/// a balance check. Never blocks the originating operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncWarning {
    /// The join key matched no order; the record was created anyway.
    #[error("no matching order found for QMS ID \"{qms_id}\"")]
    UnmatchedJoin { qms_id: String },

    /// The four-way split does not add back up to the commission amount.
    #[error("distribution total {distribution_total} does not match commission amount {commission_amount}")]
    UnbalancedDistribution {
        distribution_total: Money,
        commission_amount: Money,
    },
}

/// Outcome of a synchronization rule: the operation itself always
/// succeeded; `matched` says whether a target order was found and
/// patched.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub matched: bool,
    /// The order that was patched, when one matched.
    pub order_id: Option<String>,
    pub warnings: Vec<SyncWarning>,
}

impl SyncReport {
    fn matched(order_id: String) -> Self {
        SyncReport {
            matched: true,
            order_id: Some(order_id),
            warnings: Vec::new(),
        }
    }

    fn unmatched(qms_id: &str) -> Self {
        warn!(qms_id, "no matching order for QMS ID");
        SyncReport {
            matched: false,
            order_id: None,
            warnings: vec![SyncWarning::UnmatchedJoin {
                qms_id: qms_id.to_string(),
            }],
        }
    }
}

// =============================================================================
// Order → Commission (hook wiring)
// =============================================================================

/// Wires commission auto-creation onto the order store.
///
/// Call once from the composition root after loading both stores. A
/// repeat call replaces the previous wiring (last registration wins);
/// `orders.set_on_order_created(None)` unwires it.
pub fn register_commission_hook(
    orders: &mut OrderStore,
    commissions: Arc<Mutex<CommissionStore>>,
) {
    orders.set_on_order_created(Some(Box::new(move |order: &Order| {
        match commissions.lock() {
            Ok(mut store) => {
                if let Err(err) = store.create_from_order(order) {
                    error!(order_id = %order.id, %err, "commission auto-creation failed");
                }
            }
            Err(_) => error!(order_id = %order.id, "commission store lock poisoned"),
        }
    })));
}

// =============================================================================
// Customer created → spawn order
// =============================================================================

/// Creates a customer and spawns its tracking order.
///
/// The order starts in-process / po-received / vendor-assessment with
/// the customer-side fields copied over and the vendor-side amounts
/// zeroed (a vendor has not been assigned yet). If the commission hook
/// is registered, the spawned order derives its commission before this
/// function returns.
pub fn create_customer_with_order(
    customers: &mut CustomerStore,
    orders: &mut OrderStore,
    input: NewCustomer,
) -> StoreResult<(Customer, Order)> {
    let customer = customers.create(input)?;
    let order = orders.create(NewOrder {
        qms_id: customer.qms_id.clone(),
        customer: customer.customer.clone(),
        customer_po: customer.customer_po.clone(),
        po_amount: customer.po_amount,
        vendor_amount: Money::zero(),
        special_expenses: Money::zero(),
        status: Some(OrderStatus::InProcess),
        attention_category: Some(AttentionCategory::PoReceived),
        supply_chain_stage: Some(SupplyChainStage::VendorAssessment),
        ..Default::default()
    })?;
    Ok((customer, order))
}

// =============================================================================
// Vendor created → patch matching order
// =============================================================================

/// Creates a vendor and back-fills the first order with the same QMS ID.
///
/// The patch covers exactly the vendor-side fields: name, product link,
/// vendor amount, special expenses, payment status. No match is
/// non-fatal — the vendor is created either way.
pub fn create_vendor_with_order_sync(
    vendors: &mut VendorStore,
    orders: &mut OrderStore,
    input: NewVendor,
) -> StoreResult<(Vendor, SyncReport)> {
    let target = orders.find_by_qms_id(&input.qms_id).map(|o| o.id.clone());
    let vendor = vendors.create(input)?;

    let report = match target {
        Some(order_id) => {
            orders.update(
                &order_id,
                OrderPatch {
                    vendor_name: Some(vendor.name.clone()),
                    vendor_product_link: vendor.product_link.clone(),
                    vendor_amount: Some(vendor.vendor_amount),
                    special_expenses: Some(vendor.special_expense),
                    payment_status: Some(vendor.payment_status),
                    ..Default::default()
                },
            )?;
            SyncReport::matched(order_id)
        }
        None => SyncReport::unmatched(&vendor.qms_id),
    };

    Ok((vendor, report))
}

// =============================================================================
// Purchase order / invoice submitted → back-fill order numbers
// =============================================================================

/// Creates a purchase order; when it carries both a QMS ID and a QMS PO
/// number, back-fills `qms_po` on the first matching order. Nothing else
/// on the order is touched.
pub fn submit_purchase_order(
    purchase_orders: &mut PurchaseOrderStore,
    orders: &mut OrderStore,
    input: NewPurchaseOrder,
) -> StoreResult<(PurchaseOrder, SyncReport)> {
    let po = purchase_orders.create(input)?;

    let (qms_id, qms_po) = match (po.qms_id.as_deref(), po.qms_po.as_deref()) {
        (Some(id), Some(number)) if !id.is_empty() && !number.is_empty() => (id, number),
        _ => return Ok((po, SyncReport::default())),
    };

    let report = match orders.find_by_qms_id(qms_id).map(|o| o.id.clone()) {
        Some(order_id) => {
            orders.update(
                &order_id,
                OrderPatch {
                    qms_po: Some(qms_po.to_string()),
                    ..Default::default()
                },
            )?;
            SyncReport::matched(order_id)
        }
        None => SyncReport::unmatched(qms_id),
    };

    Ok((po, report))
}

/// Creates an invoice; when it carries both a QMS ID and a QMS invoice
/// number, back-fills `qms_invoice` on the first matching order.
pub fn submit_invoice(
    invoices: &mut InvoiceStore,
    orders: &mut OrderStore,
    input: NewInvoice,
) -> StoreResult<(Invoice, SyncReport)> {
    let invoice = invoices.create(input)?;

    let (qms_id, qms_invoice) = match (invoice.qms_id.as_deref(), invoice.qms_invoice.as_deref()) {
        (Some(id), Some(number)) if !id.is_empty() && !number.is_empty() => (id, number),
        _ => return Ok((invoice, SyncReport::default())),
    };

    let report = match orders.find_by_qms_id(qms_id).map(|o| o.id.clone()) {
        Some(order_id) => {
            orders.update(
                &order_id,
                OrderPatch {
                    qms_invoice: Some(qms_invoice.to_string()),
                    ..Default::default()
                },
            )?;
            SyncReport::matched(order_id)
        }
        None => SyncReport::unmatched(qms_id),
    };

    Ok((invoice, report))
}

// =============================================================================
// Archival transition
// =============================================================================

/// Moves an order into the archive.
///
/// Freezes a copy under `archive_date` and stamps `archive_date` on the
/// source order as the archived signal. The source order is NOT deleted,
/// and the two copies are independent afterwards. A missing order id is
/// a no-op returning `None`.
pub fn archive_order(
    orders: &mut OrderStore,
    archive: &mut ArchiveStore,
    order_id: &str,
    archive_date: NaiveDate,
) -> StoreResult<Option<ArchivedOrder>> {
    let order = match orders.get(order_id) {
        Some(order) => order.clone(),
        None => return Ok(None),
    };

    let archived = archive.archive(&order, archive_date)?;
    orders.update(
        order_id,
        OrderPatch {
            archive_date: Some(archive_date),
            ..Default::default()
        },
    )?;
    Ok(Some(archived))
}

// =============================================================================
// Balance check
// =============================================================================

/// Surfaces an unbalanced four-way split as a warning the UI can pin
/// next to the record. Never blocks a save.
pub fn check_distribution(commission: &Commission) -> Option<SyncWarning> {
    if commission.is_balanced() {
        None
    } else {
        Some(SyncWarning::UnbalancedDistribution {
            distribution_total: commission.share_amounts().total(),
            commission_amount: commission.commission_amount(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use quantum_core::Percent;

    struct Fixture {
        customers: CustomerStore,
        vendors: VendorStore,
        orders: OrderStore,
        purchase_orders: PurchaseOrderStore,
        invoices: InvoiceStore,
    }

    fn fixture() -> Fixture {
        let snapshot = Snapshot::in_memory().unwrap();
        Fixture {
            customers: CustomerStore::load(snapshot.clone()).unwrap(),
            vendors: VendorStore::load(snapshot.clone()).unwrap(),
            orders: OrderStore::load(snapshot.clone()).unwrap(),
            purchase_orders: PurchaseOrderStore::load(snapshot.clone()).unwrap(),
            invoices: InvoiceStore::load(snapshot).unwrap(),
        }
    }

    fn customer(qms: &str) -> NewCustomer {
        NewCustomer {
            customer: "Acme Corp".to_string(),
            customer_name: "Jo Field".to_string(),
            customer_po: "PO-9".to_string(),
            po_amount: Money::from_cents(100_000),
            qms_id: qms.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_customer_spawns_order() {
        let mut f = fixture();
        let (created, order) =
            create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-100"))
                .unwrap();

        assert_eq!(order.qms_id, created.qms_id);
        assert_eq!(order.customer_po, "PO-9");
        assert_eq!(order.po_amount, Money::from_cents(100_000));
        assert_eq!(order.status, OrderStatus::InProcess);
        assert_eq!(order.attention_category, Some(AttentionCategory::PoReceived));
        assert_eq!(
            order.supply_chain_stage,
            Some(SupplyChainStage::VendorAssessment)
        );
        assert!(order.vendor_amount.is_zero());
        assert!(order.special_expenses.is_zero());
        assert_eq!(f.orders.len(), 1);
    }

    #[test]
    fn test_vendor_patches_first_matching_order_only() {
        let mut f = fixture();
        create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-100")).unwrap();
        create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-100")).unwrap();
        create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-200")).unwrap();

        let (vendor, report) = create_vendor_with_order_sync(
            &mut f.vendors,
            &mut f.orders,
            NewVendor {
                name: "Globex Manufacturing".to_string(),
                product_link: Some("https://globex.example/widget".to_string()),
                qms_id: "QMS-100".to_string(),
                vendor_amount: Money::from_cents(60_000),
                special_expense: Money::from_cents(5_000),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.matched);
        assert!(report.warnings.is_empty());
        let patched_id = report.order_id.unwrap();
        assert_eq!(patched_id, "ORD001");

        let patched = f.orders.get(&patched_id).unwrap();
        assert_eq!(patched.vendor_name.as_deref(), Some("Globex Manufacturing"));
        assert_eq!(patched.vendor_amount, Money::from_cents(60_000));
        assert_eq!(patched.special_expenses, Money::from_cents(5_000));
        assert_eq!(patched.payment_status, Some(vendor.payment_status));

        // The second QMS-100 order and the QMS-200 order are untouched.
        assert!(f.orders.get("ORD002").unwrap().vendor_name.is_none());
        assert!(f.orders.get("ORD003").unwrap().vendor_name.is_none());
    }

    #[test]
    fn test_unmatched_vendor_is_created_with_warning() {
        let mut f = fixture();
        let (vendor, report) = create_vendor_with_order_sync(
            &mut f.vendors,
            &mut f.orders,
            NewVendor {
                name: "Globex Manufacturing".to_string(),
                qms_id: "QMS-404".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!report.matched);
        assert_eq!(
            report.warnings,
            vec![SyncWarning::UnmatchedJoin {
                qms_id: "QMS-404".to_string()
            }]
        );
        assert!(f.vendors.get(&vendor.id).is_some());
    }

    #[test]
    fn test_purchase_order_backfills_qms_po_only() {
        let mut f = fixture();
        let (_, order) =
            create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-100"))
                .unwrap();
        let before = f.orders.get(&order.id).unwrap().clone();

        let (_, report) = submit_purchase_order(
            &mut f.purchase_orders,
            &mut f.orders,
            NewPurchaseOrder {
                vendor_name: "Globex Manufacturing".to_string(),
                qms_id: Some("QMS-100".to_string()),
                qms_po: Some("QPO-55".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.matched);
        let after = f.orders.get(&order.id).unwrap();
        assert_eq!(after.qms_po.as_deref(), Some("QPO-55"));
        // Everything else is untouched.
        assert_eq!(after.po_amount, before.po_amount);
        assert_eq!(after.status, before.status);
        assert_eq!(after.vendor_amount, before.vendor_amount);
    }

    #[test]
    fn test_purchase_order_without_both_numbers_does_not_sync() {
        let mut f = fixture();
        create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-100")).unwrap();

        let (_, report) = submit_purchase_order(
            &mut f.purchase_orders,
            &mut f.orders,
            NewPurchaseOrder {
                vendor_name: "Globex Manufacturing".to_string(),
                qms_id: Some("QMS-100".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!report.matched);
        assert!(report.warnings.is_empty());
        assert!(f.orders.get("ORD001").unwrap().qms_po.is_none());
    }

    #[test]
    fn test_invoice_backfills_qms_invoice() {
        let mut f = fixture();
        create_customer_with_order(&mut f.customers, &mut f.orders, customer("QMS-100")).unwrap();

        let (_, report) = submit_invoice(
            &mut f.invoices,
            &mut f.orders,
            NewInvoice {
                customer_name: "Acme Corp".to_string(),
                qms_id: Some("QMS-100".to_string()),
                qms_invoice: Some("QINV-7".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.matched);
        assert_eq!(
            f.orders.get("ORD001").unwrap().qms_invoice.as_deref(),
            Some("QINV-7")
        );
    }

    #[test]
    fn test_check_distribution() {
        let snapshot = Snapshot::in_memory().unwrap();
        let mut orders = OrderStore::load(snapshot.clone()).unwrap();
        let mut commissions = CommissionStore::load(snapshot).unwrap();

        let order = orders
            .create(NewOrder {
                qms_id: "QMS-100".to_string(),
                customer: "Acme Corp".to_string(),
                customer_po: "PO-9".to_string(),
                po_amount: Money::from_cents(100_000),
                vendor_amount: Money::from_cents(60_000),
                special_expenses: Money::from_cents(5_000),
                ..Default::default()
            })
            .unwrap();
        let commission = commissions.create_from_order(&order).unwrap();

        // Zeroed split: off by the full commission amount.
        match check_distribution(&commission) {
            Some(SyncWarning::UnbalancedDistribution {
                distribution_total,
                commission_amount,
            }) => {
                assert_eq!(distribution_total, Money::zero());
                assert_eq!(commission_amount, Money::from_scaled(693_000));
            }
            other => panic!("expected unbalanced warning, got {other:?}"),
        }

        commissions
            .update(
                &commission.id,
                crate::store::commission::CommissionPatch {
                    hunter_percent: Some(Percent::from_percent(25.0)),
                    sourcer_percent: Some(Percent::from_percent(25.0)),
                    submitter_percent: Some(Percent::from_percent(25.0)),
                    executor_percent: Some(Percent::from_percent(25.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        let balanced = commissions.get(&commission.id).unwrap();
        assert!(check_distribution(balanced).is_none());
    }
}
