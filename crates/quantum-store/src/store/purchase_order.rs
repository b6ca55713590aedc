//! Purchase order store.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use quantum_core::{LineItem, Money, Percent, PurchaseOrder, PurchaseOrderStatus};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

const DEFAULT_COMPANY_NAME: &str = "Quantum Concierge Services LLC";
const DEFAULT_COMPANY_ADDRESS: &str = "208 Somersly PL, Lexington KY, 40515";
const DEFAULT_PAYMENT_TERMS: &str = "Net 30";
const DEFAULT_SHIPPING_METHOD: &str = "Ground";

impl HasId for PurchaseOrder {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, Default)]
pub struct NewPurchaseOrder {
    pub vendor_name: String,
    pub vendor_address: Option<String>,
    pub ship_to_address: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub items: Vec<LineItem>,
    pub tax_rate: Percent,
    pub discount: Money,
    pub shipping: Money,
    pub qms_id: Option<String>,
    pub qms_po: Option<String>,
    pub payment_terms: Option<String>,
    pub shipping_method: Option<String>,
    pub terms_and_conditions: Option<String>,
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PurchaseOrderPatch {
    pub vendor_name: Option<String>,
    pub vendor_address: Option<String>,
    pub ship_to_address: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub tax_rate: Option<Percent>,
    pub discount: Option<Money>,
    pub shipping: Option<Money>,
    pub status: Option<PurchaseOrderStatus>,
    pub qms_id: Option<String>,
    pub qms_po: Option<String>,
    pub payment_terms: Option<String>,
    pub shipping_method: Option<String>,
    pub terms_and_conditions: Option<String>,
}

impl PurchaseOrderPatch {
    fn apply(self, po: &mut PurchaseOrder) {
        if let Some(v) = self.vendor_name {
            po.vendor_name = v;
        }
        if let Some(v) = self.vendor_address {
            po.vendor_address = Some(v);
        }
        if let Some(v) = self.ship_to_address {
            po.ship_to_address = Some(v);
        }
        if let Some(v) = self.company_name {
            po.company_name = v;
        }
        if let Some(v) = self.company_address {
            po.company_address = v;
        }
        if let Some(v) = self.items {
            po.items = v;
        }
        if let Some(v) = self.tax_rate {
            po.tax_rate = v;
        }
        if let Some(v) = self.discount {
            po.discount = v;
        }
        if let Some(v) = self.shipping {
            po.shipping = v;
        }
        if let Some(v) = self.status {
            po.status = v;
        }
        if let Some(v) = self.qms_id {
            po.qms_id = Some(v);
        }
        if let Some(v) = self.qms_po {
            po.qms_po = Some(v);
        }
        if let Some(v) = self.payment_terms {
            po.payment_terms = v;
        }
        if let Some(v) = self.shipping_method {
            po.shipping_method = v;
        }
        if let Some(v) = self.terms_and_conditions {
            po.terms_and_conditions = Some(v);
        }
    }
}

/// Owns the purchase order container.
pub struct PurchaseOrderStore {
    container: Container<PurchaseOrder>,
    snapshot: Arc<Snapshot>,
}

impl PurchaseOrderStore {
    pub const NAMESPACE: &'static str = "quantum_erp_pos";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<PurchaseOrder> =
            snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(PurchaseOrderStore {
            container,
            snapshot,
        })
    }

    pub fn create(&mut self, input: NewPurchaseOrder) -> StoreResult<PurchaseOrder> {
        let id = self.container.allocate_id("PO", 3);
        let po = PurchaseOrder {
            id,
            vendor_name: input.vendor_name,
            vendor_address: input.vendor_address,
            ship_to_address: input.ship_to_address,
            company_name: input
                .company_name
                .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            company_address: input
                .company_address
                .unwrap_or_else(|| DEFAULT_COMPANY_ADDRESS.to_string()),
            items: input.items,
            tax_rate: input.tax_rate,
            discount: input.discount,
            shipping: input.shipping,
            status: PurchaseOrderStatus::Draft,
            qms_id: input.qms_id,
            qms_po: input.qms_po,
            payment_terms: input
                .payment_terms
                .unwrap_or_else(|| DEFAULT_PAYMENT_TERMS.to_string()),
            shipping_method: input
                .shipping_method
                .unwrap_or_else(|| DEFAULT_SHIPPING_METHOD.to_string()),
            terms_and_conditions: input.terms_and_conditions,
            approved_by: None,
            approved_date: None,
            created_at: Utc::now(),
        };
        debug!(id = %po.id, "creating purchase order");
        self.container.push(po.clone());
        self.persist()?;
        Ok(po)
    }

    pub fn update(&mut self, id: &str, patch: PurchaseOrderPatch) -> StoreResult<bool> {
        let updated = self.container.update_with(id, |po| patch.apply(po));
        if updated {
            self.persist()?;
        }
        Ok(updated)
    }

    /// Marks a draft as approved, stamping the approver and date.
    pub fn approve(&mut self, id: &str, approved_by: &str) -> StoreResult<bool> {
        let today = Utc::now().date_naive();
        let updated = self.container.update_with(id, |po| {
            po.status = PurchaseOrderStatus::Approved;
            po.approved_by = Some(approved_by.to_string());
            po.approved_date = Some(today);
        });
        if updated {
            self.persist()?;
        }
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self.container.remove(id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&PurchaseOrder> {
        self.container.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PurchaseOrder> {
        self.container.iter()
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    fn persist(&self) -> StoreResult<()> {
        self.snapshot.save(Self::NAMESPACE, &self.container)
    }
}
