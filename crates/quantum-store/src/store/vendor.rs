//! Vendor store.
//!
//! Creating a vendor is also a synchronization trigger (it back-fills the
//! matching order's vendor-side fields); that coordination lives in
//! [`crate::sync`], not here — this store only owns its own container.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use quantum_core::{Money, PaymentStatus, Vendor};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

impl HasId for Vendor {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a vendor.
#[derive(Debug, Clone, Default)]
pub struct NewVendor {
    pub name: String,
    pub product_link: Option<String>,
    pub qms_id: String,
    pub vendor_amount: Money,
    pub special_expense: Money,
    pub payment_status: Option<PaymentStatus>,
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct VendorPatch {
    pub name: Option<String>,
    pub product_link: Option<String>,
    pub qms_id: Option<String>,
    pub vendor_amount: Option<Money>,
    pub special_expense: Option<Money>,
    pub payment_status: Option<PaymentStatus>,
}

impl VendorPatch {
    fn apply(self, vendor: &mut Vendor) {
        if let Some(name) = self.name {
            vendor.name = name;
        }
        if let Some(link) = self.product_link {
            vendor.product_link = Some(link);
        }
        if let Some(qms_id) = self.qms_id {
            vendor.qms_id = qms_id;
        }
        if let Some(amount) = self.vendor_amount {
            vendor.vendor_amount = amount;
        }
        if let Some(expense) = self.special_expense {
            vendor.special_expense = expense;
        }
        if let Some(status) = self.payment_status {
            vendor.payment_status = status;
        }
    }
}

/// Owns the vendor container.
pub struct VendorStore {
    container: Container<Vendor>,
    snapshot: Arc<Snapshot>,
}

impl VendorStore {
    pub const NAMESPACE: &'static str = "quantum_erp_vendors";

    /// Loads the persisted container (or starts empty).
    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<Vendor> =
            snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(VendorStore {
            container,
            snapshot,
        })
    }

    pub fn create(&mut self, input: NewVendor) -> StoreResult<Vendor> {
        let id = self.container.allocate_id("V", 3);
        let vendor = Vendor {
            id,
            name: input.name,
            product_link: input.product_link,
            qms_id: input.qms_id,
            vendor_amount: input.vendor_amount,
            special_expense: input.special_expense,
            payment_status: input.payment_status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        debug!(id = %vendor.id, qms_id = %vendor.qms_id, "creating vendor");
        self.container.push(vendor.clone());
        self.persist()?;
        Ok(vendor)
    }

    /// Merges a partial update; missing id is a silent no-op (`false`).
    pub fn update(&mut self, id: &str, patch: VendorPatch) -> StoreResult<bool> {
        let updated = self.container.update_with(id, |v| patch.apply(v));
        if updated {
            self.persist()?;
        }
        Ok(updated)
    }

    /// Removes a vendor; missing id is a silent no-op (`false`).
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self.container.remove(id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Vendor> {
        self.container.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vendor> {
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
