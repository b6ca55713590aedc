//! Invoice store.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use quantum_core::{Invoice, InvoiceStatus, LineItem, Money, Percent};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

impl HasId for Invoice {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Default)]
pub struct NewInvoice {
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub tax_rate: Percent,
    pub discount: Money,
    pub shipping: Money,
    pub qms_id: Option<String>,
    pub qms_invoice: Option<String>,
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub customer_name: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub tax_rate: Option<Percent>,
    pub discount: Option<Money>,
    pub shipping: Option<Money>,
    pub status: Option<InvoiceStatus>,
    pub qms_id: Option<String>,
    pub qms_invoice: Option<String>,
}

impl InvoicePatch {
    fn apply(self, invoice: &mut Invoice) {
        if let Some(v) = self.customer_name {
            invoice.customer_name = v;
        }
        if let Some(v) = self.items {
            invoice.items = v;
        }
        if let Some(v) = self.tax_rate {
            invoice.tax_rate = v;
        }
        if let Some(v) = self.discount {
            invoice.discount = v;
        }
        if let Some(v) = self.shipping {
            invoice.shipping = v;
        }
        if let Some(v) = self.status {
            invoice.status = v;
        }
        if let Some(v) = self.qms_id {
            invoice.qms_id = Some(v);
        }
        if let Some(v) = self.qms_invoice {
            invoice.qms_invoice = Some(v);
        }
    }
}

/// Owns the invoice container.
pub struct InvoiceStore {
    container: Container<Invoice>,
    snapshot: Arc<Snapshot>,
}

impl InvoiceStore {
    pub const NAMESPACE: &'static str = "quantum_erp_invoices";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<Invoice> =
            snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(InvoiceStore {
            container,
            snapshot,
        })
    }

    pub fn create(&mut self, input: NewInvoice) -> StoreResult<Invoice> {
        let id = self.container.allocate_id("INV", 3);
        let invoice = Invoice {
            id,
            customer_name: input.customer_name,
            items: input.items,
            tax_rate: input.tax_rate,
            discount: input.discount,
            shipping: input.shipping,
            status: InvoiceStatus::Draft,
            qms_id: input.qms_id,
            qms_invoice: input.qms_invoice,
            amount_paid: Money::zero(),
            paid_date: None,
            created_at: Utc::now(),
        };
        debug!(id = %invoice.id, "creating invoice");
        self.container.push(invoice.clone());
        self.persist()?;
        Ok(invoice)
    }

    pub fn update(&mut self, id: &str, patch: InvoicePatch) -> StoreResult<bool> {
        let updated = self.container.update_with(id, |inv| patch.apply(inv));
        if updated {
            self.persist()?;
        }
        Ok(updated)
    }

    /// Settles an invoice in full: Paid, amount_paid = total, dated today.
    pub fn mark_paid(&mut self, id: &str) -> StoreResult<bool> {
        let today = Utc::now().date_naive();
        let updated = self.container.update_with(id, |inv| {
            inv.status = InvoiceStatus::Paid;
            inv.amount_paid = inv.total();
            inv.paid_date = Some(today);
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

    pub fn get(&self, id: &str) -> Option<&Invoice> {
        self.container.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Invoice> {
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
