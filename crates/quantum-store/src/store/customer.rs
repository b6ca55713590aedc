//! Customer store.

use std::sync::Arc;
use tracing::debug;

use quantum_core::{Customer, Money};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

impl HasId for Customer {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    /// Company / organization name.
    pub customer: String,
    /// Contact person.
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_po: String,
    pub po_amount: Money,
    pub qms_id: String,
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub customer: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_po: Option<String>,
    pub po_amount: Option<Money>,
    pub qms_id: Option<String>,
}

impl CustomerPatch {
    fn apply(self, customer: &mut Customer) {
        if let Some(company) = self.customer {
            customer.customer = company;
        }
        if let Some(name) = self.customer_name {
            customer.customer_name = name;
        }
        if let Some(email) = self.customer_email {
            customer.customer_email = Some(email);
        }
        if let Some(po) = self.customer_po {
            customer.customer_po = po;
        }
        if let Some(amount) = self.po_amount {
            customer.po_amount = amount;
        }
        if let Some(qms_id) = self.qms_id {
            customer.qms_id = qms_id;
        }
    }
}

/// Owns the customer container.
pub struct CustomerStore {
    container: Container<Customer>,
    snapshot: Arc<Snapshot>,
}

impl CustomerStore {
    pub const NAMESPACE: &'static str = "quantum_erp_customers";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<Customer> =
            snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(CustomerStore {
            container,
            snapshot,
        })
    }

    pub fn create(&mut self, input: NewCustomer) -> StoreResult<Customer> {
        let id = self.container.allocate_id("C", 3);
        let customer = Customer {
            id,
            customer: input.customer,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_po: input.customer_po,
            po_amount: input.po_amount,
            qms_id: input.qms_id,
        };
        debug!(id = %customer.id, qms_id = %customer.qms_id, "creating customer");
        self.container.push(customer.clone());
        self.persist()?;
        Ok(customer)
    }

    pub fn update(&mut self, id: &str, patch: CustomerPatch) -> StoreResult<bool> {
        let updated = self.container.update_with(id, |c| patch.apply(c));
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

    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.container.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_patch() {
        let mut customers = CustomerStore::load(Snapshot::in_memory().unwrap()).unwrap();
        let created = customers
            .create(NewCustomer {
                customer: "Acme Corp".to_string(),
                customer_name: "Jo Field".to_string(),
                customer_po: "PO-9".to_string(),
                po_amount: Money::from_cents(100_000),
                qms_id: "QMS-100".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(created.id, "C001");

        customers
            .update(
                &created.id,
                CustomerPatch {
                    po_amount: Some(Money::from_cents(120_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        let after = customers.get(&created.id).unwrap();
        assert_eq!(after.po_amount, Money::from_cents(120_000));
        assert_eq!(after.customer, "Acme Corp");
    }
}
