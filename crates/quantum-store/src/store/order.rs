//! Order tracking store.
//!
//! ## The Order-Created Hook
//! Orders spawn commission records, but the commission store also needs
//! to look back at orders — a direct call in either direction would tie
//! the two modules into a cycle. The order store therefore exposes a
//! single registered callback:
//!
//! ```text
//! composition root ── set_on_order_created(hook) ──► OrderStore
//!                                                        │ create()
//!                                                        ▼
//!                                              hook(&created_order)
//!                                                        │
//!                                                        ▼
//!                                              CommissionStore::create_from_order
//! ```
//!
//! Exactly one subscriber at a time: a new registration replaces the old
//! one, and `None` clears it. The hook runs to completion before
//! `create` returns, so a caller observing the commission store
//! immediately afterwards sees the derived record.

use chrono::{Datelike, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use quantum_core::types::summarize;
use quantum_core::{
    AttentionCategory, Money, Order, OrderStatus, PaymentStatus, Percent, PeriodSummary,
    SupplyChainStage,
};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

impl HasId for Order {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Callback fired after an order is created and persisted.
pub type OrderCreatedHook = Box<dyn FnMut(&Order) + Send>;

/// Input for creating an order.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub qms_id: String,
    pub customer: String,
    pub customer_po: String,
    pub po_amount: Money,
    pub vendor_name: Option<String>,
    pub vendor_product_link: Option<String>,
    pub vendor_amount: Money,
    pub special_expenses: Money,
    /// Card-processing rate override; `None` keeps the global default.
    pub cc_charge_rate: Option<Percent>,
    pub status: Option<OrderStatus>,
    pub attention_category: Option<AttentionCategory>,
    pub supply_chain_stage: Option<SupplyChainStage>,
    pub payment_status: Option<PaymentStatus>,
    pub hunter: Option<String>,
    pub sourcer: Option<String>,
    pub customer_po_issue_date: Option<chrono::NaiveDate>,
    pub submission_date: Option<chrono::NaiveDate>,
    pub anticipated_cheque_date: Option<chrono::NaiveDate>,
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub qms_id: Option<String>,
    pub customer: Option<String>,
    pub customer_po: Option<String>,
    pub qms_po: Option<String>,
    pub qms_invoice: Option<String>,
    pub po_amount: Option<Money>,
    pub vendor_name: Option<String>,
    pub vendor_product_link: Option<String>,
    pub vendor_amount: Option<Money>,
    pub special_expenses: Option<Money>,
    pub cc_charge_rate: Option<Percent>,
    pub status: Option<OrderStatus>,
    pub attention_category: Option<AttentionCategory>,
    pub supply_chain_stage: Option<SupplyChainStage>,
    pub payment_status: Option<PaymentStatus>,
    pub hunter: Option<String>,
    pub sourcer: Option<String>,
    pub customer_po_issue_date: Option<chrono::NaiveDate>,
    pub submission_date: Option<chrono::NaiveDate>,
    pub anticipated_cheque_date: Option<chrono::NaiveDate>,
    pub archive_date: Option<chrono::NaiveDate>,
}

impl OrderPatch {
    pub(crate) fn apply(self, order: &mut Order) {
        if let Some(v) = self.qms_id {
            order.qms_id = v;
        }
        if let Some(v) = self.customer {
            order.customer = v;
        }
        if let Some(v) = self.customer_po {
            order.customer_po = v;
        }
        if let Some(v) = self.qms_po {
            order.qms_po = Some(v);
        }
        if let Some(v) = self.qms_invoice {
            order.qms_invoice = Some(v);
        }
        if let Some(v) = self.po_amount {
            order.po_amount = v;
        }
        if let Some(v) = self.vendor_name {
            order.vendor_name = Some(v);
        }
        if let Some(v) = self.vendor_product_link {
            order.vendor_product_link = Some(v);
        }
        if let Some(v) = self.vendor_amount {
            order.vendor_amount = v;
        }
        if let Some(v) = self.special_expenses {
            order.special_expenses = v;
        }
        if let Some(v) = self.cc_charge_rate {
            order.cc_charge_rate = Some(v);
        }
        if let Some(v) = self.status {
            order.status = v;
        }
        if let Some(v) = self.attention_category {
            order.attention_category = Some(v);
        }
        if let Some(v) = self.supply_chain_stage {
            order.supply_chain_stage = Some(v);
        }
        if let Some(v) = self.payment_status {
            order.payment_status = Some(v);
        }
        if let Some(v) = self.hunter {
            order.hunter = Some(v);
        }
        if let Some(v) = self.sourcer {
            order.sourcer = Some(v);
        }
        if let Some(v) = self.customer_po_issue_date {
            order.customer_po_issue_date = Some(v);
        }
        if let Some(v) = self.submission_date {
            order.submission_date = Some(v);
        }
        if let Some(v) = self.anticipated_cheque_date {
            order.anticipated_cheque_date = Some(v);
        }
        if let Some(v) = self.archive_date {
            order.archive_date = Some(v);
        }
    }
}

/// Owns the order container and the order-created hook.
pub struct OrderStore {
    container: Container<Order>,
    snapshot: Arc<Snapshot>,
    on_order_created: Option<OrderCreatedHook>,
}

impl fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStore")
            .field("orders", &self.container.len())
            .field("hook_registered", &self.on_order_created.is_some())
            .finish()
    }
}

impl OrderStore {
    pub const NAMESPACE: &'static str = "quantum_erp_order_tracking";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<Order> = snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(OrderStore {
            container,
            snapshot,
            on_order_created: None,
        })
    }

    /// Registers (or clears) the order-created hook. Last registration
    /// wins.
    pub fn set_on_order_created(&mut self, hook: Option<OrderCreatedHook>) {
        self.on_order_created = hook;
    }

    /// Creates an order and fires the hook before returning.
    pub fn create(&mut self, input: NewOrder) -> StoreResult<Order> {
        let id = self.container.allocate_id("ORD", 3);
        let order = Order {
            id,
            qms_id: input.qms_id,
            customer: input.customer,
            customer_po: input.customer_po,
            qms_po: None,
            qms_invoice: None,
            po_amount: input.po_amount,
            vendor_name: input.vendor_name,
            vendor_product_link: input.vendor_product_link,
            vendor_amount: input.vendor_amount,
            special_expenses: input.special_expenses,
            cc_charge_rate: input.cc_charge_rate,
            status: input.status.unwrap_or_default(),
            attention_category: input.attention_category,
            supply_chain_stage: input.supply_chain_stage,
            payment_status: input.payment_status,
            hunter: input.hunter,
            sourcer: input.sourcer,
            customer_po_issue_date: input.customer_po_issue_date,
            submission_date: input.submission_date,
            anticipated_cheque_date: input.anticipated_cheque_date,
            archive_date: None,
            created_at: Utc::now(),
        };
        debug!(id = %order.id, qms_id = %order.qms_id, "creating order");
        self.container.push(order.clone());
        self.persist()?;

        if let Some(hook) = self.on_order_created.as_mut() {
            hook(&order);
        }
        Ok(order)
    }

    pub fn update(&mut self, id: &str, patch: OrderPatch) -> StoreResult<bool> {
        let updated = self.container.update_with(id, |o| patch.apply(o));
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

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.container.get(id)
    }

    /// First order carrying the given QMS ID, in insertion order.
    ///
    /// QMS IDs are externally assigned and not guaranteed unique;
    /// synchronization deliberately patches only the first match.
    pub fn find_by_qms_id(&self, qms_id: &str) -> Option<&Order> {
        self.container.iter().find(|o| o.qms_id == qms_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.container.iter()
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    // -------------------------------------------------------------------------
    // Period reporting (anchored on submission_date)
    // -------------------------------------------------------------------------

    pub fn get_by_year(&self, year: i32) -> Vec<&Order> {
        self.container
            .iter()
            .filter(|o| o.submission_date.map(|d| d.year() == year).unwrap_or(false))
            .collect()
    }

    pub fn get_by_month(&self, year: i32, month: u32) -> Vec<&Order> {
        self.container
            .iter()
            .filter(|o| {
                o.submission_date
                    .map(|d| d.year() == year && d.month() == month)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Years with at least one dated order, newest first.
    pub fn get_all_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .container
            .iter()
            .filter_map(|o| o.submission_date.map(|d| d.year()))
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Months of a year with at least one dated order, January first.
    pub fn get_months_for_year(&self, year: i32) -> Vec<u32> {
        let mut months: Vec<u32> = self
            .get_by_year(year)
            .into_iter()
            .filter_map(|o| o.submission_date.map(|d| d.month()))
            .collect();
        months.sort_unstable();
        months.dedup();
        months
    }

    pub fn year_summary(&self, year: i32) -> PeriodSummary {
        summarize(
            year,
            None,
            self.get_by_year(year).iter().map(|o| o.financial_row()),
        )
    }

    pub fn month_summary(&self, year: i32, month: u32) -> PeriodSummary {
        summarize(
            year,
            Some(month),
            self.get_by_month(year, month)
                .iter()
                .map(|o| o.financial_row()),
        )
    }

    fn persist(&self) -> StoreResult<()> {
        self.snapshot.save(Self::NAMESPACE, &self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn store() -> OrderStore {
        OrderStore::load(Snapshot::in_memory().unwrap()).unwrap()
    }

    fn new_order(qms: &str) -> NewOrder {
        NewOrder {
            qms_id: qms.to_string(),
            customer: "Acme Corp".to_string(),
            customer_po: "PO-9".to_string(),
            po_amount: Money::from_cents(100_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_defaults() {
        let mut orders = store();
        let order = orders.create(new_order("QMS-100")).unwrap();
        assert_eq!(order.id, "ORD001");
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.cc_charge_rate.is_none());
        assert_eq!(order.effective_cc_rate(), quantum_core::DEFAULT_CC_CHARGE_RATE);
    }

    #[test]
    fn test_hook_fires_and_last_registration_wins() {
        let mut orders = store();
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));

        let first = seen.clone();
        orders.set_on_order_created(Some(Box::new(move |o| {
            first.lock().unwrap().push(format!("first:{}", o.id));
        })));

        let second = seen.clone();
        orders.set_on_order_created(Some(Box::new(move |o| {
            second.lock().unwrap().push(format!("second:{}", o.id));
        })));

        orders.create(new_order("QMS-100")).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["second:ORD001".to_string()]);

        orders.set_on_order_created(None);
        orders.create(new_order("QMS-101")).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_qms_id_returns_first_match() {
        let mut orders = store();
        let a = orders.create(new_order("QMS-100")).unwrap();
        let _b = orders.create(new_order("QMS-100")).unwrap();
        assert_eq!(orders.find_by_qms_id("QMS-100").unwrap().id, a.id);
        assert!(orders.find_by_qms_id("QMS-404").is_none());
    }

    #[test]
    fn test_period_queries_on_submission_date() {
        let mut orders = store();
        let mut march = new_order("QMS-1");
        march.submission_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        let mut july = new_order("QMS-2");
        july.submission_date = NaiveDate::from_ymd_opt(2024, 7, 1);
        let undated = new_order("QMS-3");

        orders.create(march).unwrap();
        orders.create(july).unwrap();
        orders.create(undated).unwrap();

        assert_eq!(orders.get_by_year(2024).len(), 2);
        assert_eq!(orders.get_by_month(2024, 3).len(), 1);
        assert_eq!(orders.get_by_month(2024, 4).len(), 0);

        let summary = orders.year_summary(2024);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_po_amount, Money::from_cents(200_000));
    }
}
