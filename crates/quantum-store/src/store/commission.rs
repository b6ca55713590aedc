//! Commission store.
//!
//! Commission records are born from orders (through the order-created
//! hook wired in the composition root) and carry a frozen snapshot of
//! the order's financial inputs. From that point they live their own
//! life: deleting the order does not delete the commission.

use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use quantum_core::types::summarize;
use quantum_core::{
    Commission, CommissionPaymentStatus, CommissionStatus, Distribution, Money, Order,
    PeriodSummary, Percent, Share, DEFAULT_COMMISSION_PERCENT,
};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;

impl HasId for Commission {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Partial update; unset fields are left untouched.
///
/// Only raw inputs are patchable — derived figures (card charges, actual
/// profit, commission amount, role amounts) are recomputed on read from
/// whatever this patch leaves behind.
#[derive(Debug, Clone, Default)]
pub struct CommissionPatch {
    pub qms_id: Option<String>,
    pub customer: Option<String>,
    pub customer_po: Option<String>,
    pub customer_po_issue_date: Option<chrono::NaiveDate>,
    pub submission_date: Option<chrono::NaiveDate>,
    pub status: Option<CommissionStatus>,
    pub po_amount: Option<Money>,
    pub vendor_amount: Option<Money>,
    pub additional_charges: Option<Money>,
    pub cc_charge_rate: Option<Percent>,
    pub commission_percent: Option<Percent>,
    pub hunter_name: Option<String>,
    pub hunter_percent: Option<Percent>,
    pub sourcer_name: Option<String>,
    pub sourcer_percent: Option<Percent>,
    pub submitter_name: Option<String>,
    pub submitter_percent: Option<Percent>,
    pub executor_name: Option<String>,
    pub executor_percent: Option<Percent>,
    pub payment_made: Option<CommissionPaymentStatus>,
    pub payment_details: Option<String>,
    pub anticipated_cheque_date: Option<chrono::NaiveDate>,
    pub anticipated_payment_date: Option<chrono::NaiveDate>,
}

impl CommissionPatch {
    /// An all-`None` patch must not touch the record, `updated_at`
    /// included.
    fn is_empty(&self) -> bool {
        self.qms_id.is_none()
            && self.customer.is_none()
            && self.customer_po.is_none()
            && self.customer_po_issue_date.is_none()
            && self.submission_date.is_none()
            && self.status.is_none()
            && self.po_amount.is_none()
            && self.vendor_amount.is_none()
            && self.additional_charges.is_none()
            && self.cc_charge_rate.is_none()
            && self.commission_percent.is_none()
            && self.hunter_name.is_none()
            && self.hunter_percent.is_none()
            && self.sourcer_name.is_none()
            && self.sourcer_percent.is_none()
            && self.submitter_name.is_none()
            && self.submitter_percent.is_none()
            && self.executor_name.is_none()
            && self.executor_percent.is_none()
            && self.payment_made.is_none()
            && self.payment_details.is_none()
            && self.anticipated_cheque_date.is_none()
            && self.anticipated_payment_date.is_none()
    }

    fn apply(self, c: &mut Commission) {
        if self.is_empty() {
            return;
        }
        if let Some(v) = self.qms_id {
            c.qms_id = v;
        }
        if let Some(v) = self.customer {
            c.customer = v;
        }
        if let Some(v) = self.customer_po {
            c.customer_po = v;
        }
        if let Some(v) = self.customer_po_issue_date {
            c.customer_po_issue_date = Some(v);
        }
        if let Some(v) = self.submission_date {
            c.submission_date = v;
        }
        if let Some(v) = self.status {
            c.status = v;
        }
        if let Some(v) = self.po_amount {
            c.po_amount = v;
        }
        if let Some(v) = self.vendor_amount {
            c.vendor_amount = v;
        }
        if let Some(v) = self.additional_charges {
            c.additional_charges = v;
        }
        if let Some(v) = self.cc_charge_rate {
            c.cc_charge_rate = v;
        }
        if let Some(v) = self.commission_percent {
            c.commission_percent = v;
        }
        if let Some(v) = self.hunter_name {
            c.distribution.hunter.name = Some(v);
        }
        if let Some(v) = self.hunter_percent {
            c.distribution.hunter.percent = v;
        }
        if let Some(v) = self.sourcer_name {
            c.distribution.sourcer.name = Some(v);
        }
        if let Some(v) = self.sourcer_percent {
            c.distribution.sourcer.percent = v;
        }
        if let Some(v) = self.submitter_name {
            c.distribution.submitter.name = Some(v);
        }
        if let Some(v) = self.submitter_percent {
            c.distribution.submitter.percent = v;
        }
        if let Some(v) = self.executor_name {
            c.distribution.executor.name = Some(v);
        }
        if let Some(v) = self.executor_percent {
            c.distribution.executor.percent = v;
        }
        if let Some(v) = self.payment_made {
            c.payment_made = v;
        }
        if let Some(v) = self.payment_details {
            c.payment_details = Some(v);
        }
        if let Some(v) = self.anticipated_cheque_date {
            c.anticipated_cheque_date = Some(v);
        }
        if let Some(v) = self.anticipated_payment_date {
            c.anticipated_payment_date = Some(v);
        }
        c.updated_at = Utc::now();
    }
}

/// Owns the commission container.
pub struct CommissionStore {
    container: Container<Commission>,
    snapshot: Arc<Snapshot>,
}

impl CommissionStore {
    pub const NAMESPACE: &'static str = "quantum_erp_commission";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<Commission> =
            snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(CommissionStore {
            container,
            snapshot,
        })
    }

    /// Derives a commission from a freshly created order.
    ///
    /// Snapshots the order's financial inputs, applies the default 20%
    /// commission, and starts with a zeroed four-way split (the operator
    /// assigns percentages later). If this order already has a
    /// commission the existing record is returned unchanged — one
    /// commission per order, ever.
    pub fn create_from_order(&mut self, order: &Order) -> StoreResult<Commission> {
        if let Some(existing) = self.get_by_order_id(&order.id) {
            warn!(
                order_id = %order.id,
                commission_id = %existing.id,
                "order already has a commission; skipping auto-creation"
            );
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let id = self.container.allocate_id("COM", 4);
        let commission = Commission {
            id,
            order_id: Some(order.id.clone()),
            qms_id: order.qms_id.clone(),
            customer: order.customer.clone(),
            customer_po: order.customer_po.clone(),
            customer_po_issue_date: order.customer_po_issue_date,
            submission_date: order.submission_date.unwrap_or_else(|| now.date_naive()),
            status: CommissionStatus::Active,
            po_amount: order.po_amount,
            vendor_amount: order.vendor_amount,
            additional_charges: order.special_expenses,
            cc_charge_rate: order.effective_cc_rate(),
            commission_percent: DEFAULT_COMMISSION_PERCENT,
            distribution: Distribution {
                hunter: Share {
                    name: order.hunter.clone(),
                    percent: Percent::zero(),
                },
                sourcer: Share {
                    name: order.sourcer.clone(),
                    percent: Percent::zero(),
                },
                submitter: Share::default(),
                executor: Share::default(),
            },
            payment_made: CommissionPaymentStatus::Pending,
            payment_details: None,
            anticipated_cheque_date: order.anticipated_cheque_date,
            anticipated_payment_date: None,
            created_at: now,
            updated_at: now,
        };
        debug!(
            id = %commission.id,
            order_id = %order.id,
            commission = %commission.commission_amount(),
            "creating commission from order"
        );
        self.container.push(commission.clone());
        self.persist()?;
        Ok(commission)
    }

    pub fn update(&mut self, id: &str, patch: CommissionPatch) -> StoreResult<bool> {
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

    pub fn get(&self, id: &str) -> Option<&Commission> {
        self.container.get(id)
    }

    pub fn get_by_order_id(&self, order_id: &str) -> Option<&Commission> {
        self.container
            .iter()
            .find(|c| c.order_id.as_deref() == Some(order_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Commission> {
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

    pub fn get_by_year(&self, year: i32) -> Vec<&Commission> {
        self.container
            .iter()
            .filter(|c| c.submission_date.year() == year)
            .collect()
    }

    pub fn get_by_month(&self, year: i32, month: u32) -> Vec<&Commission> {
        self.container
            .iter()
            .filter(|c| c.submission_date.year() == year && c.submission_date.month() == month)
            .collect()
    }

    /// Years with at least one commission, newest first.
    pub fn get_all_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .container
            .iter()
            .map(|c| c.submission_date.year())
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Months of a year with at least one commission, January first.
    pub fn get_months_for_year(&self, year: i32) -> Vec<u32> {
        let mut months: Vec<u32> = self
            .get_by_year(year)
            .into_iter()
            .map(|c| c.submission_date.month())
            .collect();
        months.sort_unstable();
        months.dedup();
        months
    }

    /// Year totals; net profit deducts the commission amounts.
    pub fn year_summary(&self, year: i32) -> PeriodSummary {
        summarize(
            year,
            None,
            self.get_by_year(year).iter().map(|c| c.financial_row()),
        )
    }

    pub fn month_summary(&self, year: i32, month: u32) -> PeriodSummary {
        summarize(
            year,
            Some(month),
            self.get_by_month(year, month)
                .iter()
                .map(|c| c.financial_row()),
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
    use quantum_core::OrderStatus;

    fn order(id: &str, qms: &str, submission: Option<NaiveDate>) -> Order {
        Order {
            id: id.to_string(),
            qms_id: qms.to_string(),
            customer: "Acme Corp".to_string(),
            customer_po: "PO-9".to_string(),
            qms_po: None,
            qms_invoice: None,
            po_amount: Money::from_cents(100_000),
            vendor_name: None,
            vendor_product_link: None,
            vendor_amount: Money::from_cents(60_000),
            special_expenses: Money::from_cents(5_000),
            cc_charge_rate: None,
            status: OrderStatus::Pending,
            attention_category: None,
            supply_chain_stage: None,
            payment_status: None,
            hunter: Some("H. Lead".to_string()),
            sourcer: Some("S. Source".to_string()),
            customer_po_issue_date: None,
            submission_date: submission,
            anticipated_cheque_date: None,
            archive_date: None,
            created_at: Utc::now(),
        }
    }

    fn store() -> CommissionStore {
        CommissionStore::load(Snapshot::in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_create_from_order_snapshots_financials() {
        let mut commissions = store();
        let commission = commissions.create_from_order(&order("ORD001", "QMS-100", None)).unwrap();

        assert_eq!(commission.id, "COM0001");
        assert_eq!(commission.order_id.as_deref(), Some("ORD001"));
        assert_eq!(commission.commission_percent, DEFAULT_COMMISSION_PERCENT);
        assert_eq!(commission.cc_charges(), Money::from_cents(350));
        assert_eq!(commission.actual_profit(), Money::from_scaled(3_465_000));
        assert_eq!(commission.commission_amount(), Money::from_scaled(693_000));
        assert_eq!(commission.distribution.hunter.name.as_deref(), Some("H. Lead"));
        assert!(commission.distribution.hunter.percent.is_zero());
        // Zeroed split sums to $0.00, which is off by the full commission.
        assert!(!commission.is_balanced());
    }

    #[test]
    fn test_empty_patch_is_a_true_noop() {
        let mut commissions = store();
        let c = commissions
            .create_from_order(&order("ORD001", "QMS-100", None))
            .unwrap();
        assert!(commissions.update(&c.id, CommissionPatch::default()).unwrap());
        let after = commissions.get(&c.id).unwrap();
        assert_eq!(after.updated_at, c.updated_at);
        assert_eq!(after.po_amount, c.po_amount);
        assert_eq!(after.commission_percent, c.commission_percent);
    }

    #[test]
    fn test_one_commission_per_order() {
        let mut commissions = store();
        let o = order("ORD001", "QMS-100", None);
        let first = commissions.create_from_order(&o).unwrap();
        let again = commissions.create_from_order(&o).unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(commissions.len(), 1);
    }

    #[test]
    fn test_distinct_orders_get_isolated_commissions() {
        let mut commissions = store();
        let a = commissions.create_from_order(&order("ORD001", "QMS-100", None)).unwrap();
        let mut big = order("ORD002", "QMS-200", None);
        big.po_amount = Money::from_cents(500_000);
        let b = commissions.create_from_order(&big).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.order_id, b.order_id);
        assert_eq!(a.commission_amount(), Money::from_scaled(693_000));
        // $5,000 − $600 − $50 = $4,350 gross; −1% = $4,306.50; ×20% = $861.30
        assert_eq!(b.commission_amount(), Money::from_cents(86_130));
    }

    #[test]
    fn test_patch_recomputes_derived_figures() {
        let mut commissions = store();
        let c = commissions.create_from_order(&order("ORD001", "QMS-100", None)).unwrap();

        commissions
            .update(
                &c.id,
                CommissionPatch {
                    hunter_percent: Some(Percent::from_percent(25.0)),
                    sourcer_percent: Some(Percent::from_percent(25.0)),
                    submitter_percent: Some(Percent::from_percent(25.0)),
                    executor_percent: Some(Percent::from_percent(25.0)),
                    ..Default::default()
                },
            )
            .unwrap();

        let c = commissions.get(&c.id).unwrap();
        let shares = c.share_amounts();
        assert_eq!(shares.hunter, Money::from_scaled(173_250)); // $17.325
        assert_eq!(shares.total(), c.commission_amount());
        assert!(c.is_balanced());

        // A lopsided split is reported, never corrected.
        let id = c.id.clone();
        commissions
            .update(
                &id,
                CommissionPatch {
                    hunter_percent: Some(Percent::from_percent(50.0)),
                    sourcer_percent: Some(Percent::zero()),
                    submitter_percent: Some(Percent::zero()),
                    executor_percent: Some(Percent::zero()),
                    ..Default::default()
                },
            )
            .unwrap();
        let c = commissions.get(&id).unwrap();
        assert_eq!(c.share_amounts().total(), Money::from_scaled(346_500));
        assert!(!c.is_balanced());
    }

    #[test]
    fn test_period_queries_and_summary() {
        let mut commissions = store();
        let march = NaiveDate::from_ymd_opt(2024, 3, 15);
        let july = NaiveDate::from_ymd_opt(2024, 7, 1);
        let earlier = NaiveDate::from_ymd_opt(2023, 12, 2);
        commissions.create_from_order(&order("ORD001", "Q1", march)).unwrap();
        commissions.create_from_order(&order("ORD002", "Q2", july)).unwrap();
        commissions.create_from_order(&order("ORD003", "Q3", earlier)).unwrap();

        assert_eq!(commissions.get_all_years(), vec![2024, 2023]);
        assert_eq!(commissions.get_months_for_year(2024), vec![3, 7]);
        assert_eq!(commissions.get_by_month(2024, 3).len(), 1);

        let summary = commissions.year_summary(2024);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_po_amount, Money::from_cents(200_000));
        assert_eq!(summary.total_cc_charges, Money::from_cents(700));
        assert_eq!(
            summary.total_commission_amount,
            Money::from_scaled(693_000) * 2
        );
        // po − vendor − additional − cc − commission
        assert_eq!(
            summary.net_profit,
            Money::from_cents(200_000)
                - Money::from_cents(120_000)
                - Money::from_cents(10_000)
                - Money::from_cents(700)
                - Money::from_scaled(1_386_000)
        );
    }
}
