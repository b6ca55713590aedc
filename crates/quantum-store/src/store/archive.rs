//! Data archive store.
//!
//! Holds frozen copies of orders, bucketed by archive year and month for
//! historical reporting. The buckets are the only stored derived data in
//! the system — they back the period index — so every change to
//! `archive_date` must re-derive them, or the record silently stays in
//! its old month and the period summaries drift.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use quantum_core::types::summarize;
use quantum_core::{ArchivedOrder, Order, PeriodSummary};

use crate::container::{Container, HasId};
use crate::error::StoreResult;
use crate::snapshot::Snapshot;
use crate::store::order::OrderPatch;

impl HasId for ArchivedOrder {
    fn record_id(&self) -> &str {
        self.id()
    }
}

/// Partial update for an archived record.
///
/// Edits to the archived copy never flow back to the live order.
#[derive(Debug, Clone, Default)]
pub struct ArchivedOrderPatch {
    /// Changing the archive date moves the record to a new period bucket.
    pub archive_date: Option<NaiveDate>,
    /// Field edits applied to the embedded order snapshot.
    pub order: OrderPatch,
}

/// Owns the archived-order container.
pub struct ArchiveStore {
    container: Container<ArchivedOrder>,
    snapshot: Arc<Snapshot>,
}

impl ArchiveStore {
    pub const NAMESPACE: &'static str = "quantum_erp_data_archive";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let mut container: Container<ArchivedOrder> =
            snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        container.restore();
        Ok(ArchiveStore {
            container,
            snapshot,
        })
    }

    /// Freezes a copy of `order` into the archive under `archive_date`.
    ///
    /// The source order is not touched here; the caller marks it
    /// archived (see [`crate::sync::archive_order`]). The copy keeps the
    /// order's identifier.
    pub fn archive(&mut self, order: &Order, archive_date: NaiveDate) -> StoreResult<ArchivedOrder> {
        let archived = ArchivedOrder::from_order(order, archive_date, chrono::Utc::now());
        info!(
            id = %archived.id(),
            year = archived.archived_year,
            month = archived.archived_month,
            "archiving order"
        );
        self.container.push(archived.clone());
        self.persist()?;
        Ok(archived)
    }

    /// Merges a partial update, re-deriving the period bucket when the
    /// archive date changes.
    pub fn update(&mut self, id: &str, patch: ArchivedOrderPatch) -> StoreResult<bool> {
        let updated = self.container.update_with(id, |archived| {
            patch.order.apply(&mut archived.order);
            if let Some(date) = patch.archive_date {
                if date != archived.archive_date {
                    debug!(id = %archived.id(), %date, "re-bucketing archived order");
                    archived.archive_date = date;
                    archived.rebucket();
                }
            }
        });
        if updated {
            self.persist()?;
        }
        Ok(updated)
    }

    /// Removes an archived record; missing id is a silent no-op.
    pub fn remove(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self.container.remove(id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&ArchivedOrder> {
        self.container.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchivedOrder> {
        self.container.iter()
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    // -------------------------------------------------------------------------
    // Period index (stored buckets only)
    // -------------------------------------------------------------------------

    pub fn get_orders_by_year(&self, year: i32) -> Vec<&ArchivedOrder> {
        self.container
            .iter()
            .filter(|a| a.archived_year == year)
            .collect()
    }

    pub fn get_orders_by_month(&self, year: i32, month: u32) -> Vec<&ArchivedOrder> {
        self.container
            .iter()
            .filter(|a| a.archived_year == year && a.archived_month == month)
            .collect()
    }

    /// Years with archived orders, newest first.
    pub fn get_all_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.container.iter().map(|a| a.archived_year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Months of a year with archived orders, January first.
    pub fn get_months_for_year(&self, year: i32) -> Vec<u32> {
        let mut months: Vec<u32> = self
            .get_orders_by_year(year)
            .into_iter()
            .map(|a| a.archived_month)
            .collect();
        months.sort_unstable();
        months.dedup();
        months
    }

    pub fn year_summary(&self, year: i32) -> PeriodSummary {
        summarize(
            year,
            None,
            self.get_orders_by_year(year)
                .iter()
                .map(|a| a.financial_row()),
        )
    }

    pub fn month_summary(&self, year: i32, month: u32) -> PeriodSummary {
        summarize(
            year,
            Some(month),
            self.get_orders_by_month(year, month)
                .iter()
                .map(|a| a.financial_row()),
        )
    }

    fn persist(&self) -> StoreResult<()> {
        self.snapshot.save(Self::NAMESPACE, &self.container)
    }
}
