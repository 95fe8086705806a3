//! Expense state store
//!
//! Holds the selected month, that month's expenses and the known cost
//! centers. Every mutation goes to the gateway first; the cache changes only
//! after the gateway call succeeded, and subscribers are notified through the
//! event bus.

use std::sync::mpsc::Receiver;

use tracing::{debug, error, info, warn};

use super::events::{EventBus, StoreEvent};
use crate::error::{GastosError, GastosResult};
use crate::gateway::DataGateway;
use crate::models::{
    CostCenterSet, Expense, ExpenseId, Month, NewExpense, ReceiptImage, ReceiptKey,
};

/// Handle for one month fetch
///
/// Only the ticket from the most recent [`ExpenseStore::begin_fetch`] may
/// replace the cache; older tickets are discarded when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    month: Month,
    generation: u64,
}

impl FetchTicket {
    pub fn month(&self) -> Month {
        self.month
    }
}

/// Result of the gateway I/O for one month
#[derive(Debug, Clone, Default)]
pub struct FetchSnapshot {
    pub expenses: Vec<Expense>,
    pub cost_centers: Vec<String>,
}

/// In-memory cache of the current month
pub struct ExpenseStore<'a> {
    gateway: &'a dyn DataGateway,
    month: Month,
    expenses: Vec<Expense>,
    cost_centers: CostCenterSet,
    generation: u64,
    loading: bool,
    events: EventBus,
}

impl<'a> ExpenseStore<'a> {
    /// Create an empty store for `month`. Nothing is fetched until
    /// [`change_month`](Self::change_month) or [`refresh`](Self::refresh).
    pub fn new(gateway: &'a dyn DataGateway, month: Month, cost_centers: CostCenterSet) -> Self {
        Self {
            gateway,
            month,
            expenses: Vec::new(),
            cost_centers,
            generation: 0,
            loading: false,
            events: EventBus::new(),
        }
    }

    pub fn gateway(&self) -> &'a dyn DataGateway {
        self.gateway
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// Cached expenses, newest first
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn cost_centers(&self) -> &CostCenterSet {
        &self.cost_centers
    }

    /// Whether a fetch has begun and not yet been applied
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == *id)
    }

    /// Find a cached expense by a typed identifier fragment
    pub fn find_by_prefix(&self, fragment: &str) -> GastosResult<&Expense> {
        let matches: Vec<&Expense> = self
            .expenses
            .iter()
            .filter(|e| e.id.matches_prefix(fragment))
            .collect();

        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(GastosError::expense_not_found(fragment)),
            _ => Err(GastosError::Validation(format!(
                "'{}' matches {} expenses; use more characters",
                fragment,
                matches.len()
            ))),
        }
    }

    /// Receive store events
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // --- Month fetch ---

    /// Select `month` and start a fetch for it
    pub fn begin_fetch(&mut self, month: Month) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.month = month;
        self.events.publish(StoreEvent::MonthChanged(month));
        debug!(%month, generation = self.generation, "fetch started");

        FetchTicket {
            month,
            generation: self.generation,
        }
    }

    /// Gateway I/O for a ticket: expenses of the month with their receipt
    /// probes, plus every referenced cost center
    pub fn fetch(&self, ticket: &FetchTicket) -> GastosResult<FetchSnapshot> {
        let mut expenses = self
            .gateway
            .select_expenses(ticket.month.first_day(), ticket.month.last_day())?;

        for expense in &mut expenses {
            expense.has_receipt = self.probe(&expense.id);
        }

        let cost_centers = self.gateway.cost_centers().unwrap_or_else(|e| {
            warn!(error = %e, "failed to fetch cost centers");
            Vec::new()
        });

        Ok(FetchSnapshot {
            expenses,
            cost_centers,
        })
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `Ok(false)` when the ticket is stale and was discarded. On
    /// error the cache is left as it was.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: GastosResult<FetchSnapshot>,
    ) -> GastosResult<bool> {
        if ticket.generation != self.generation {
            debug!(
                month = %ticket.month,
                stale = ticket.generation,
                latest = self.generation,
                "discarding stale fetch"
            );
            return Ok(false);
        }
        self.loading = false;

        let snapshot = result.map_err(|e| {
            error!(month = %ticket.month, error = %e, "failed to fetch expenses");
            e
        })?;

        let observed: Vec<String> = snapshot
            .expenses
            .iter()
            .map(|e| e.cost_center.clone())
            .collect();
        let mut changed = self.cost_centers.merge(&snapshot.cost_centers);
        changed |= self.cost_centers.merge(&observed);

        let count = snapshot.expenses.len();
        self.expenses = snapshot.expenses;
        info!(month = %ticket.month, count, "expenses loaded");

        self.events.publish(StoreEvent::ExpensesLoaded {
            month: ticket.month,
            count,
        });
        if changed {
            self.events.publish(StoreEvent::CostCentersChanged);
        }
        Ok(true)
    }

    /// Select a month and load it
    pub fn change_month(&mut self, month: Month) -> GastosResult<()> {
        let ticket = self.begin_fetch(month);
        let result = self.fetch(&ticket);
        self.apply_fetch(ticket, result).map(|_| ())
    }

    /// Reload the current month
    pub fn refresh(&mut self) -> GastosResult<()> {
        self.change_month(self.month)
    }

    // --- Expense mutations ---

    /// Insert a new expense
    pub fn add_expense(&mut self, new: NewExpense) -> GastosResult<Expense> {
        new.validate()?;

        let expense = self.gateway.insert_expense(&new).map_err(|e| {
            error!(error = %e, "failed to add expense");
            e
        })?;
        info!(id = %expense.id, amount = %expense.amount, "expense added");

        if self.month.contains(expense.date) {
            self.expenses.push(expense.clone());
            self.expenses.sort_by(|a, b| b.date.cmp(&a.date));
        }
        if self.cost_centers.insert(&expense.cost_center) {
            self.events.publish(StoreEvent::CostCentersChanged);
        }
        self.events.publish(StoreEvent::ExpenseAdded(expense.id));

        Ok(expense)
    }

    /// Push an edited copy of an expense
    pub fn edit_expense(&mut self, expense: Expense) -> GastosResult<()> {
        expense.validate()?;

        self.gateway.update_expense(&expense).map_err(|e| {
            error!(id = %expense.id, error = %e, "failed to update expense");
            e
        })?;
        info!(id = %expense.id, "expense updated");

        if self.cost_centers.insert(&expense.cost_center) {
            self.events.publish(StoreEvent::CostCentersChanged);
        }
        let id = expense.id;
        if let Some(slot) = self.expenses.iter_mut().find(|e| e.id == id) {
            *slot = expense;
        }
        self.events.publish(StoreEvent::ExpenseUpdated(id));

        Ok(())
    }

    /// Delete an expense record
    pub fn delete_expense(&mut self, id: &ExpenseId) -> GastosResult<()> {
        self.gateway.delete_expense(id).map_err(|e| {
            error!(id = %id, error = %e, "failed to delete expense");
            e
        })?;
        info!(id = %id, "expense deleted");

        self.expenses.retain(|e| e.id != *id);
        self.events.publish(StoreEvent::ExpenseDeleted(*id));
        Ok(())
    }

    /// Add a user-entered cost center
    pub fn add_cost_center(&mut self, label: &str) -> GastosResult<String> {
        let label = self.cost_centers.add_new(label)?;
        self.events.publish(StoreEvent::CostCentersChanged);
        Ok(label)
    }

    // --- Receipts ---

    /// Upload a receipt for an expense
    pub fn upload_receipt(&mut self, id: &ExpenseId, image: &ReceiptImage) -> GastosResult<()> {
        let key = ReceiptKey::for_expense(id);
        self.gateway.upload_receipt(&key, image).map_err(|e| {
            error!(key = %key, error = %e, "failed to upload receipt");
            e
        })?;
        info!(key = %key, bytes = image.len(), "receipt uploaded");

        self.set_has_receipt(id, true);
        self.events.publish(StoreEvent::ReceiptChanged(*id));
        Ok(())
    }

    /// Public URL of an expense's receipt
    pub fn receipt_url(&self, id: &ExpenseId) -> GastosResult<String> {
        self.gateway.receipt_url(&ReceiptKey::for_expense(id))
    }

    /// Whether a receipt exists; probe failures count as absent
    pub fn probe_receipt(&self, id: &ExpenseId) -> bool {
        self.probe(id)
    }

    fn probe(&self, id: &ExpenseId) -> bool {
        match self.gateway.receipt_exists(&ReceiptKey::for_expense(id)) {
            Ok(exists) => exists,
            Err(e) => {
                warn!(id = %id, error = %e, "receipt probe failed");
                false
            }
        }
    }

    pub fn download_receipt(&self, id: &ExpenseId) -> GastosResult<Vec<u8>> {
        self.gateway.download_receipt(&ReceiptKey::for_expense(id))
    }

    /// Remove the receipt object of an expense
    pub fn delete_receipt(&mut self, id: &ExpenseId) -> GastosResult<()> {
        self.gateway.delete_receipt(&ReceiptKey::for_expense(id))?;
        self.set_has_receipt(id, false);
        self.events.publish(StoreEvent::ReceiptChanged(*id));
        Ok(())
    }

    /// Update the cached receipt flag of an expense
    pub fn set_has_receipt(&mut self, id: &ExpenseId, has_receipt: bool) {
        if let Some(expense) = self.expenses.iter_mut().find(|e| e.id == *id) {
            expense.has_receipt = has_receipt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::TestGateway;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn january() -> Month {
        Month::new(2025, 1).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn taxi() -> NewExpense {
        NewExpense::new("Taxi", Money::from_cents(1550), "600-500-140", date(2025, 1, 10))
            .with_ddi("DDI---")
    }

    #[test]
    fn test_change_month_loads_only_that_month() {
        let gateway = TestGateway::new();
        gateway.seed("Taxi", 1550, "600-500-140", date(2025, 1, 10));
        gateway.seed("Hotel", 90000, "700-100-100", date(2025, 1, 25));
        gateway.seed("Lunch", 4000, "600-600-300", date(2025, 2, 3));

        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        store.change_month(january()).unwrap();

        let descriptions: Vec<&str> = store
            .expenses()
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Hotel", "Taxi"]);
        assert!(store.cost_centers().contains("700-100-100"));
        assert!(!store.is_loading());
    }

    #[test]
    fn test_fetch_probes_receipts() {
        let gateway = TestGateway::new();
        let with = gateway.seed("Taxi", 1550, "600-500-140", date(2025, 1, 10));
        gateway.seed("Bus", 500, "600-500-140", date(2025, 1, 11));
        gateway.seed_receipt(&with.id);

        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        store.refresh().unwrap();

        assert!(store.get(&with.id).unwrap().has_receipt);
        assert_eq!(store.expenses().iter().filter(|e| e.has_receipt).count(), 1);
    }

    #[test]
    fn test_probe_failure_means_no_receipt() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(2025, 1, 10));
        gateway.seed_receipt(&expense.id);
        gateway.faults.list.set(true);

        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        store.refresh().unwrap();

        assert_eq!(store.expenses().len(), 1);
        assert!(!store.expenses()[0].has_receipt);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let gateway = TestGateway::new();
        gateway.seed("Taxi", 1550, "600-500-140", date(2025, 1, 10));
        gateway.seed("Lunch", 4000, "600-600-300", date(2025, 2, 3));

        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let first = store.begin_fetch(january());
        let second = store.begin_fetch(january().next());

        let first_result = store.fetch(&first);
        let second_result = store.fetch(&second);

        assert!(store.apply_fetch(second, second_result).unwrap());
        assert!(!store.apply_fetch(first, first_result).unwrap());

        assert_eq!(store.month(), january().next());
        assert_eq!(store.expenses().len(), 1);
        assert_eq!(store.expenses()[0].description, "Lunch");
    }

    #[test]
    fn test_failed_fetch_keeps_cache() {
        let gateway = TestGateway::new();
        gateway.seed("Taxi", 1550, "600-500-140", date(2025, 1, 10));

        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        store.refresh().unwrap();

        gateway.faults.select.set(true);
        let err = store.refresh().unwrap_err();
        assert!(err.is_backend());
        assert_eq!(store.expenses().len(), 1);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_add_expense() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let events = store.subscribe();

        let expense = store.add_expense(taxi()).unwrap();

        assert_eq!(store.expenses().len(), 1);
        assert_eq!(store.expenses()[0].amount, Money::from_cents(1550));
        assert_eq!(store.expenses()[0].ddi_code, "DDI---");
        assert_eq!(events.try_recv().unwrap(), StoreEvent::ExpenseAdded(expense.id));

        store.refresh().unwrap();
        assert_eq!(store.expenses().len(), 1);
    }

    #[test]
    fn test_add_expense_validation_issues_no_request() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());

        let mut invalid = taxi();
        invalid.description.clear();
        assert!(store.add_expense(invalid).unwrap_err().is_validation());

        store.refresh().unwrap();
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_add_expense_backend_failure_leaves_cache() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        gateway.faults.insert.set(true);

        let err = store.add_expense(taxi()).unwrap_err();
        assert!(err.is_backend());
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_add_expense_other_month_not_cached() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());

        let mut march = taxi();
        march.date = date(2025, 3, 1);
        store.add_expense(march).unwrap();

        assert!(store.expenses().is_empty());
        store.change_month(Month::new(2025, 3).unwrap()).unwrap();
        assert_eq!(store.expenses().len(), 1);
    }

    #[test]
    fn test_delete_expense() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let expense = store.add_expense(taxi()).unwrap();

        store.delete_expense(&expense.id).unwrap();
        assert!(store.expenses().is_empty());

        store.refresh().unwrap();
        assert!(store.get(&expense.id).is_none());
    }

    #[test]
    fn test_edit_failure_leaves_cache() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let expense = store.add_expense(taxi()).unwrap();

        gateway.faults.update.set(true);
        let mut edited = expense.clone();
        edited.description = "Uber".into();
        assert!(store.edit_expense(edited).is_err());
        assert_eq!(store.get(&expense.id).unwrap().description, "Taxi");

        gateway.faults.update.set(false);
        let mut edited = expense.clone();
        edited.description = "Uber".into();
        store.edit_expense(edited).unwrap();
        assert_eq!(store.get(&expense.id).unwrap().description, "Uber");
    }

    #[test]
    fn test_add_cost_center() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let events = store.subscribe();

        assert_eq!(store.add_cost_center(" 900-100-100 ").unwrap(), "900-100-100");
        assert_eq!(events.try_recv().unwrap(), StoreEvent::CostCentersChanged);
        assert!(store.add_cost_center("").unwrap_err().is_validation());
        assert!(store.add_cost_center("600-500-140").is_err());
    }

    #[test]
    fn test_find_by_prefix() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let expense = store.add_expense(taxi()).unwrap();

        let found = store.find_by_prefix(&expense.id.to_string()).unwrap();
        assert_eq!(found.id, expense.id);
        assert!(store.find_by_prefix("zzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_receipt_upload_and_delete() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let expense = store.add_expense(taxi()).unwrap();
        let image = ReceiptImage::from_bytes(vec![0xFF, 0xD8, 0x00]).unwrap();

        store.upload_receipt(&expense.id, &image).unwrap();
        assert!(store.get(&expense.id).unwrap().has_receipt);
        assert!(store.probe_receipt(&expense.id));
        assert_eq!(store.download_receipt(&expense.id).unwrap(), vec![0xFF, 0xD8, 0x00]);

        store.delete_receipt(&expense.id).unwrap();
        assert!(!store.get(&expense.id).unwrap().has_receipt);
        assert!(!store.probe_receipt(&expense.id));
    }
}
