//! Expense list controller
//!
//! Filtering by cost center, delete with confirmation, editing through a
//! draft copy, and the details view with its receipt state machine.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::store::ExpenseStore;
use crate::error::{GastosError, GastosResult};
use crate::models::expense::{parse_amount, parse_date, INPUT_DATE_FORMAT};
use crate::models::receipt::download_file_name;
use crate::models::{Expense, ExpenseId, ExpenseValidationError};

/// Which cost centers the list shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CostCenterFilter {
    #[default]
    All,
    Only(String),
}

impl CostCenterFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => expense.cost_center == *label,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Only(label) => label,
        }
    }
}

/// Distinct cost centers of the given expenses, in first-seen order
pub fn filter_options(expenses: &[Expense]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for expense in expenses {
        if !options.contains(&expense.cost_center) {
            options.push(expense.cost_center.clone());
        }
    }
    options
}

/// Editable fields of the edit dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Description,
    CostCenter,
    Amount,
    Date,
    DdiCode,
}

impl EditField {
    const ORDER: [EditField; 5] = [
        EditField::Description,
        EditField::CostCenter,
        EditField::Amount,
        EditField::Date,
        EditField::DdiCode,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Working copy of an expense being edited
#[derive(Debug, Clone)]
pub struct EditDraft {
    original: Expense,
    pub description: String,
    pub cost_center: String,
    pub amount: String,
    pub date: String,
    pub ddi_code: String,
    pub focus: EditField,
    pub error: Option<String>,
}

impl EditDraft {
    pub fn new(expense: &Expense) -> Self {
        Self {
            original: expense.clone(),
            description: expense.description.clone(),
            cost_center: expense.cost_center.clone(),
            amount: expense.amount.to_plain_string(),
            date: expense.date.format(INPUT_DATE_FORMAT).to_string(),
            ddi_code: expense.ddi_code.clone(),
            focus: EditField::Description,
            error: None,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.original.id
    }

    fn field_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::Description => &mut self.description,
            EditField::CostCenter => &mut self.cost_center,
            EditField::Amount => &mut self.amount,
            EditField::Date => &mut self.date,
            EditField::DdiCode => &mut self.ddi_code,
        }
    }

    pub fn value(&self, field: EditField) -> &str {
        match field {
            EditField::Description => &self.description,
            EditField::CostCenter => &self.cost_center,
            EditField::Amount => &self.amount,
            EditField::Date => &self.date,
            EditField::DdiCode => &self.ddi_code,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == EditField::Amount && !(c.is_ascii_digit() || c == '.') {
            return;
        }
        let focus = self.focus;
        self.field_mut(focus).push(c);
    }

    pub fn pop_char(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    /// Apply the draft to a copy of the original expense
    pub fn to_expense(&self) -> Result<Expense, ExpenseValidationError> {
        let date = parse_date(&self.date)?;
        let amount = parse_amount(&self.amount)?;

        let mut expense = self.original.clone();
        expense.description = self.description.trim().to_string();
        expense.cost_center = self.cost_center.trim().to_string();
        expense.amount = amount;
        expense.date = date;
        expense.ddi_code = self.ddi_code.trim().to_string();
        expense.validate()?;
        Ok(expense)
    }
}

/// Receipt area of the details view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptView {
    Loading,
    Ready(String),
    NoReceipt,
    Error(String),
}

/// Details dialog state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailsState {
    #[default]
    Closed,
    Open {
        expense: Expense,
        receipt: ReceiptView,
    },
}

/// List-side UI state over the store's cache
#[derive(Debug, Default)]
pub struct ExpenseList {
    filter: CostCenterFilter,
    pending_delete: Option<ExpenseId>,
    edit: Option<EditDraft>,
    details: DetailsState,
}

impl ExpenseList {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Filter ---

    pub fn filter(&self) -> &CostCenterFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: CostCenterFilter) {
        self.filter = filter;
    }

    /// Step through All and each cost center present in `expenses`
    pub fn cycle_filter(&mut self, expenses: &[Expense]) {
        let options = filter_options(expenses);
        self.filter = match &self.filter {
            CostCenterFilter::All => options
                .first()
                .cloned()
                .map(CostCenterFilter::Only)
                .unwrap_or_default(),
            CostCenterFilter::Only(current) => options
                .iter()
                .position(|o| o == current)
                .and_then(|i| options.get(i + 1))
                .cloned()
                .map(CostCenterFilter::Only)
                .unwrap_or_default(),
        };
    }

    /// Expenses passing the filter, in cache order
    pub fn visible<'e>(&self, expenses: &'e [Expense]) -> Vec<&'e Expense> {
        expenses.iter().filter(|e| self.filter.matches(e)).collect()
    }

    // --- Delete ---

    pub fn request_delete(&mut self, id: ExpenseId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<ExpenseId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending expense and its receipt.
    ///
    /// The receipt delete and the record delete are independent; a failed
    /// receipt delete is logged and ignored. Returns the deleted id, or None
    /// when nothing was pending.
    pub fn confirm_delete(
        &mut self,
        store: &mut ExpenseStore<'_>,
    ) -> GastosResult<Option<ExpenseId>> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        if let Err(e) = store.delete_receipt(&id) {
            warn!(id = %id, error = %e, "failed to delete receipt");
        }
        store.delete_expense(&id)?;

        if matches!(&self.details, DetailsState::Open { expense, .. } if expense.id == id) {
            self.details = DetailsState::Closed;
        }
        Ok(Some(id))
    }

    // --- Edit ---

    pub fn begin_edit(&mut self, expense: &Expense) {
        self.edit = Some(EditDraft::new(expense));
    }

    pub fn edit(&self) -> Option<&EditDraft> {
        self.edit.as_ref()
    }

    pub fn edit_mut(&mut self) -> Option<&mut EditDraft> {
        self.edit.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Validate and push the draft. The dialog closes on success and keeps
    /// the error otherwise.
    pub fn save_edit(&mut self, store: &mut ExpenseStore<'_>) -> GastosResult<Expense> {
        let draft = self
            .edit
            .as_mut()
            .ok_or_else(|| GastosError::Validation("No expense is being edited".into()))?;

        let expense = match draft.to_expense() {
            Ok(expense) => expense,
            Err(e) => {
                draft.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = store.edit_expense(expense.clone()) {
            draft.error = Some(e.user_summary());
            return Err(e);
        }

        self.edit = None;
        Ok(expense)
    }

    // --- Details ---

    pub fn details(&self) -> &DetailsState {
        &self.details
    }

    /// Open the details view. An expense without a receipt goes straight
    /// to `NoReceipt`; otherwise the receipt starts loading.
    pub fn view_details(&mut self, expense: &Expense) {
        let receipt = if expense.has_receipt {
            ReceiptView::Loading
        } else {
            ReceiptView::NoReceipt
        };
        self.details = DetailsState::Open {
            expense: expense.clone(),
            receipt,
        };
    }

    /// Whether the details view is waiting on its receipt
    pub fn details_loading(&self) -> bool {
        matches!(
            self.details,
            DetailsState::Open {
                receipt: ReceiptView::Loading,
                ..
            }
        )
    }

    /// Resolve a loading receipt: URL first, then an existence probe
    pub fn resolve_details(&mut self, store: &ExpenseStore<'_>) {
        let DetailsState::Open { expense, receipt } = &mut self.details else {
            return;
        };
        if *receipt != ReceiptView::Loading {
            return;
        }

        *receipt = match store.receipt_url(&expense.id) {
            Err(e) => {
                warn!(id = %expense.id, error = %e, "failed to resolve receipt URL");
                ReceiptView::Error(e.user_summary())
            }
            Ok(url) => {
                if store.probe_receipt(&expense.id) {
                    ReceiptView::Ready(url)
                } else {
                    ReceiptView::NoReceipt
                }
            }
        };
    }

    pub fn close_details(&mut self) {
        self.details = DetailsState::Closed;
    }

    /// Save the displayed receipt to `target`, or to `<description>.jpg`
    /// in `dir` when no target is given
    pub fn save_receipt(
        &self,
        store: &ExpenseStore<'_>,
        dir: &Path,
        target: Option<PathBuf>,
    ) -> GastosResult<PathBuf> {
        let DetailsState::Open {
            expense,
            receipt: ReceiptView::Ready(_),
        } = &self.details
        else {
            return Err(GastosError::Receipt("No receipt to save".into()));
        };

        let path = target.unwrap_or_else(|| dir.join(download_file_name(&expense.description)));
        save_receipt_to(store, &expense.id, &path)?;
        Ok(path)
    }
}

/// Download an expense's receipt and write it to `path`
pub fn save_receipt_to(
    store: &ExpenseStore<'_>,
    id: &ExpenseId,
    path: &Path,
) -> GastosResult<()> {
    let bytes = store.download_receipt(id)?;
    std::fs::write(path, &bytes)
        .map_err(|e| GastosError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    info!(id = %id, path = %path.display(), "receipt saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::TestGateway;
    use crate::models::{CostCenterSet, Money, Month};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn january() -> Month {
        Month::new(2025, 1).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn loaded(gateway: &TestGateway) -> ExpenseStore<'_> {
        let mut store = ExpenseStore::new(gateway, january(), CostCenterSet::default());
        store.refresh().unwrap();
        store
    }

    #[test]
    fn test_filter() {
        let gateway = TestGateway::new();
        gateway.seed("Taxi", 1550, "600-500-140", date(10));
        gateway.seed("Lunch", 4000, "600-600-300", date(12));
        gateway.seed("Bus", 500, "600-500-140", date(14));
        let store = loaded(&gateway);
        let mut list = ExpenseList::new();

        assert_eq!(list.visible(store.expenses()).len(), 3);
        assert_eq!(
            filter_options(store.expenses()),
            vec!["600-500-140".to_string(), "600-600-300".to_string()]
        );

        list.set_filter(CostCenterFilter::Only("600-500-140".into()));
        let visible = list.visible(store.expenses());
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|e| e.cost_center == "600-500-140"));
        assert_eq!(visible[0].description, "Bus");

        list.set_filter(CostCenterFilter::All);
        assert_eq!(list.visible(store.expenses()).len(), 3);
    }

    #[test]
    fn test_cycle_filter() {
        let gateway = TestGateway::new();
        gateway.seed("Taxi", 1550, "600-500-140", date(10));
        gateway.seed("Lunch", 4000, "600-600-300", date(12));
        let store = loaded(&gateway);
        let mut list = ExpenseList::new();

        list.cycle_filter(store.expenses());
        assert_eq!(list.filter(), &CostCenterFilter::Only("600-600-300".into()));
        list.cycle_filter(store.expenses());
        assert_eq!(list.filter(), &CostCenterFilter::Only("600-500-140".into()));
        list.cycle_filter(store.expenses());
        assert_eq!(list.filter(), &CostCenterFilter::All);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        gateway.seed_receipt(&expense.id);
        let mut store = loaded(&gateway);
        let mut list = ExpenseList::new();

        list.request_delete(expense.id);
        list.cancel_delete();
        assert_eq!(list.confirm_delete(&mut store).unwrap(), None);
        assert_eq!(store.expenses().len(), 1);

        list.request_delete(expense.id);
        assert_eq!(list.confirm_delete(&mut store).unwrap(), Some(expense.id));
        assert!(store.expenses().is_empty());
        assert!(!store.probe_receipt(&expense.id));

        store.refresh().unwrap();
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_delete_survives_receipt_failure() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        let mut store = loaded(&gateway);
        let mut list = ExpenseList::new();
        gateway.faults.delete_receipt.set(true);

        list.request_delete(expense.id);
        list.confirm_delete(&mut store).unwrap();
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_delete_failure_keeps_cache() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        let mut store = loaded(&gateway);
        let mut list = ExpenseList::new();
        gateway.faults.delete.set(true);

        list.request_delete(expense.id);
        assert!(list.confirm_delete(&mut store).is_err());
        assert_eq!(store.expenses().len(), 1);
    }

    #[test]
    fn test_edit_invalid_date_rejected() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        let mut store = loaded(&gateway);
        let mut list = ExpenseList::new();

        list.begin_edit(&expense);
        {
            let draft = list.edit_mut().unwrap();
            assert_eq!(draft.amount, "15.50");
            assert_eq!(draft.date, "2025-01-10");
            draft.date = "2025-13-45".into();
            draft.description = "Changed".into();
        }

        assert!(list.save_edit(&mut store).unwrap_err().is_validation());
        assert!(list.edit().unwrap().error.is_some());

        store.refresh().unwrap();
        assert_eq!(store.expenses()[0].description, "Taxi");
    }

    #[test]
    fn test_edit_saves_copy() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        let mut store = loaded(&gateway);
        let mut list = ExpenseList::new();

        list.begin_edit(&expense);
        {
            let draft = list.edit_mut().unwrap();
            draft.focus = EditField::Amount;
            draft.push_char('x');
            draft.pop_char();
            draft.push_char('0');
            draft.description = "Taxi to airport".into();
            draft.ddi_code = "DDI-1-2-3".into();
        }
        assert_eq!(store.expenses()[0].description, "Taxi");

        let saved = list.save_edit(&mut store).unwrap();
        assert!(list.edit().is_none());
        assert_eq!(saved.amount, Money::from_cents(1550));
        assert_eq!(store.expenses()[0].description, "Taxi to airport");

        store.refresh().unwrap();
        assert_eq!(store.expenses()[0].ddi_code, "DDI-1-2-3");
    }

    #[test]
    fn test_edit_backend_failure_keeps_dialog() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        let mut store = loaded(&gateway);
        let mut list = ExpenseList::new();
        gateway.faults.update.set(true);

        list.begin_edit(&expense);
        list.edit_mut().unwrap().description = "Uber".into();
        assert!(list.save_edit(&mut store).is_err());
        assert!(list.edit().is_some());
        assert_eq!(store.expenses()[0].description, "Taxi");
    }

    #[test]
    fn test_details_without_receipt_skips_fetch() {
        let gateway = TestGateway::new();
        gateway.seed("Taxi", 1550, "600-500-140", date(10));
        let store = loaded(&gateway);
        let mut list = ExpenseList::new();
        let lists_before = gateway.list_calls.get();

        list.view_details(&store.expenses()[0]);
        assert!(!list.details_loading());
        list.resolve_details(&store);

        assert!(matches!(
            list.details(),
            DetailsState::Open {
                receipt: ReceiptView::NoReceipt,
                ..
            }
        ));
        assert_eq!(gateway.url_calls.get(), 0);
        assert_eq!(gateway.list_calls.get(), lists_before);

        list.close_details();
        assert_eq!(list.details(), &DetailsState::Closed);
    }

    #[test]
    fn test_details_with_receipt() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        gateway.seed_receipt(&expense.id);
        let store = loaded(&gateway);
        let mut list = ExpenseList::new();

        list.view_details(store.get(&expense.id).unwrap());
        assert!(list.details_loading());
        list.resolve_details(&store);

        match list.details() {
            DetailsState::Open {
                receipt: ReceiptView::Ready(url),
                ..
            } => assert!(url.ends_with(&format!("receipt-{}.jpg", expense.id.as_uuid()))),
            other => panic!("unexpected state {:?}", other),
        }

        let temp_dir = TempDir::new().unwrap();
        let path = list.save_receipt(&store, temp_dir.path(), None).unwrap();
        assert_eq!(path, temp_dir.path().join("Taxi.jpg"));
        assert!(path.exists());
    }

    #[test]
    fn test_details_url_failure_is_error() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        gateway.seed_receipt(&expense.id);
        let store = loaded(&gateway);
        let mut list = ExpenseList::new();
        gateway.faults.url.set(true);

        list.view_details(store.get(&expense.id).unwrap());
        list.resolve_details(&store);
        assert!(matches!(
            list.details(),
            DetailsState::Open {
                receipt: ReceiptView::Error(_),
                ..
            }
        ));
    }

    #[test]
    fn test_details_probe_failure_is_no_receipt() {
        let gateway = TestGateway::new();
        let expense = gateway.seed("Taxi", 1550, "600-500-140", date(10));
        gateway.seed_receipt(&expense.id);
        let store = loaded(&gateway);
        let mut list = ExpenseList::new();
        gateway.faults.list.set(true);

        list.view_details(store.get(&expense.id).unwrap());
        list.resolve_details(&store);
        assert!(matches!(
            list.details(),
            DetailsState::Open {
                receipt: ReceiptView::NoReceipt,
                ..
            }
        ));
        assert!(list.save_receipt(&store, Path::new("."), None).is_err());
    }
}
