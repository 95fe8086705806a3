//! New-expense form controller
//!
//! Holds the raw field input, filters it as it is typed, validates it into
//! a [`NewExpense`] and submits it through the store. The optional receipt
//! is handed to [`ExpenseForm::submit`] directly.

use chrono::NaiveDate;
use tracing::warn;

use super::budget::BudgetService;
use super::notice::Notice;
use super::store::ExpenseStore;
use crate::error::GastosResult;
use crate::models::ddi::SEGMENT_WIDTHS;
use crate::models::expense::{parse_amount, parse_date, INPUT_DATE_FORMAT};
use crate::models::{DdiCode, Expense, ExpenseValidationError, NewExpense, ReceiptImage};

/// Focusable fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    CostCenter,
    Amount,
    Date,
    Ddi(usize),
}

impl FormField {
    const ORDER: [FormField; 7] = [
        FormField::Description,
        FormField::CostCenter,
        FormField::Amount,
        FormField::Date,
        FormField::Ddi(0),
        FormField::Ddi(1),
        FormField::Ddi(2),
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::CostCenter => "Cost center",
            Self::Amount => "Amount",
            Self::Date => "Date",
            Self::Ddi(_) => "DDI code",
        }
    }
}

/// What happened to the receipt during a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptUpload {
    NotProvided,
    Uploaded,
    Failed(String),
}

/// Result of a successful insert
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub expense: Expense,
    pub receipt: ReceiptUpload,
}

impl SubmitOutcome {
    pub fn notice(&self) -> Notice {
        match &self.receipt {
            ReceiptUpload::Failed(_) => Notice::warning(
                "Warning",
                "The expense was saved but the receipt could not be uploaded",
            ),
            _ => Notice::success("Expense added", "The expense was saved"),
        }
    }
}

/// Accept partial amount input: digits with at most one decimal point
pub fn is_amount_input(input: &str) -> bool {
    input.chars().all(|c| c.is_ascii_digit() || c == '.')
        && input.chars().filter(|c| *c == '.').count() <= 1
}

/// Input state of the new-expense form
#[derive(Debug, Clone)]
pub struct ExpenseForm {
    pub description: String,
    pub cost_center: String,
    amount: String,
    pub date: String,
    ddi: DdiCode,
    focus: FormField,
    today: NaiveDate,
}

impl ExpenseForm {
    /// Empty form with the date set to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            description: String::new(),
            cost_center: String::new(),
            amount: String::new(),
            date: today.format(INPUT_DATE_FORMAT).to_string(),
            ddi: DdiCode::new(),
            focus: FormField::Description,
            today,
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn set_focus(&mut self, field: FormField) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Replace the amount input. Non-numeric input is refused and leaves
    /// the field unchanged.
    pub fn set_amount(&mut self, input: &str) -> bool {
        if !is_amount_input(input) {
            return false;
        }
        self.amount = input.to_string();
        true
    }

    pub fn ddi(&self) -> &DdiCode {
        &self.ddi
    }

    /// Replace one DDI segment. Non-digits are dropped and the segment is
    /// capped at its width; a full segment moves focus to the next one.
    pub fn set_ddi_segment(&mut self, index: usize, input: &str) {
        let full = self.ddi.set_segment(index, input);
        if full && index + 1 < SEGMENT_WIDTHS.len() {
            self.focus = FormField::Ddi(index + 1);
        }
    }

    /// Current text of a field, for rendering and editing
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Description => &self.description,
            FormField::CostCenter => &self.cost_center,
            FormField::Amount => &self.amount,
            FormField::Date => &self.date,
            FormField::Ddi(i) => self.ddi.segment(i),
        }
    }

    /// Replace the text of a field with its input filtering applied
    pub fn set_value(&mut self, field: FormField, input: &str) {
        match field {
            FormField::Description => self.description = input.to_string(),
            FormField::CostCenter => self.cost_center = input.to_string(),
            FormField::Amount => {
                self.set_amount(input);
            }
            FormField::Date => self.date = input.to_string(),
            FormField::Ddi(i) => self.set_ddi_segment(i, input),
        }
    }

    /// Type one character into the focused field
    pub fn push_char(&mut self, c: char) {
        let field = self.focus;
        let mut value = self.value(field).to_string();
        value.push(c);
        self.set_value(field, &value);
    }

    /// Delete the last character of the focused field
    pub fn pop_char(&mut self) {
        let field = self.focus;
        let mut value = self.value(field).to_string();
        value.pop();
        self.set_value(field, &value);
    }

    /// Validate the input into an expense ready to insert
    pub fn validate(&self) -> Result<NewExpense, ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::MissingDescription);
        }
        if self.cost_center.trim().is_empty() {
            return Err(ExpenseValidationError::MissingCostCenter);
        }
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.date)?;

        Ok(NewExpense::new(
            self.description.trim(),
            amount,
            self.cost_center.trim(),
            date,
        )
        .with_ddi(self.ddi.to_string()))
    }

    /// Insert the expense, then upload the receipt if one was given.
    ///
    /// Validation and budget-gate failures issue no request. A failed
    /// upload keeps the inserted record and is reported in the outcome.
    /// The form is cleared after a successful insert.
    pub fn submit(
        &mut self,
        store: &mut ExpenseStore<'_>,
        receipt: Option<ReceiptImage>,
    ) -> GastosResult<SubmitOutcome> {
        let new = self.validate()?;
        BudgetService::new(store.gateway()).ensure_entry_open(store.month())?;

        let expense = store.add_expense(new)?;

        let receipt = match receipt {
            None => ReceiptUpload::NotProvided,
            Some(image) => match store.upload_receipt(&expense.id, &image) {
                Ok(()) => ReceiptUpload::Uploaded,
                Err(e) => {
                    warn!(id = %expense.id, error = %e, "expense saved without its receipt");
                    ReceiptUpload::Failed(e.user_summary())
                }
            },
        };

        self.reset();
        Ok(SubmitOutcome { expense, receipt })
    }

    /// Clear every field; the date returns to today
    pub fn reset(&mut self) {
        *self = Self::new(self.today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::TestGateway;
    use crate::models::{CostCenterSet, Money, Month};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn january() -> Month {
        Month::new(2025, 1).unwrap()
    }

    fn filled() -> ExpenseForm {
        let mut form = ExpenseForm::new(today());
        form.description = "Taxi".into();
        form.cost_center = "600-500-140".into();
        assert!(form.set_amount("15.50"));
        form
    }

    fn jpeg() -> ReceiptImage {
        ReceiptImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xD9]).unwrap()
    }

    #[test]
    fn test_amount_rejects_non_numeric_input() {
        let mut form = ExpenseForm::new(today());
        assert!(form.set_amount("12"));
        assert!(!form.set_amount("12a"));
        assert!(!form.set_amount("-12"));
        assert!(!form.set_amount("1.2.3"));
        assert_eq!(form.amount(), "12");

        form.set_focus(FormField::Amount);
        form.push_char('x');
        form.push_char('.');
        form.push_char('5');
        assert_eq!(form.amount(), "12.5");
    }

    #[test]
    fn test_ddi_auto_advance() {
        let mut form = ExpenseForm::new(today());
        form.set_focus(FormField::Ddi(0));
        for c in "12a3".chars() {
            form.push_char(c);
        }
        assert_eq!(form.ddi().segment(0), "123");
        assert_eq!(form.focus(), FormField::Ddi(1));

        for c in "4567".chars() {
            form.push_char(c);
        }
        assert_eq!(form.ddi().segment(1), "456");
        assert_eq!(form.focus(), FormField::Ddi(2));
        form.push_char('7');

        form.set_ddi_segment(2, "789");
        assert_eq!(form.focus(), FormField::Ddi(2));
        assert_eq!(form.ddi().to_string(), "DDI-123-456-789");
    }

    #[test]
    fn test_validate_requires_fields() {
        let mut form = filled();
        form.description.clear();
        assert_eq!(
            form.validate(),
            Err(ExpenseValidationError::MissingDescription)
        );

        let mut form = filled();
        form.cost_center = " ".into();
        assert_eq!(
            form.validate(),
            Err(ExpenseValidationError::MissingCostCenter)
        );

        let mut form = filled();
        form.set_amount("");
        assert_eq!(form.validate(), Err(ExpenseValidationError::MissingAmount));

        let mut form = filled();
        form.date = "15/01/2025".into();
        assert!(matches!(
            form.validate(),
            Err(ExpenseValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_submit_taxi_without_receipt() {
        let gateway = TestGateway::new();
        gateway.open_month(january(), 100_000);
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let mut form = filled();

        let outcome = form.submit(&mut store, None).unwrap();

        assert_eq!(outcome.receipt, ReceiptUpload::NotProvided);
        assert_eq!(store.expenses().len(), 1);
        let expense = &store.expenses()[0];
        assert_eq!(expense.description, "Taxi");
        assert_eq!(expense.cost_center, "600-500-140");
        assert_eq!(expense.amount.to_string(), "₡15.50");
        assert_eq!(expense.ddi_code, "DDI---");
        assert!(!expense.has_receipt);

        assert!(form.description.is_empty());
        assert!(form.amount().is_empty());
        assert_eq!(form.date, "2025-01-15");
    }

    #[test]
    fn test_submit_invalid_issues_no_request() {
        let gateway = TestGateway::new();
        gateway.open_month(january(), 100_000);
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let mut form = filled();
        form.cost_center.clear();

        let err = form.submit(&mut store, None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(form.description, "Taxi");

        store.refresh().unwrap();
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_submit_refused_without_budget() {
        let gateway = TestGateway::new();
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let mut form = filled();

        assert!(form.submit(&mut store, None).is_err());
        store.refresh().unwrap();
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_submit_with_receipt() {
        let gateway = TestGateway::new();
        gateway.open_month(january(), 100_000);
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let mut form = filled();

        let outcome = form.submit(&mut store, Some(jpeg())).unwrap();

        assert_eq!(outcome.receipt, ReceiptUpload::Uploaded);
        assert!(store.get(&outcome.expense.id).unwrap().has_receipt);
    }

    #[test]
    fn test_upload_failure_keeps_record() {
        let gateway = TestGateway::new();
        gateway.open_month(january(), 100_000);
        gateway.faults.upload.set(true);
        let mut store = ExpenseStore::new(&gateway, january(), CostCenterSet::default());
        let mut form = filled();

        let outcome = form.submit(&mut store, Some(jpeg())).unwrap();

        assert!(matches!(outcome.receipt, ReceiptUpload::Failed(_)));
        assert_eq!(outcome.notice().kind, crate::services::NoticeKind::Warning);

        store.refresh().unwrap();
        assert_eq!(store.expenses().len(), 1);
        assert_eq!(store.expenses()[0].amount, Money::from_cents(1550));
        assert!(!store.expenses()[0].has_receipt);
    }
}
