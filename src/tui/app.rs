//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! Gateway calls that would block the first frame (month fetches and
//! receipt probes) are queued here and run on the next tick.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use chrono::Local;

use crate::config::{GastosPaths, Settings};
use crate::display::DisplayOptions;
use crate::error::GastosError;
use crate::gateway::DataGateway;
use crate::models::{BudgetGate, CostCenterSet, Expense, Money, Month, ReceiptImage};
use crate::services::{
    BudgetService, ExpenseForm, ExpenseList, ExpenseStore, FetchTicket, FormField, MonthMetrics,
    Notice, StoreEvent,
};

use super::widgets::NotificationQueue;

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    AddExpense,
    EditExpense,
    Details,
    ConfirmDelete,
    /// Opened from the add form; returns to it when closed
    NewCostCenter,
    SetBudget,
    Help,
}

/// Main application state
pub struct App<'a> {
    pub settings: &'a Settings,
    pub paths: &'a GastosPaths,

    /// Cached month and cost centers
    pub store: ExpenseStore<'a>,

    pub budget: BudgetService<'a>,

    /// Entry gate of the selected month
    pub gate: BudgetGate,

    /// New-expense form
    pub form: ExpenseForm,

    /// Receipt file typed into the add form
    pub receipt_path: String,

    /// Whether the receipt field has focus instead of a form field
    pub receipt_focused: bool,

    /// Validation message shown inside the add form
    pub form_error: Option<String>,

    /// Filter, edit, delete and details state
    pub list: ExpenseList,

    /// Selected row among the visible expenses
    pub selected_index: usize,

    pub active_dialog: ActiveDialog,

    /// Input of the single-field dialogs (cost center, budget)
    pub text_input: String,

    /// Error shown inside the single-field dialogs
    pub dialog_error: Option<String>,

    pub notifications: NotificationQueue,

    pub options: DisplayOptions,

    pub should_quit: bool,

    pending_fetch: Option<FetchTicket>,
    events: Receiver<StoreEvent>,
}

impl<'a> App<'a> {
    /// Create a new App for the current month. Nothing is loaded yet.
    pub fn new(gateway: &'a dyn DataGateway, settings: &'a Settings, paths: &'a GastosPaths) -> Self {
        let store = ExpenseStore::new(
            gateway,
            Month::current(),
            CostCenterSet::with_defaults(&settings.default_cost_centers),
        );
        let events = store.subscribe();

        Self {
            settings,
            paths,
            store,
            budget: BudgetService::new(gateway),
            gate: BudgetGate::Unset,
            form: ExpenseForm::new(Local::now().date_naive()),
            receipt_path: String::new(),
            receipt_focused: false,
            form_error: None,
            list: ExpenseList::new(),
            selected_index: 0,
            active_dialog: ActiveDialog::default(),
            text_input: String::new(),
            dialog_error: None,
            notifications: NotificationQueue::new(),
            options: DisplayOptions::from_settings(settings),
            should_quit: false,
            pending_fetch: None,
            events,
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notifications.push(notice);
    }

    fn notify_error(&mut self, title: &str, err: &GastosError) {
        self.notify(Notice::from_error(title, err));
    }

    // --- Month ---

    /// Select a month; its fetch runs on the next tick. A newer selection
    /// replaces a fetch that has not run yet.
    pub fn load_month(&mut self, month: Month) {
        self.pending_fetch = Some(self.store.begin_fetch(month));
    }

    pub fn prev_month(&mut self) {
        self.load_month(self.store.month().prev());
    }

    pub fn next_month(&mut self) {
        self.load_month(self.store.month().next());
    }

    /// Run deferred gateway work and process store events
    pub fn on_tick(&mut self) {
        if let Some(ticket) = self.pending_fetch.take() {
            let result = self.store.fetch(&ticket);
            if let Err(e) = self.store.apply_fetch(ticket, result) {
                self.notify_error("Could not load expenses", &e);
            }
            self.refresh_gate();
        }

        if self.list.details_loading() {
            self.list.resolve_details(&self.store);
        }

        self.drain_events();
        self.notifications.remove_expired();
    }

    fn refresh_gate(&mut self) {
        match self.budget.gate(self.store.month()) {
            Ok(gate) => self.gate = gate,
            Err(e) => self.notify_error("Could not load budget", &e),
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                StoreEvent::MonthChanged(_) => self.selected_index = 0,
                StoreEvent::ExpensesLoaded { .. } | StoreEvent::ExpenseDeleted(_) => {
                    self.clamp_selection()
                }
                _ => {}
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn metrics(&self) -> MonthMetrics {
        MonthMetrics::compute(self.store.month(), self.store.expenses(), self.gate)
    }

    // --- Selection ---

    /// Expenses passing the current filter
    pub fn visible(&self) -> Vec<&Expense> {
        self.list.visible(self.store.expenses())
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.visible().get(self.selected_index).copied()
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let count = self.visible().len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    pub fn cycle_filter(&mut self) {
        self.list.cycle_filter(self.store.expenses());
        self.selected_index = 0;
    }

    // --- Dialogs ---

    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    /// Whether the expense list and form are available. Without an open
    /// budget the month shows metrics only.
    pub fn list_open(&self) -> bool {
        self.gate.allows_entry()
    }

    /// Open a dialog, preparing its state
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        let needs_list = matches!(
            dialog,
            ActiveDialog::AddExpense
                | ActiveDialog::EditExpense
                | ActiveDialog::Details
                | ActiveDialog::ConfirmDelete
        );
        if needs_list && !self.list_open() {
            self.notify(Notice::warning(
                "Budget required",
                "Set a budget for this month to work with expenses (b)",
            ));
            return;
        }

        match dialog {
            ActiveDialog::AddExpense => {
                self.form_error = None;
                self.receipt_focused = false;
                if self.form.cost_center.is_empty() {
                    if let Some(first) = self.store.cost_centers().iter().next() {
                        self.form.cost_center = first.to_string();
                    }
                }
            }
            ActiveDialog::EditExpense => {
                let Some(expense) = self.selected_expense().cloned() else {
                    return;
                };
                self.list.begin_edit(&expense);
            }
            ActiveDialog::Details => {
                let Some(expense) = self.selected_expense().cloned() else {
                    return;
                };
                self.list.view_details(&expense);
            }
            ActiveDialog::ConfirmDelete => {
                let Some(id) = self.selected_expense().map(|e| e.id) else {
                    return;
                };
                self.list.request_delete(id);
            }
            ActiveDialog::NewCostCenter => {
                self.text_input.clear();
                self.dialog_error = None;
            }
            ActiveDialog::SetBudget => {
                let amount = self.gate.amount();
                self.text_input = if amount.is_zero() {
                    String::new()
                } else {
                    amount.to_plain_string()
                };
                self.dialog_error = None;
            }
            ActiveDialog::Help | ActiveDialog::None => {}
        }
        self.active_dialog = dialog;
    }

    /// Close the current dialog, discarding its pending state
    pub fn close_dialog(&mut self) {
        match self.active_dialog {
            ActiveDialog::EditExpense => self.list.cancel_edit(),
            ActiveDialog::Details => self.list.close_details(),
            ActiveDialog::ConfirmDelete => self.list.cancel_delete(),
            ActiveDialog::NewCostCenter => {
                self.active_dialog = ActiveDialog::AddExpense;
                return;
            }
            _ => {}
        }
        self.active_dialog = ActiveDialog::None;
    }

    // --- Add form ---

    /// Tab order: the form fields, then the receipt path
    pub fn form_focus_next(&mut self) {
        if self.receipt_focused {
            self.receipt_focused = false;
            self.form.set_focus(FormField::Description);
        } else if self.form.focus() == FormField::Ddi(2) {
            self.receipt_focused = true;
        } else {
            self.form.focus_next();
        }
    }

    pub fn form_focus_prev(&mut self) {
        if self.receipt_focused {
            self.receipt_focused = false;
            self.form.set_focus(FormField::Ddi(2));
        } else if self.form.focus() == FormField::Description {
            self.receipt_focused = true;
        } else {
            self.form.focus_prev();
        }
    }

    /// Step the cost-center selection through the known labels
    pub fn cycle_cost_center(&mut self, forward: bool) {
        let labels = self.store.cost_centers().as_slice();
        if labels.is_empty() {
            return;
        }
        let len = labels.len();
        let next = match labels.iter().position(|l| *l == self.form.cost_center) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.form.cost_center = labels[next].clone();
    }

    /// Validate and insert the form, uploading the receipt if one was given
    pub fn submit_form(&mut self) {
        let image = match self.receipt_path.trim() {
            "" => None,
            path => match ReceiptImage::load(Path::new(path)) {
                Ok(image) => Some(image),
                Err(e) => {
                    self.form_error = Some(e.user_summary());
                    return;
                }
            },
        };

        match self.form.submit(&mut self.store, image) {
            Ok(outcome) => {
                self.notify(outcome.notice());
                self.receipt_path.clear();
                self.form_error = None;
                self.active_dialog = ActiveDialog::None;
            }
            Err(e) => {
                if e.is_backend() {
                    self.notify_error("Could not add expense", &e);
                }
                self.form_error = Some(e.user_summary());
            }
        }
    }

    /// Add the cost center typed in the dialog and select it in the form
    pub fn add_cost_center(&mut self) {
        match self.store.add_cost_center(&self.text_input) {
            Ok(label) => {
                self.form.cost_center = label;
                self.form.set_focus(FormField::Amount);
                self.active_dialog = ActiveDialog::AddExpense;
            }
            Err(e) => self.dialog_error = Some(e.to_string()),
        }
    }

    // --- List actions ---

    pub fn save_edit(&mut self) {
        match self.list.save_edit(&mut self.store) {
            Ok(_) => {
                self.notify(Notice::success("Expense updated", "The changes were saved"));
                self.active_dialog = ActiveDialog::None;
            }
            Err(e) if e.is_backend() => self.notify_error("Could not update expense", &e),
            // The draft keeps validation errors for the dialog to show
            Err(_) => {}
        }
    }

    pub fn confirm_delete(&mut self) {
        match self.list.confirm_delete(&mut self.store) {
            Ok(Some(_)) => {
                self.notify(Notice::success("Expense deleted", "The expense was removed"))
            }
            Ok(None) => {}
            Err(e) => self.notify_error("Could not delete expense", &e),
        }
        self.active_dialog = ActiveDialog::None;
    }

    /// Save the receipt shown in the details dialog to the working directory
    pub fn save_receipt(&mut self) {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match self.list.save_receipt(&self.store, &dir, None) {
            Ok(path) => self.notify(Notice::success(
                "Receipt saved",
                format!("Saved to {}", path.display()),
            )),
            Err(e) => self.notify_error("Could not save receipt", &e),
        }
    }

    // --- Budget ---

    pub fn set_budget(&mut self) {
        let amount = match Money::parse(self.text_input.trim()) {
            Ok(amount) => amount,
            Err(_) => {
                self.dialog_error = Some("Enter an amount such as 1000 or 1000.00".into());
                return;
            }
        };

        match self.budget.set(self.store.month(), amount) {
            Ok(saved) => {
                self.gate = BudgetGate::from_budget(Some(&saved));
                self.notify(Notice::success(
                    "Budget saved",
                    format!(
                        "{}: {}",
                        self.store.month().long_name(),
                        self.options.money(saved.amount)
                    ),
                ));
                self.active_dialog = ActiveDialog::None;
            }
            Err(e) if e.is_backend() => {
                self.notify_error("Could not save budget", &e);
            }
            Err(e) => self.dialog_error = Some(e.user_summary()),
        }
    }
}
