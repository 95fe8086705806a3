//! TUI Views module
//!
//! The single screen: month header, metrics bar, expense table and status
//! bar, with the active dialog and the current toast drawn on top.

pub mod expense_table;
pub mod header;
pub mod metrics;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::{toast_rect, AppLayout};
use super::widgets::NotificationWidget;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    header::render(frame, app, layout.header);
    metrics::render(frame, app, layout.metrics);
    expense_table::render(frame, app, layout.main);
    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }

    if let Some(notification) = app.notifications.current() {
        frame.render_widget(NotificationWidget::new(notification), toast_rect(frame.area()));
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &App) {
    match app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::AddExpense => dialogs::expense_form::render(frame, app),
        ActiveDialog::EditExpense => dialogs::edit_expense::render(frame, app),
        ActiveDialog::Details => dialogs::details::render(frame, app),
        ActiveDialog::ConfirmDelete => dialogs::confirm::render(frame, app),
        ActiveDialog::NewCostCenter => {
            // Keep the form visible underneath
            dialogs::expense_form::render(frame, app);
            dialogs::cost_center::render(frame, app);
        }
        ActiveDialog::SetBudget => dialogs::set_budget::render(frame, app),
        ActiveDialog::None => {}
    }
}
