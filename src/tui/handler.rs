//! Event handler for the TUI
//!
//! Routes keyboard events to the active dialog or to the main view.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => {
            handle_tick(app);
            Ok(())
        }
        // The next draw picks up the new size
        Event::Resize(_, _) => Ok(()),
    }
}

/// Run deferred work queued by the last key press
pub fn handle_tick(app: &mut App) {
    app.on_tick();
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
    } else {
        handle_main_key(app, key);
    }
    Ok(())
}

/// Handle keys when no dialog is open
fn handle_main_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        // Month selector
        KeyCode::Char('h') | KeyCode::Left => app.prev_month(),
        KeyCode::Char('l') | KeyCode::Right => app.next_month(),
        KeyCode::Char('r') => app.load_month(app.store.month()),

        // Selection
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.selected_index = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.selected_index = app.visible().len().saturating_sub(1);
        }

        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_dialog(ActiveDialog::AddExpense),
        KeyCode::Char('e') => app.open_dialog(ActiveDialog::EditExpense),
        KeyCode::Char('d') | KeyCode::Delete => app.open_dialog(ActiveDialog::ConfirmDelete),
        KeyCode::Enter => app.open_dialog(ActiveDialog::Details),
        KeyCode::Char('b') => app.open_dialog(ActiveDialog::SetBudget),

        _ => {}
    }
}

/// Handle keys when a dialog is active
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::AddExpense => dialogs::expense_form::handle_key(app, key),
        ActiveDialog::EditExpense => dialogs::edit_expense::handle_key(app, key),
        ActiveDialog::Details => dialogs::details::handle_key(app, key),
        ActiveDialog::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::NewCostCenter => dialogs::cost_center::handle_key(app, key),
        ActiveDialog::SetBudget => dialogs::set_budget::handle_key(app, key),
        ActiveDialog::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GastosPaths, Settings};
    use crate::gateway::testing::TestGateway;
    use crate::models::Month;
    use chrono::Local;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_expense_by_keyboard() {
        let dir = TempDir::new().unwrap();
        let gateway = TestGateway::new();
        gateway.open_month(Month::current(), 100_000);
        let settings = Settings::default();
        let paths = GastosPaths::with_base_dir(dir.path().to_path_buf());

        let mut app = App::new(&gateway, &settings, &paths);
        app.load_month(Month::current());
        handle_event(&mut app, Event::Tick).unwrap();

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.active_dialog, ActiveDialog::AddExpense);

        type_str(&mut app, "Taxi");
        press(&mut app, KeyCode::Tab); // cost center keeps its default
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "15.5x0");
        assert_eq!(app.form.amount(), "15.50");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.active_dialog, ActiveDialog::None);
        let expense = &app.store.expenses()[0];
        assert_eq!(expense.description, "Taxi");
        assert_eq!(expense.cost_center, "600-500-140");
        assert_eq!(expense.date, Local::now().date_naive());
    }

    #[test]
    fn test_month_keys_and_quit() {
        let dir = TempDir::new().unwrap();
        let gateway = TestGateway::new();
        let settings = Settings::default();
        let paths = GastosPaths::with_base_dir(dir.path().to_path_buf());

        let mut app = App::new(&gateway, &settings, &paths);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.store.month(), Month::current().prev());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.store.month(), Month::current().next());

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.active_dialog, ActiveDialog::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.active_dialog, ActiveDialog::None);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
