//! Expense table view
//!
//! Shows the selected month's expenses that pass the cost-center filter

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::BudgetGate;
use crate::tui::app::App;

/// Render the expense table
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Expenses ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let expenses = app.visible();

    if app.is_loading() || !app.list_open() || expenses.is_empty() {
        let text = placeholder_text(app.is_loading(), &app.gate);
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let widths = [
        Constraint::Length(12), // Date
        Constraint::Min(20),    // Description
        Constraint::Length(14), // Cost center
        Constraint::Length(14), // Amount
        Constraint::Length(16), // DDI
        Constraint::Length(3),  // Receipt
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("Date").style(bold),
        Cell::from("Description").style(bold),
        Cell::from("Cost center").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from("DDI").style(bold),
        Cell::from("").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = expenses
        .iter()
        .map(|expense| {
            Row::new(vec![
                Cell::from(app.options.date(expense.date)),
                Cell::from(truncate_string(&expense.description, 40)),
                Cell::from(expense.cost_center.clone()),
                Cell::from(app.options.money(expense.amount)),
                Cell::from(expense.ddi_display().to_string()),
                Cell::from(if expense.has_receipt { "📎" } else { "" })
                    .style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Text shown in place of the table. Expenses are only listed while the
/// month's budget is open.
fn placeholder_text(loading: bool, gate: &BudgetGate) -> &'static str {
    if loading {
        return "Loading...";
    }
    match gate {
        BudgetGate::Open(_) => "No expenses this month. Press 'a' to add one.",
        BudgetGate::Closed => "Expense entry is closed for this month.",
        BudgetGate::Unset => "Set a budget (b) to list and add expenses.",
    }
}

/// Truncate a string to a maximum number of characters
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Taxi", 10), "Taxi");
        assert_eq!(truncate_string("Almuerzo de trabajo", 8), "Almuerz…");
        assert_eq!(truncate_string("Cañería", 7), "Cañería");
    }

    #[test]
    fn test_placeholder_hides_list_without_budget() {
        assert_eq!(placeholder_text(true, &BudgetGate::Unset), "Loading...");
        assert!(placeholder_text(false, &BudgetGate::Closed).contains("closed"));
        assert!(placeholder_text(false, &BudgetGate::Unset).contains("Set a budget"));
        assert!(placeholder_text(false, &BudgetGate::Open(Money::from_cents(100))).contains("'a'"));
    }
}
