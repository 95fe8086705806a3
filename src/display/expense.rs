//! Expense display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::DisplayOptions;
use crate::models::Expense;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Cost center")]
    cost_center: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "DDI")]
    ddi: String,
    #[tabled(rename = "Receipt")]
    receipt: String,
}

/// Format expenses as a table
pub fn format_expense_table(expenses: &[&Expense], options: &DisplayOptions) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id.to_string(),
            date: options.date(e.date),
            description: e.description.clone(),
            cost_center: e.cost_center.clone(),
            amount: options.money(e.amount),
            ddi: e.ddi_display().to_string(),
            receipt: if e.has_receipt { "yes" } else { "" }.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format one expense for the `show` command
pub fn format_expense_details(expense: &Expense, options: &DisplayOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!("Amount:      {}\n", options.money(expense.amount)));
    output.push_str(&format!("Date:        {}\n", options.date(expense.date)));
    output.push_str(&format!("Cost center: {}\n", expense.cost_center));

    if expense.ddi_code.is_empty() {
        output.push_str("DDI code:    (none)\n");
    } else {
        output.push_str(&format!("DDI code:    {}\n", expense.ddi_code));
    }

    output.push_str(&format!(
        "Receipt:     {}\n",
        if expense.has_receipt { "attached" } else { "none" }
    ));

    if let Some(created) = expense.created_at {
        output.push_str(&format!(
            "Created:     {}\n",
            created.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money};
    use chrono::NaiveDate;

    fn taxi() -> Expense {
        Expense {
            id: ExpenseId::new(),
            description: "Taxi".into(),
            amount: Money::from_cents(1550),
            cost_center: "600-500-140".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ddi_code: "DDI---".into(),
            has_receipt: false,
            created_at: None,
        }
    }

    #[test]
    fn test_table_row() {
        let expense = taxi();
        let output = format_expense_table(&[&expense], &DisplayOptions::default());
        assert!(output.contains("Taxi"));
        assert!(output.contains("₡15.50"));
        assert!(output.contains("10-01-2025"));
        assert!(output.contains("DDI---"));
        assert!(output.contains("Cost center"));
    }

    #[test]
    fn test_empty_table() {
        let output = format_expense_table(&[], &DisplayOptions::default());
        assert!(output.contains("No expenses found"));
    }

    #[test]
    fn test_details() {
        let mut expense = taxi();
        expense.ddi_code.clear();
        let output = format_expense_details(&expense, &DisplayOptions::default());
        assert!(output.contains("Description: Taxi"));
        assert!(output.contains("Amount:      ₡15.50"));
        assert!(output.contains("DDI code:    (none)"));
        assert!(output.contains("Receipt:     none"));
    }
}
