//! Expense CLI commands
//!
//! Implements CLI commands for recording and managing expenses.

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use super::{load_store, resolve_month};
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_table, DisplayOptions};
use crate::error::{GastosError, GastosResult};
use crate::gateway::DataGateway;
use crate::models::expense::{parse_amount, parse_date};
use crate::models::receipt::download_file_name;
use crate::models::{DdiCode, Money, Month, NewExpense, ReceiptImage};
use crate::services::list::save_receipt_to;
use crate::services::{BudgetService, CostCenterFilter, ExpenseList};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        #[arg(short, long)]
        description: String,
        /// Cost center label
        #[arg(short, long)]
        cost_center: String,
        /// Amount (e.g., "15.50")
        #[arg(short, long)]
        amount: String,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// DDI code (e.g., "DDI-123-456-789" or "123-456-789")
        #[arg(long)]
        ddi: Option<String>,
        /// JPEG receipt to attach
        #[arg(short, long)]
        receipt: Option<PathBuf>,
    },
    /// List the expenses of a month
    List {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Only show this cost center
        #[arg(short, long)]
        cost_center: Option<String>,
    },
    /// Show expense details
    Show {
        /// Expense ID or ID prefix
        id: String,
        /// Month the expense belongs to (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Edit an expense
    Edit {
        /// Expense ID or ID prefix
        id: String,
        /// Month the expense belongs to (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New cost center
        #[arg(short, long)]
        cost_center: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// New DDI code
        #[arg(long)]
        ddi: Option<String>,
    },
    /// Delete an expense and its receipt
    Delete {
        /// Expense ID or ID prefix
        id: String,
        /// Month the expense belongs to (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Download the receipt of an expense
    Receipt {
        /// Expense ID or ID prefix
        id: String,
        /// Month the expense belongs to (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Output file, defaults to "<description>.jpg"
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_ddi(input: &str) -> GastosResult<String> {
    DdiCode::parse(input)
        .map(|code| code.to_string())
        .map_err(|e| GastosError::Validation(format!("Invalid DDI code '{}': {}", input, e)))
}

/// Handle an expense command
pub fn handle_expense_command(
    gateway: &dyn DataGateway,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> GastosResult<()> {
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        ExpenseCommands::Add {
            description,
            cost_center,
            amount,
            date,
            ddi,
            receipt,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };
            let ddi_code = match ddi {
                Some(code) => parse_ddi(&code)?,
                None => DdiCode::new().to_string(),
            };

            let new = NewExpense::new(description.trim(), amount, cost_center.trim(), date)
                .with_ddi(ddi_code);
            new.validate()?;

            // Read the image before inserting so a bad file issues no request
            let image = receipt.as_deref().map(ReceiptImage::load).transpose()?;

            let month = Month::containing(date);
            BudgetService::new(gateway).ensure_entry_open(month)?;

            let mut store = load_store(gateway, settings, month)?;
            let expense = store.add_expense(new)?;

            println!("Added expense: {}", expense.id);
            println!("  Description: {}", expense.description);
            println!("  Amount:      {}", options.money(expense.amount));
            println!("  Date:        {}", options.date(expense.date));
            println!("  Cost center: {}", expense.cost_center);
            println!("  DDI code:    {}", expense.ddi_display());

            if let Some(image) = image {
                match store.upload_receipt(&expense.id, &image) {
                    Ok(()) => println!("  Receipt:     uploaded"),
                    Err(e) => {
                        eprintln!(
                            "Warning: the expense was saved but the receipt could not be uploaded ({})",
                            e.user_summary()
                        );
                    }
                }
            }
        }

        ExpenseCommands::List { month, cost_center } => {
            let month = resolve_month(month.as_deref())?;
            let store = load_store(gateway, settings, month)?;

            let mut list = ExpenseList::new();
            if let Some(label) = cost_center {
                list.set_filter(CostCenterFilter::Only(label));
            }
            let visible = list.visible(store.expenses());

            println!("Expenses for {} ({})", month.long_name(), list.filter().label());
            println!();
            print!("{}", format_expense_table(&visible, &options));

            if !visible.is_empty() {
                let total: Money = visible.iter().map(|e| e.amount).sum();
                println!();
                println!("{} expense(s), total {}", visible.len(), options.money(total));
            }
        }

        ExpenseCommands::Show { id, month } => {
            let month = resolve_month(month.as_deref())?;
            let store = load_store(gateway, settings, month)?;
            let expense = store.find_by_prefix(&id)?;

            print!("{}", format_expense_details(expense, &options));
            if expense.has_receipt {
                match store.receipt_url(&expense.id) {
                    Ok(url) => println!("Receipt URL: {}", url),
                    Err(e) => println!("Receipt URL: unavailable ({})", e.user_summary()),
                }
            }
        }

        ExpenseCommands::Edit {
            id,
            month,
            description,
            cost_center,
            amount,
            date,
            ddi,
        } => {
            let month = resolve_month(month.as_deref())?;
            let mut store = load_store(gateway, settings, month)?;
            let expense = store.find_by_prefix(&id)?.clone();

            let mut list = ExpenseList::new();
            list.begin_edit(&expense);
            if let Some(draft) = list.edit_mut() {
                if let Some(v) = description {
                    draft.description = v;
                }
                if let Some(v) = cost_center {
                    draft.cost_center = v;
                }
                if let Some(v) = amount {
                    draft.amount = v;
                }
                if let Some(v) = date {
                    draft.date = v;
                }
                if let Some(v) = ddi {
                    draft.ddi_code = if v.trim().is_empty() {
                        String::new()
                    } else {
                        parse_ddi(&v)?
                    };
                }
            }

            let updated = list.save_edit(&mut store)?;

            println!("Updated expense: {}", updated.id);
            println!("  Description: {}", updated.description);
            println!("  Amount:      {}", options.money(updated.amount));
            println!("  Date:        {}", options.date(updated.date));
            println!("  Cost center: {}", updated.cost_center);
        }

        ExpenseCommands::Delete { id, month, force } => {
            let month = resolve_month(month.as_deref())?;
            let mut store = load_store(gateway, settings, month)?;
            let expense = store.find_by_prefix(&id)?.clone();

            if !force {
                println!("About to delete expense:");
                println!("  Date:        {}", options.date(expense.date));
                println!("  Description: {}", expense.description);
                println!("  Amount:      {}", options.money(expense.amount));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let mut list = ExpenseList::new();
            list.request_delete(expense.id);
            list.confirm_delete(&mut store)?;

            println!(
                "Deleted expense: {} ({} {})",
                expense.id,
                options.date(expense.date),
                expense.description
            );
        }

        ExpenseCommands::Receipt { id, month, output } => {
            let month = resolve_month(month.as_deref())?;
            let store = load_store(gateway, settings, month)?;
            let expense = store.find_by_prefix(&id)?;

            if !expense.has_receipt {
                return Err(GastosError::receipt_not_found(expense.id.to_string()));
            }

            let path = output.unwrap_or_else(|| PathBuf::from(download_file_name(&expense.description)));
            save_receipt_to(&store, &expense.id, &path)?;
            println!("Saved receipt to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ddi() {
        assert_eq!(parse_ddi("1-22-333").unwrap(), "DDI-1-22-333");
        assert_eq!(parse_ddi("DDI---").unwrap(), "DDI---");
        assert!(parse_ddi("a-b-c").unwrap_err().is_validation());
    }
}
