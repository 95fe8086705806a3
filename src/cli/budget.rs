//! Budget CLI commands
//!
//! Implements CLI commands for reading and setting monthly budgets.

use clap::Subcommand;

use super::resolve_month;
use crate::config::Settings;
use crate::display::{format_budget, DisplayOptions};
use crate::error::{GastosError, GastosResult};
use crate::gateway::DataGateway;
use crate::models::{BudgetGate, Money};
use crate::services::BudgetService;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the budget of a month
    Show {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Set the budget of a month
    Set {
        /// Amount (e.g., "1000" or "1000.00"); zero closes expense entry
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    gateway: &dyn DataGateway,
    settings: &Settings,
    cmd: BudgetCommands,
) -> GastosResult<()> {
    let service = BudgetService::new(gateway);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        BudgetCommands::Show { month } => {
            let month = resolve_month(month.as_deref())?;
            let gate = service.gate(month)?;
            print!("{}", format_budget(month, gate, &options));
        }

        BudgetCommands::Set { amount, month } => {
            let month = resolve_month(month.as_deref())?;
            let amount = Money::parse(&amount)
                .map_err(|e| GastosError::Validation(format!("Invalid amount: {}", e)))?;

            let saved = service.set(month, amount)?;
            println!(
                "Budget for {} set to {}",
                month.long_name(),
                options.money(saved.amount)
            );
            match BudgetGate::from_budget(Some(&saved)) {
                BudgetGate::Open(_) => println!("Expense entry is open."),
                _ => println!("Expense entry is closed for this month."),
            }
        }
    }

    Ok(())
}
