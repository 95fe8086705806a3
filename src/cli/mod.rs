//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod cost_center;
pub mod expense;
pub mod summary;

pub use budget::{handle_budget_command, BudgetCommands};
pub use cost_center::{handle_cost_center_command, CostCenterCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use summary::handle_summary_command;

use crate::config::Settings;
use crate::error::{GastosError, GastosResult};
use crate::gateway::DataGateway;
use crate::models::{CostCenterSet, Month};
use crate::services::ExpenseStore;

/// Parse an optional `YYYY-MM` argument, defaulting to the current month
pub fn resolve_month(arg: Option<&str>) -> GastosResult<Month> {
    match arg {
        None => Ok(Month::current()),
        Some(s) => Month::parse(s).map_err(|e| GastosError::Validation(e.to_string())),
    }
}

/// Store over the gateway with the month already loaded
pub fn load_store<'a>(
    gateway: &'a dyn DataGateway,
    settings: &Settings,
    month: Month,
) -> GastosResult<ExpenseStore<'a>> {
    let mut store = ExpenseStore::new(
        gateway,
        month,
        CostCenterSet::with_defaults(&settings.default_cost_centers),
    );
    store.change_month(month)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_month() {
        assert_eq!(resolve_month(None).unwrap(), Month::current());
        assert_eq!(
            resolve_month(Some("2025-01")).unwrap(),
            Month::new(2025, 1).unwrap()
        );
        assert!(resolve_month(Some("January")).unwrap_err().is_validation());
    }
}
