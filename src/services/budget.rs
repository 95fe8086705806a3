//! Budget service
//!
//! Reads and sets monthly budgets and derives the entry gate for a month.

use tracing::{error, info};

use crate::error::{GastosError, GastosResult};
use crate::gateway::DataGateway;
use crate::models::{BudgetGate, Money, Month, MonthlyBudget};

/// Service for monthly budgets
pub struct BudgetService<'a> {
    gateway: &'a dyn DataGateway,
}

impl<'a> BudgetService<'a> {
    pub fn new(gateway: &'a dyn DataGateway) -> Self {
        Self { gateway }
    }

    /// Budget for a month, if one was set
    pub fn get(&self, month: Month) -> GastosResult<Option<MonthlyBudget>> {
        self.gateway.get_budget(month).map_err(|e| {
            error!(%month, error = %e, "failed to read budget");
            e
        })
    }

    /// Entry gate for a month
    pub fn gate(&self, month: Month) -> GastosResult<BudgetGate> {
        Ok(BudgetGate::from_budget(self.get(month)?.as_ref()))
    }

    /// Set the budget for a month
    pub fn set(&self, month: Month, amount: Money) -> GastosResult<MonthlyBudget> {
        let budget = MonthlyBudget::new(month, amount);
        budget
            .validate()
            .map_err(|e| GastosError::Budget(e.to_string()))?;

        let saved = self.gateway.upsert_budget(&budget).map_err(|e| {
            error!(%month, error = %e, "failed to set budget");
            e
        })?;
        info!(%month, amount = %saved.amount, "budget set");
        Ok(saved)
    }

    /// Refuse expense entry unless the month's gate is open
    pub fn ensure_entry_open(&self, month: Month) -> GastosResult<Money> {
        match self.gate(month)? {
            BudgetGate::Open(amount) => Ok(amount),
            BudgetGate::Unset => Err(GastosError::Budget(format!(
                "No budget set for {}. Set one before adding expenses",
                month.long_name()
            ))),
            BudgetGate::Closed => Err(GastosError::Budget(format!(
                "The budget for {} is zero; expense entry is closed",
                month.long_name()
            ))),
        }
    }
}
