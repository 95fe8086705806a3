//! Month metrics
//!
//! Totals derived from the cached expenses and the month's budget gate.

use std::collections::BTreeMap;

use crate::models::{BudgetGate, Expense, Money, Month};

/// Spending summary for one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthMetrics {
    pub month: Month,
    pub count: usize,
    pub total: Money,
    pub gate: BudgetGate,
    /// Totals per cost center, sorted by label
    pub by_cost_center: Vec<(String, Money)>,
}

impl MonthMetrics {
    pub fn compute(month: Month, expenses: &[Expense], gate: BudgetGate) -> Self {
        let mut by_center: BTreeMap<&str, Money> = BTreeMap::new();
        for expense in expenses {
            *by_center.entry(expense.cost_center.as_str()).or_default() += expense.amount;
        }

        Self {
            month,
            count: expenses.len(),
            total: expenses.iter().map(|e| e.amount).sum(),
            gate,
            by_cost_center: by_center
                .into_iter()
                .map(|(label, total)| (label.to_string(), total))
                .collect(),
        }
    }

    /// Budget amount (zero unless the gate is open)
    pub fn budget(&self) -> Money {
        self.gate.amount()
    }

    /// Budget minus spending; negative when overspent
    pub fn remaining(&self) -> Money {
        self.budget() - self.total
    }

    /// Share of the budget spent, as a percentage. None without a budget.
    pub fn percent_used(&self) -> Option<f64> {
        let budget = self.budget();
        if budget.is_positive() {
            Some(self.total.cents() as f64 * 100.0 / budget.cents() as f64)
        } else {
            None
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget().is_positive() && self.remaining().is_negative()
    }
}
