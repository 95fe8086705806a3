//! Monthly budget model
//!
//! One spending ceiling per calendar month. Its presence and amount decide
//! whether new expenses may be entered for that month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::Month;

/// The budget set for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    /// The month this budget applies to
    pub month: Month,

    /// Spending ceiling for the month
    pub amount: Money,

    /// When the budget was last set
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MonthlyBudget {
    pub fn new(month: Month, amount: Money) -> Self {
        Self {
            month,
            amount,
            updated_at: Some(Utc::now()),
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeBudget);
        }
        Ok(())
    }
}

impl fmt::Display for MonthlyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} budget: {}", self.month, self.amount)
    }
}

/// Whether expense entry is allowed for a month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetGate {
    /// No budget recorded; prompt for one and block entry
    Unset,
    /// Budget is zero; show metrics only
    Closed,
    /// Budget is positive; entry allowed
    Open(Money),
}

impl BudgetGate {
    /// Derive the gate from an optional budget
    pub fn from_budget(budget: Option<&MonthlyBudget>) -> Self {
        match budget {
            None => Self::Unset,
            Some(b) if b.amount.is_positive() => Self::Open(b.amount),
            Some(_) => Self::Closed,
        }
    }

    pub fn allows_entry(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Budget amount, zero unless open
    pub fn amount(&self) -> Money {
        match self {
            Self::Open(amount) => *amount,
            _ => Money::zero(),
        }
    }
}

impl fmt::Display for BudgetGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "No budget set"),
            Self::Closed => write!(f, "Closed"),
            Self::Open(amount) => write!(f, "Open ({})", amount),
        }
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeBudget,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn month() -> Month {
        Month::new(2025, 1).unwrap()
    }

    #[test]
    fn test_gate_from_budget() {
        assert_eq!(BudgetGate::from_budget(None), BudgetGate::Unset);

        let zero = MonthlyBudget::new(month(), Money::zero());
        assert_eq!(BudgetGate::from_budget(Some(&zero)), BudgetGate::Closed);

        let open = MonthlyBudget::new(month(), Money::from_cents(100_000));
        let gate = BudgetGate::from_budget(Some(&open));
        assert_eq!(gate, BudgetGate::Open(Money::from_cents(100_000)));
        assert!(gate.allows_entry());
        assert!(!BudgetGate::Closed.allows_entry());
        assert!(!BudgetGate::Unset.allows_entry());
    }

    #[test]
    fn test_validation() {
        let budget = MonthlyBudget::new(month(), Money::from_cents(-5));
        assert_eq!(budget.validate(), Err(BudgetValidationError::NegativeBudget));
    }

    #[test]
    fn test_serialization_uses_month_key() {
        let budget = MonthlyBudget {
            month: month(),
            amount: Money::from_cents(5000),
            updated_at: None,
        };
        let json = serde_json::to_string(&budget).unwrap();
        assert!(json.contains("\"month\":\"2025-01\""));
        let back: MonthlyBudget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, budget);
    }
}
