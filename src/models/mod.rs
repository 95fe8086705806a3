//! Core data models for gastos
//!
//! This module contains the data structures of the expense domain:
//! expenses, cost centers, monthly budgets, receipts and DDI codes.

pub mod budget;
pub mod cost_center;
pub mod ddi;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;
pub mod receipt;

pub use budget::{BudgetGate, MonthlyBudget};
pub use cost_center::{CostCenterSet, DEFAULT_COST_CENTERS};
pub use ddi::DdiCode;
pub use expense::{Expense, ExpenseValidationError, NewExpense};
pub use ids::ExpenseId;
pub use money::Money;
pub use month::Month;
pub use receipt::{ReceiptImage, ReceiptKey};
