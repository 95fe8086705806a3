//! Dialog modules for the TUI

pub mod confirm;
pub mod cost_center;
pub mod details;
pub mod edit_expense;
pub mod expense_form;
pub mod help;
pub mod set_budget;
