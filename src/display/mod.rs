//! Display formatting for terminal output
//!
//! Formats expenses, budgets and summaries for the CLI. Amounts and dates
//! follow the user's currency symbol and date format settings.

pub mod budget;
pub mod expense;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::models::Money;

pub use budget::{format_budget, format_cost_centers, format_summary};
pub use expense::{format_expense_details, format_expense_table};

/// Currency and date preferences applied to all output
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
}

impl DisplayOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
