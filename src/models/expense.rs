//! Expense model
//!
//! An expense is one spending record against a cost center. The backend
//! assigns the identifier and creation timestamp; receipt presence is probed
//! separately and never stored on the record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;
use crate::error::GastosError;

/// Date format accepted on input
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Backend-assigned identifier
    pub id: ExpenseId,

    /// What the money was spent on
    #[serde(default)]
    pub description: String,

    /// Amount spent
    pub amount: Money,

    /// Cost center label
    pub cost_center: String,

    /// Date of the expense
    pub date: NaiveDate,

    /// Composed DDI code, e.g. `DDI-123-456-789`
    #[serde(default)]
    pub ddi_code: String,

    /// Whether a receipt image exists for this expense
    #[serde(default)]
    pub has_receipt: bool,

    /// When the backend created the record
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// DDI code for display, "-" when empty
    pub fn ddi_display(&self) -> &str {
        if self.ddi_code.is_empty() {
            "-"
        } else {
            &self.ddi_code
        }
    }

    /// Validate the editable fields
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(&self.description, &self.cost_center, self.amount)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date, self.description, self.amount, self.cost_center
        )
    }
}

/// An expense that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub cost_center: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub ddi_code: String,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        cost_center: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            cost_center: cost_center.into(),
            date,
            ddi_code: String::new(),
        }
    }

    /// Set the DDI code
    pub fn with_ddi(mut self, ddi_code: impl Into<String>) -> Self {
        self.ddi_code = ddi_code.into();
        self
    }

    /// Validate the fields before any request is made
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(&self.description, &self.cost_center, self.amount)
    }
}

fn validate_fields(
    description: &str,
    cost_center: &str,
    amount: Money,
) -> Result<(), ExpenseValidationError> {
    if description.trim().is_empty() {
        return Err(ExpenseValidationError::MissingDescription);
    }
    if cost_center.trim().is_empty() {
        return Err(ExpenseValidationError::MissingCostCenter);
    }
    if amount.is_negative() {
        return Err(ExpenseValidationError::NegativeAmount);
    }
    Ok(())
}

/// Parse a user-supplied amount string into a non-negative amount
pub fn parse_amount(input: &str) -> Result<Money, ExpenseValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ExpenseValidationError::MissingAmount);
    }
    let amount =
        Money::parse(input).map_err(|_| ExpenseValidationError::InvalidAmount(input.to_string()))?;
    if amount.is_negative() {
        return Err(ExpenseValidationError::NegativeAmount);
    }
    Ok(amount)
}

/// Parse a user-supplied `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, ExpenseValidationError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, INPUT_DATE_FORMAT)
        .map_err(|_| ExpenseValidationError::InvalidDate(input.to_string()))
}

/// Field-level validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    MissingDescription,
    MissingCostCenter,
    MissingAmount,
    InvalidAmount(String),
    NegativeAmount,
    InvalidDate(String),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDescription => write!(f, "Description is required"),
            Self::MissingCostCenter => write!(f, "Cost center is required"),
            Self::MissingAmount => write!(f, "Amount is required"),
            Self::InvalidAmount(s) => write!(f, "Amount '{}' is not a number", s),
            Self::NegativeAmount => write!(f, "Amount cannot be negative"),
            Self::InvalidDate(s) => write!(f, "Invalid date '{}'. Use YYYY-MM-DD", s),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

impl From<ExpenseValidationError> for GastosError {
    fn from(err: ExpenseValidationError) -> Self {
        GastosError::Validation(err.to_string())
    }
}
