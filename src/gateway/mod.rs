//! Remote data gateway
//!
//! All durable state lives behind [`DataGateway`]: the expense table, the
//! monthly budget table and the receipt blob store. Rows cross the boundary
//! in the backend's wire shape ([`ExpenseRecord`]) and are mapped to domain
//! types here.

pub mod file_io;
pub mod local;
pub mod supabase;

#[cfg(test)]
pub mod testing;

pub use local::LocalGateway;
pub use supabase::SupabaseGateway;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{BackendKind, GastosPaths, Settings};
use crate::error::{GastosError, GastosResult};
use crate::models::{
    Expense, ExpenseId, Money, Month, MonthlyBudget, NewExpense, ReceiptImage, ReceiptKey,
};

/// Operations the application needs from its backend
pub trait DataGateway {
    /// Expenses dated within `[from, to]`, newest first
    fn select_expenses(&self, from: NaiveDate, to: NaiveDate) -> GastosResult<Vec<Expense>>;

    /// Insert one expense and return it with its assigned identifier
    fn insert_expense(&self, expense: &NewExpense) -> GastosResult<Expense>;

    /// Overwrite the editable fields of an expense
    fn update_expense(&self, expense: &Expense) -> GastosResult<()>;

    fn delete_expense(&self, id: &ExpenseId) -> GastosResult<()>;

    /// Every cost-center label referenced by any expense (may repeat)
    fn cost_centers(&self) -> GastosResult<Vec<String>>;

    fn get_budget(&self, month: Month) -> GastosResult<Option<MonthlyBudget>>;

    /// Insert or replace the budget for its month
    fn upsert_budget(&self, budget: &MonthlyBudget) -> GastosResult<MonthlyBudget>;

    /// Store receipt bytes, overwriting any existing object
    fn upload_receipt(&self, key: &ReceiptKey, image: &ReceiptImage) -> GastosResult<()>;

    fn download_receipt(&self, key: &ReceiptKey) -> GastosResult<Vec<u8>>;

    /// Object names in the receipt store starting with `prefix`
    fn list_receipts(&self, prefix: &str) -> GastosResult<Vec<String>>;

    fn delete_receipt(&self, key: &ReceiptKey) -> GastosResult<()>;

    /// URL at which the receipt can be viewed
    fn receipt_url(&self, key: &ReceiptKey) -> GastosResult<String>;

    /// Whether a receipt object exists under `key`
    fn receipt_exists(&self, key: &ReceiptKey) -> GastosResult<bool> {
        let names = self.list_receipts(key.as_str())?;
        Ok(names.iter().any(|name| name == key.as_str()))
    }
}

/// Open the gateway selected in the settings
pub fn open_gateway(
    paths: &GastosPaths,
    settings: &Settings,
) -> GastosResult<Box<dyn DataGateway>> {
    match settings.backend.kind {
        BackendKind::Local => Ok(Box::new(LocalGateway::open(paths)?)),
        BackendKind::Supabase => Ok(Box::new(SupabaseGateway::from_settings(
            &settings.backend,
        )?)),
    }
}

/// Expense row as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal amount in major units
    pub amount: f64,
    #[serde(default)]
    pub cost_center: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub ddi_code: Option<String>,
    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ExpenseRecord {
    /// Build a stored row from a new expense
    pub fn from_new(id: Uuid, expense: &NewExpense, created_at: DateTime<Utc>) -> Self {
        let payload = ExpensePayload::from(expense);
        Self {
            id,
            description: Some(payload.description),
            amount: payload.amount,
            cost_center: Some(payload.cost_center),
            date: payload.date,
            ddi_code: Some(payload.ddi_code),
            created_at: Some(created_at),
        }
    }

    /// Overwrite the editable columns
    pub fn apply(&mut self, payload: ExpensePayload) {
        self.description = Some(payload.description);
        self.amount = payload.amount;
        self.cost_center = Some(payload.cost_center);
        self.date = payload.date;
        self.ddi_code = Some(payload.ddi_code);
    }
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Expense {
            id: ExpenseId::from_uuid(record.id),
            description: record.description.unwrap_or_default(),
            amount: Money::from_major(record.amount),
            cost_center: record.cost_center.unwrap_or_default(),
            date: record.date,
            ddi_code: record.ddi_code.unwrap_or_default(),
            has_receipt: false,
            created_at: record.created_at,
        }
    }
}

/// Writable columns of an expense row, sent on insert and update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub description: String,
    pub amount: f64,
    pub cost_center: String,
    pub date: NaiveDate,
    pub ddi_code: String,
}

impl From<&NewExpense> for ExpensePayload {
    fn from(expense: &NewExpense) -> Self {
        Self {
            description: expense.description.clone(),
            amount: expense.amount.to_major(),
            cost_center: expense.cost_center.clone(),
            date: expense.date,
            ddi_code: expense.ddi_code.clone(),
        }
    }
}

impl From<&Expense> for ExpensePayload {
    fn from(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            amount: expense.amount.to_major(),
            cost_center: expense.cost_center.clone(),
            date: expense.date,
            ddi_code: expense.ddi_code.clone(),
        }
    }
}

/// Monthly budget row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub month: Month,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&MonthlyBudget> for BudgetRecord {
    fn from(budget: &MonthlyBudget) -> Self {
        Self {
            month: budget.month,
            amount: budget.amount.to_major(),
            updated_at: budget.updated_at,
        }
    }
}

impl From<BudgetRecord> for MonthlyBudget {
    fn from(record: BudgetRecord) -> Self {
        MonthlyBudget {
            month: record.month,
            amount: Money::from_major(record.amount),
            updated_at: record.updated_at,
        }
    }
}

/// Build a backend error, keeping the raw message for the log
pub(crate) fn backend_error(
    operation: &'static str,
    status: u16,
    message: impl Into<String>,
) -> GastosError {
    GastosError::Backend {
        operation,
        status,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_null_fields_become_empty() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "description": null,
            "amount": 15.5,
            "costCenter": "600-500-140",
            "date": "2025-01-10",
            "ddiCode": null,
            "created_at": "2025-01-10T12:00:00Z"
        }"#;
        let record: ExpenseRecord = serde_json::from_str(json).unwrap();
        let expense: Expense = record.into();

        assert_eq!(expense.description, "");
        assert_eq!(expense.ddi_code, "");
        assert_eq!(expense.amount, Money::from_cents(1550));
        assert_eq!(expense.cost_center, "600-500-140");
        assert!(!expense.has_receipt);
        assert!(expense.created_at.is_some());
    }

    #[test]
    fn test_payload_excludes_server_fields() {
        let expense = Expense {
            id: ExpenseId::new(),
            description: "Taxi".into(),
            amount: Money::from_cents(1550),
            cost_center: "600-500-140".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ddi_code: "DDI---".into(),
            has_receipt: true,
            created_at: Some(Utc::now()),
        };
        let value = serde_json::to_value(ExpensePayload::from(&expense)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["costCenter"], "600-500-140");
        assert_eq!(object["ddiCode"], "DDI---");
        assert_eq!(object["amount"], 15.5);
        assert_eq!(object["date"], "2025-01-10");
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("hasReceipt"));
        assert!(!object.contains_key("created_at"));
    }

    #[test]
    fn test_budget_record_conversion() {
        let budget = MonthlyBudget {
            month: Month::new(2025, 1).unwrap(),
            amount: Money::from_cents(250_000),
            updated_at: None,
        };
        let value = serde_json::to_value(BudgetRecord::from(&budget)).unwrap();
        assert_eq!(value["month"], "2025-01");
        assert_eq!(value["amount"], 2500.0);

        let record: BudgetRecord = serde_json::from_value(value).unwrap();
        assert_eq!(MonthlyBudget::from(record), budget);
    }
}
