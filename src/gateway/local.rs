//! Directory-backed gateway
//!
//! Keeps the expense and budget tables as JSON files under the data
//! directory and receipt images as files in `receipts/`. Used for offline
//! work and by the test suite.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::file_io::{read_json, write_bytes_atomic, write_json_atomic};
use super::{BudgetRecord, DataGateway, ExpensePayload, ExpenseRecord};
use crate::config::GastosPaths;
use crate::error::{GastosError, GastosResult};
use crate::models::{
    Expense, ExpenseId, Month, MonthlyBudget, NewExpense, ReceiptImage, ReceiptKey,
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ExpenseTable {
    expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct BudgetTable {
    budgets: Vec<BudgetRecord>,
}

/// Gateway over local files
pub struct LocalGateway {
    expenses_path: PathBuf,
    budgets_path: PathBuf,
    receipts_dir: PathBuf,
    expenses: RwLock<ExpenseTable>,
    budgets: RwLock<BudgetTable>,
}

impl LocalGateway {
    /// Open (and create if needed) the local backend
    pub fn open(paths: &GastosPaths) -> GastosResult<Self> {
        paths.ensure_directories()?;

        let expenses: ExpenseTable = read_json(paths.expenses_file())?;
        let budgets: BudgetTable = read_json(paths.budgets_file())?;
        debug!(
            expenses = expenses.expenses.len(),
            budgets = budgets.budgets.len(),
            "opened local backend"
        );

        Ok(Self {
            expenses_path: paths.expenses_file(),
            budgets_path: paths.budgets_file(),
            receipts_dir: paths.receipts_dir(),
            expenses: RwLock::new(expenses),
            budgets: RwLock::new(budgets),
        })
    }

    fn receipt_path(&self, key: &ReceiptKey) -> PathBuf {
        self.receipts_dir.join(key.as_str())
    }

    fn with_expenses<R>(
        &self,
        f: impl FnOnce(&mut ExpenseTable) -> GastosResult<R>,
    ) -> GastosResult<R> {
        let mut table = self
            .expenses
            .write()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        // Changes land in memory only once they are on disk
        let mut staged = table.clone();
        let result = f(&mut staged)?;
        write_json_atomic(&self.expenses_path, &staged)?;
        *table = staged;
        Ok(result)
    }
}

impl DataGateway for LocalGateway {
    fn select_expenses(&self, from: NaiveDate, to: NaiveDate) -> GastosResult<Vec<Expense>> {
        let table = self
            .expenses
            .read()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut rows: Vec<ExpenseRecord> = table
            .expenses
            .iter()
            .filter(|r| r.date >= from && r.date <= to)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    fn insert_expense(&self, expense: &NewExpense) -> GastosResult<Expense> {
        let record = ExpenseRecord::from_new(Uuid::new_v4(), expense, Utc::now());
        self.with_expenses(|table| {
            table.expenses.push(record.clone());
            Ok(())
        })?;
        Ok(record.into())
    }

    fn update_expense(&self, expense: &Expense) -> GastosResult<()> {
        let payload = ExpensePayload::from(expense);
        self.with_expenses(|table| {
            let row = table
                .expenses
                .iter_mut()
                .find(|r| r.id == *expense.id.as_uuid())
                .ok_or_else(|| GastosError::expense_not_found(expense.id.to_string()))?;
            row.apply(payload);
            Ok(())
        })
    }

    fn delete_expense(&self, id: &ExpenseId) -> GastosResult<()> {
        self.with_expenses(|table| {
            let before = table.expenses.len();
            table.expenses.retain(|r| r.id != *id.as_uuid());
            if table.expenses.len() == before {
                return Err(GastosError::expense_not_found(id.to_string()));
            }
            Ok(())
        })
    }

    fn cost_centers(&self) -> GastosResult<Vec<String>> {
        let table = self
            .expenses
            .read()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(table
            .expenses
            .iter()
            .filter_map(|r| r.cost_center.clone())
            .collect())
    }

    fn get_budget(&self, month: Month) -> GastosResult<Option<MonthlyBudget>> {
        let table = self
            .budgets
            .read()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(table
            .budgets
            .iter()
            .find(|b| b.month == month)
            .cloned()
            .map(MonthlyBudget::from))
    }

    fn upsert_budget(&self, budget: &MonthlyBudget) -> GastosResult<MonthlyBudget> {
        let mut table = self
            .budgets
            .write()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut record = BudgetRecord::from(budget);
        record.updated_at = Some(Utc::now());

        let mut staged = table.clone();
        match staged.budgets.iter_mut().find(|b| b.month == budget.month) {
            Some(existing) => *existing = record.clone(),
            None => staged.budgets.push(record.clone()),
        }
        write_json_atomic(&self.budgets_path, &staged)?;
        *table = staged;

        Ok(record.into())
    }

    fn upload_receipt(&self, key: &ReceiptKey, image: &ReceiptImage) -> GastosResult<()> {
        write_bytes_atomic(self.receipt_path(key), image.bytes())
    }

    fn download_receipt(&self, key: &ReceiptKey) -> GastosResult<Vec<u8>> {
        let path = self.receipt_path(key);
        if !path.exists() {
            return Err(GastosError::receipt_not_found(key.as_str()));
        }
        std::fs::read(&path)
            .map_err(|e| GastosError::Storage(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn list_receipts(&self, prefix: &str) -> GastosResult<Vec<String>> {
        if !self.receipts_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.receipts_dir).map_err(|e| {
            GastosError::Storage(format!("Failed to list receipts: {}", e))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| GastosError::Storage(format!("Failed to list receipts: {}", e)))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) && !name.ends_with(".tmp") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_receipt(&self, key: &ReceiptKey) -> GastosResult<()> {
        let path = self.receipt_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(key = %key, "receipt already absent");
                Ok(())
            }
            Err(e) => Err(GastosError::Storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn receipt_url(&self, key: &ReceiptKey) -> GastosResult<String> {
        let path = self.receipt_path(key);
        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };
        url::Url::from_file_path(&absolute)
            .map(|u| u.to_string())
            .map_err(|_| {
                GastosError::Storage(format!("Cannot build URL for {}", absolute.display()))
            })
    }
}
