//! Test gateway with switchable failures
//!
//! Wraps a [`LocalGateway`] in a temp directory and lets tests make single
//! operations fail or count how often they are called.

use std::cell::Cell;

use chrono::NaiveDate;
use tempfile::TempDir;

use super::{backend_error, DataGateway, LocalGateway};
use crate::config::GastosPaths;
use crate::error::GastosResult;
use crate::models::{
    Expense, ExpenseId, Money, Month, MonthlyBudget, NewExpense, ReceiptImage, ReceiptKey,
};

#[derive(Default)]
pub struct Faults {
    pub select: Cell<bool>,
    pub insert: Cell<bool>,
    pub update: Cell<bool>,
    pub delete: Cell<bool>,
    pub upload: Cell<bool>,
    pub list: Cell<bool>,
    pub delete_receipt: Cell<bool>,
    pub url: Cell<bool>,
}

pub struct TestGateway {
    _temp_dir: TempDir,
    inner: LocalGateway,
    pub faults: Faults,
    pub select_calls: Cell<usize>,
    pub list_calls: Cell<usize>,
    pub url_calls: Cell<usize>,
}

impl TestGateway {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let paths = GastosPaths::with_base_dir(temp_dir.path().to_path_buf());
        let inner = LocalGateway::open(&paths).expect("local gateway");
        Self {
            _temp_dir: temp_dir,
            inner,
            faults: Faults::default(),
            select_calls: Cell::new(0),
            list_calls: Cell::new(0),
            url_calls: Cell::new(0),
        }
    }

    /// Store a budget so expense entry is open for `month`
    pub fn open_month(&self, month: Month, cents: i64) {
        self.inner
            .upsert_budget(&MonthlyBudget::new(month, Money::from_cents(cents)))
            .expect("budget");
    }

    /// Insert an expense directly, bypassing any fault
    pub fn seed(&self, description: &str, cents: i64, center: &str, date: NaiveDate) -> Expense {
        self.inner
            .insert_expense(&NewExpense::new(
                description,
                Money::from_cents(cents),
                center,
                date,
            ))
            .expect("seed expense")
    }

    pub fn seed_receipt(&self, id: &ExpenseId) {
        let image = ReceiptImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xD9]).expect("jpeg");
        self.inner
            .upload_receipt(&ReceiptKey::for_expense(id), &image)
            .expect("seed receipt");
    }

    fn fail_if(flag: &Cell<bool>, operation: &'static str) -> GastosResult<()> {
        if flag.get() {
            Err(backend_error(operation, 500, "injected failure"))
        } else {
            Ok(())
        }
    }
}

impl DataGateway for TestGateway {
    fn select_expenses(&self, from: NaiveDate, to: NaiveDate) -> GastosResult<Vec<Expense>> {
        self.select_calls.set(self.select_calls.get() + 1);
        Self::fail_if(&self.faults.select, "select expenses")?;
        self.inner.select_expenses(from, to)
    }

    fn insert_expense(&self, expense: &NewExpense) -> GastosResult<Expense> {
        Self::fail_if(&self.faults.insert, "insert expense")?;
        self.inner.insert_expense(expense)
    }

    fn update_expense(&self, expense: &Expense) -> GastosResult<()> {
        Self::fail_if(&self.faults.update, "update expense")?;
        self.inner.update_expense(expense)
    }

    fn delete_expense(&self, id: &ExpenseId) -> GastosResult<()> {
        Self::fail_if(&self.faults.delete, "delete expense")?;
        self.inner.delete_expense(id)
    }

    fn cost_centers(&self) -> GastosResult<Vec<String>> {
        self.inner.cost_centers()
    }

    fn get_budget(&self, month: Month) -> GastosResult<Option<MonthlyBudget>> {
        self.inner.get_budget(month)
    }

    fn upsert_budget(&self, budget: &MonthlyBudget) -> GastosResult<MonthlyBudget> {
        self.inner.upsert_budget(budget)
    }

    fn upload_receipt(&self, key: &ReceiptKey, image: &ReceiptImage) -> GastosResult<()> {
        Self::fail_if(&self.faults.upload, "upload receipt")?;
        self.inner.upload_receipt(key, image)
    }

    fn download_receipt(&self, key: &ReceiptKey) -> GastosResult<Vec<u8>> {
        self.inner.download_receipt(key)
    }

    fn list_receipts(&self, prefix: &str) -> GastosResult<Vec<String>> {
        self.list_calls.set(self.list_calls.get() + 1);
        Self::fail_if(&self.faults.list, "list receipts")?;
        self.inner.list_receipts(prefix)
    }

    fn delete_receipt(&self, key: &ReceiptKey) -> GastosResult<()> {
        Self::fail_if(&self.faults.delete_receipt, "delete receipt")?;
        self.inner.delete_receipt(key)
    }

    fn receipt_url(&self, key: &ReceiptKey) -> GastosResult<String> {
        self.url_calls.set(self.url_calls.get() + 1);
        Self::fail_if(&self.faults.url, "receipt url")?;
        self.inner.receipt_url(key)
    }
}
