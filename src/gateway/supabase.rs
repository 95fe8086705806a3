//! Supabase gateway
//!
//! Talks to a hosted Supabase project: PostgREST for the `expenses` and
//! `monthly_budgets` tables and the Storage API for receipt images. Every
//! request carries the anon key as both `apikey` and bearer token.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};
use url::Url;

use super::{backend_error, BudgetRecord, DataGateway, ExpensePayload, ExpenseRecord};
use crate::config::BackendSettings;
use crate::error::{GastosError, GastosResult};
use crate::models::receipt::RECEIPT_CONTENT_TYPE;
use crate::models::{
    Expense, ExpenseId, Month, MonthlyBudget, NewExpense, ReceiptImage, ReceiptKey,
};

const EXPENSES_TABLE: &str = "expenses";
const BUDGETS_TABLE: &str = "monthly_budgets";
const LIST_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct CostCenterRow {
    #[serde(rename = "costCenter", default)]
    cost_center: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StorageObject {
    name: String,
}

/// Gateway over a Supabase project's REST APIs
pub struct SupabaseGateway {
    client: Client,
    base_url: String,
    bucket: String,
}

impl SupabaseGateway {
    /// Build a gateway from the backend settings
    pub fn from_settings(settings: &BackendSettings) -> GastosResult<Self> {
        let url = settings.url.as_deref().ok_or_else(|| {
            GastosError::Config("Supabase URL is not configured. Run 'gastos init --backend supabase --url <URL>'".into())
        })?;
        let key = settings.resolved_anon_key().ok_or_else(|| {
            GastosError::Config(
                "Supabase key is not configured. Set GASTOS_SUPABASE_KEY or anon_key in config.json"
                    .into(),
            )
        })?;

        Self::new(
            url,
            &key,
            &settings.receipts_bucket,
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn new(
        url: &str,
        anon_key: &str,
        bucket: &str,
        timeout: Option<Duration>,
    ) -> GastosResult<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| GastosError::Config(format!("Invalid Supabase URL '{}': {}", url, e)))?;

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(anon_key)
            .map_err(|_| GastosError::Config("Supabase key contains invalid characters".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", anon_key))
            .map_err(|_| GastosError::Config("Supabase key contains invalid characters".into()))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, key: &ReceiptKey) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            key.as_str()
        )
    }

    /// Send a request, turning non-2xx responses into backend errors
    fn send(&self, operation: &'static str, request: RequestBuilder) -> GastosResult<Response> {
        let response = request.send().map_err(|e| {
            error!(operation, error = %e, "request failed");
            GastosError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "request ok");
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        error!(operation, status = status.as_u16(), body = %body, "backend rejected request");
        Err(backend_error(operation, status.as_u16(), body))
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> GastosResult<T> {
        let response = self.send(operation, request)?;
        response.json::<T>().map_err(|e| {
            error!(operation, error = %e, "unreadable response body");
            GastosError::Http(format!("Unreadable response during {}: {}", operation, e))
        })
    }
}

impl DataGateway for SupabaseGateway {
    fn select_expenses(&self, from: NaiveDate, to: NaiveDate) -> GastosResult<Vec<Expense>> {
        let query = [
            ("select", "*".to_string()),
            ("date", format!("gte.{}", from)),
            ("date", format!("lte.{}", to)),
            ("order", "date.desc".to_string()),
        ];
        let rows: Vec<ExpenseRecord> = self.send_json(
            "select expenses",
            self.client.get(self.rest_url(EXPENSES_TABLE)).query(&query),
        )?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    fn insert_expense(&self, expense: &NewExpense) -> GastosResult<Expense> {
        let payload = ExpensePayload::from(expense);
        let rows: Vec<ExpenseRecord> = self.send_json(
            "insert expense",
            self.client
                .post(self.rest_url(EXPENSES_TABLE))
                .header("Prefer", "return=representation")
                .json(&[payload]),
        )?;
        rows.into_iter()
            .next()
            .map(Expense::from)
            .ok_or_else(|| backend_error("insert expense", 200, "no row returned"))
    }

    fn update_expense(&self, expense: &Expense) -> GastosResult<()> {
        let payload = ExpensePayload::from(expense);
        self.send(
            "update expense",
            self.client
                .patch(self.rest_url(EXPENSES_TABLE))
                .query(&[("id", format!("eq.{}", expense.id.as_uuid()))])
                .json(&payload),
        )?;
        Ok(())
    }

    fn delete_expense(&self, id: &ExpenseId) -> GastosResult<()> {
        self.send(
            "delete expense",
            self.client
                .delete(self.rest_url(EXPENSES_TABLE))
                .query(&[("id", format!("eq.{}", id.as_uuid()))]),
        )?;
        Ok(())
    }

    fn cost_centers(&self) -> GastosResult<Vec<String>> {
        let rows: Vec<CostCenterRow> = self.send_json(
            "select cost centers",
            self.client
                .get(self.rest_url(EXPENSES_TABLE))
                .query(&[("select", "costCenter"), ("costCenter", "not.is.null")]),
        )?;
        Ok(rows.into_iter().filter_map(|r| r.cost_center).collect())
    }

    fn get_budget(&self, month: Month) -> GastosResult<Option<MonthlyBudget>> {
        let rows: Vec<BudgetRecord> = self.send_json(
            "select budget",
            self.client
                .get(self.rest_url(BUDGETS_TABLE))
                .query(&[("select", "*".to_string()), ("month", format!("eq.{}", month))]),
        )?;
        Ok(rows.into_iter().next().map(MonthlyBudget::from))
    }

    fn upsert_budget(&self, budget: &MonthlyBudget) -> GastosResult<MonthlyBudget> {
        let mut record = BudgetRecord::from(budget);
        record.updated_at = Some(Utc::now());

        let rows: Vec<BudgetRecord> = self.send_json(
            "upsert budget",
            self.client
                .post(self.rest_url(BUDGETS_TABLE))
                .query(&[("on_conflict", "month")])
                .header("Prefer", "resolution=merge-duplicates,return=representation")
                .json(&[&record]),
        )?;
        Ok(rows
            .into_iter()
            .next()
            .map(MonthlyBudget::from)
            .unwrap_or_else(|| record.into()))
    }

    fn upload_receipt(&self, key: &ReceiptKey, image: &ReceiptImage) -> GastosResult<()> {
        self.send(
            "upload receipt",
            self.client
                .post(self.object_url(key))
                .header("x-upsert", "true")
                .header(CONTENT_TYPE, RECEIPT_CONTENT_TYPE)
                .body(image.bytes().to_vec()),
        )?;
        Ok(())
    }

    fn download_receipt(&self, key: &ReceiptKey) -> GastosResult<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(key))
            .send()
            .map_err(|e| {
                error!(operation = "download receipt", error = %e, "request failed");
                GastosError::from(e)
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GastosError::receipt_not_found(key.as_str()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            error!(operation = "download receipt", status, body = %body, "backend rejected request");
            return Err(backend_error("download receipt", status, body));
        }

        Ok(response.bytes()?.to_vec())
    }

    fn list_receipts(&self, prefix: &str) -> GastosResult<Vec<String>> {
        let objects: Vec<StorageObject> = self.send_json(
            "list receipts",
            self.client
                .post(format!(
                    "{}/storage/v1/object/list/{}",
                    self.base_url, self.bucket
                ))
                .json(&json!({ "prefix": "", "limit": LIST_LIMIT, "search": prefix })),
        )?;
        Ok(objects
            .into_iter()
            .map(|o| o.name)
            .filter(|name| name.starts_with(prefix))
            .collect())
    }

    fn delete_receipt(&self, key: &ReceiptKey) -> GastosResult<()> {
        self.send(
            "delete receipt",
            self.client
                .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket))
                .json(&json!({ "prefixes": [key.as_str()] })),
        )?;
        Ok(())
    }

    fn receipt_url(&self, key: &ReceiptKey) -> GastosResult<String> {
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            key.as_str()
        ))
    }
}
