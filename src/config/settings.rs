//! User settings for gastos
//!
//! Manages backend connection details and display preferences.

use serde::{Deserialize, Serialize};

use super::paths::GastosPaths;
use crate::error::GastosError;

/// Environment variable that overrides the stored Supabase key
pub const SUPABASE_KEY_ENV: &str = "GASTOS_SUPABASE_KEY";

/// Which backend holds the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Directory-backed backend under the data directory
    #[default]
    Local,
    /// Hosted Supabase project (PostgREST + Storage)
    Supabase,
}

impl std::str::FromStr for BackendKind {
    type Err = GastosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "supabase" => Ok(Self::Supabase),
            other => Err(GastosError::Config(format!(
                "Unknown backend '{}'. Use 'local' or 'supabase'",
                other
            ))),
        }
    }
}

/// Connection settings for the remote data gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Backend kind
    #[serde(default)]
    pub kind: BackendKind,

    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Anon (public) API key; the environment variable takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Storage bucket holding receipt images
    #[serde(default = "default_receipts_bucket")]
    pub receipts_bucket: String,

    /// Optional request timeout. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: None,
            anon_key: None,
            receipts_bucket: default_receipts_bucket(),
            request_timeout_secs: None,
        }
    }
}

impl BackendSettings {
    /// Resolve the API key, preferring the environment
    pub fn resolved_anon_key(&self) -> Option<String> {
        std::env::var(SUPABASE_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.anon_key.clone())
    }
}

/// User settings for gastos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backend connection
    #[serde(default)]
    pub backend: BackendSettings,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Cost centers offered even before any expense references them
    #[serde(default = "default_cost_centers")]
    pub default_cost_centers: Vec<String>,

    /// tracing filter directive used when `GASTOS_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_receipts_bucket() -> String {
    "receipts".to_string()
}

fn default_currency() -> String {
    "₡".to_string()
}

fn default_date_format() -> String {
    "%d-%m-%Y".to_string()
}

fn default_cost_centers() -> Vec<String> {
    vec!["600-500-140".to_string(), "600-600-300".to_string()]
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: BackendSettings::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_cost_centers: default_cost_centers(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &GastosPaths) -> Result<Self, GastosError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| GastosError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                GastosError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GastosPaths) -> Result<(), GastosError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GastosError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| GastosError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
