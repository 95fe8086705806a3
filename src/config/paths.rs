//! Path management for gastos
//!
//! Provides XDG-compliant path resolution for configuration, the local
//! backend data, and the log file.
//!
//! ## Path Resolution Order
//!
//! 1. `GASTOS_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/gastos` or `~/.config/gastos`
//! 3. Windows: `%APPDATA%\gastos`

use std::path::PathBuf;

use crate::error::GastosError;

/// Manages all paths used by gastos
#[derive(Debug, Clone)]
pub struct GastosPaths {
    /// Base directory for all gastos data
    base_dir: PathBuf,
}

impl GastosPaths {
    /// Create a new GastosPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, GastosError> {
        let base_dir = if let Ok(custom) = std::env::var("GASTOS_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create GastosPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/gastos/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory used by the local backend
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory where the local backend keeps receipt images
    pub fn receipts_dir(&self) -> PathBuf {
        self.data_dir().join("receipts")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the log file
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("gastos.log")
    }

    /// Get the path to expenses.json (local backend)
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Get the path to budgets.json (local backend)
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), GastosError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| GastosError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| GastosError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.receipts_dir()).map_err(|e| {
            GastosError::Io(format!("Failed to create receipts directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if gastos has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, GastosError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("gastos"));
    }
    let base = directories::BaseDirs::new()
        .ok_or_else(|| GastosError::Config("Could not determine home directory".into()))?;
    Ok(base.home_dir().join(".config").join("gastos"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, GastosError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| GastosError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("gastos"))
}
