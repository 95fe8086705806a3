//! Log setup
//!
//! Events go to `gastos.log` in the base directory so the TUI owns the
//! terminal. `GASTOS_LOG` takes precedence over the configured filter.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{GastosPaths, Settings};
use crate::error::{GastosError, GastosResult};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "GASTOS_LOG";

/// Build the filter from the environment or the settings
pub fn build_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to the log file
pub fn init_logging(paths: &GastosPaths, settings: &Settings) -> GastosResult<()> {
    std::fs::create_dir_all(paths.base_dir())
        .map_err(|e| GastosError::Io(format!("Failed to create base directory: {}", e)))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths.log_file())
        .map_err(|e| GastosError::Io(format!("Failed to open log file: {}", e)))?;

    tracing_subscriber::registry()
        .with(build_filter(settings))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| GastosError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(())
}
