//! Month summary command

use super::{load_store, resolve_month};
use crate::config::Settings;
use crate::display::{format_summary, DisplayOptions};
use crate::error::GastosResult;
use crate::gateway::DataGateway;
use crate::services::{BudgetService, MonthMetrics};

/// Print totals and budget usage for a month
pub fn handle_summary_command(
    gateway: &dyn DataGateway,
    settings: &Settings,
    month: Option<String>,
) -> GastosResult<()> {
    let month = resolve_month(month.as_deref())?;
    let gate = BudgetService::new(gateway).gate(month)?;
    let store = load_store(gateway, settings, month)?;

    let metrics = MonthMetrics::compute(month, store.expenses(), gate);
    print!(
        "{}",
        format_summary(&metrics, &DisplayOptions::from_settings(settings))
    );
    Ok(())
}
