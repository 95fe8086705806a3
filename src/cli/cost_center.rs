//! Cost center CLI commands

use clap::Subcommand;
use tracing::warn;

use crate::config::Settings;
use crate::display::format_cost_centers;
use crate::error::GastosResult;
use crate::gateway::DataGateway;
use crate::models::CostCenterSet;

/// Cost center subcommands
#[derive(Subcommand)]
pub enum CostCenterCommands {
    /// List the configured defaults and every cost center used by an expense
    List,
}

/// Handle a cost center command
pub fn handle_cost_center_command(
    gateway: &dyn DataGateway,
    settings: &Settings,
    cmd: CostCenterCommands,
) -> GastosResult<()> {
    match cmd {
        CostCenterCommands::List => {
            let mut set = CostCenterSet::with_defaults(&settings.default_cost_centers);
            match gateway.cost_centers() {
                Ok(labels) => {
                    set.merge(labels);
                }
                Err(e) => warn!(error = %e, "failed to fetch cost centers"),
            }
            print!("{}", format_cost_centers(&set));
        }
    }

    Ok(())
}
