use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use gastos_cli::cli::{
    handle_budget_command, handle_cost_center_command, handle_expense_command,
    handle_summary_command, BudgetCommands, CostCenterCommands, ExpenseCommands,
};
use gastos_cli::config::{BackendKind, GastosPaths, Settings};
use gastos_cli::gateway::open_gateway;
use gastos_cli::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "gastos",
    author = "Kaylee Beyene",
    version,
    about = "Terminal expense tracker for monthly cost-center budgets",
    long_about = "gastos records monthly expenses against cost centers, keeps \
                  receipt photos next to them, and gates expense entry on a \
                  monthly budget. Data lives in a Supabase project or in a \
                  local directory."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI (default)
    #[command(alias = "ui")]
    Tui,

    /// Initialize configuration and the selected backend
    Init {
        /// Backend to use: local or supabase
        #[arg(short, long)]
        backend: Option<String>,
        /// Supabase project URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Cost center commands
    #[command(subcommand, alias = "cc")]
    CostCenter(CostCenterCommands),

    /// Totals and budget usage for a month
    Summary {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = GastosPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // The log file is a convenience; commands still run without it
    if let Err(e) = init_logging(&paths, &settings) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match cli.command {
        Some(Commands::Init { backend, url }) => {
            if let Some(kind) = backend {
                settings.backend.kind = kind.parse()?;
            }
            if url.is_some() {
                settings.backend.url = url;
            }
            if settings.backend.kind == BackendKind::Supabase && settings.backend.url.is_none() {
                bail!("The supabase backend needs a project URL (--url)");
            }

            println!("Initializing gastos at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            open_gateway(&paths, &settings)?;

            println!("Initialization complete!");
            println!();
            match settings.backend.kind {
                BackendKind::Local => {
                    println!("Data is stored in {}", paths.data_dir().display());
                }
                BackendKind::Supabase => {
                    println!(
                        "Using Supabase project {}",
                        settings.backend.url.as_deref().unwrap_or_default()
                    );
                    if settings.backend.resolved_anon_key().is_none() {
                        println!("Set GASTOS_SUPABASE_KEY or add anon_key to the settings file.");
                    }
                }
            }
            println!();
            println!("Run 'gastos budget set <AMOUNT>' to open this month for expenses.");
        }
        Some(Commands::Config) => {
            println!("gastos Configuration");
            println!("====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Log file:        {}", paths.log_file().display());
            println!(
                "Initialized:     {}",
                if paths.is_initialized() { "yes" } else { "no (run 'gastos init')" }
            );
            println!();
            println!("Settings:");
            println!("  Backend:         {:?}", settings.backend.kind);
            if let Some(ref url) = settings.backend.url {
                println!("  Supabase URL:    {}", url);
            }
            println!("  Receipts bucket: {}", settings.backend.receipts_bucket);
            println!("  Currency:        {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Log filter:      {}", settings.log_filter);
        }
        command => {
            let gateway = open_gateway(&paths, &settings)?;
            let gateway = gateway.as_ref();

            match command {
                Some(Commands::Expense(cmd)) => handle_expense_command(gateway, &settings, cmd)?,
                Some(Commands::Budget(cmd)) => handle_budget_command(gateway, &settings, cmd)?,
                Some(Commands::CostCenter(cmd)) => {
                    handle_cost_center_command(gateway, &settings, cmd)?
                }
                Some(Commands::Summary { month }) => {
                    handle_summary_command(gateway, &settings, month)?
                }
                _ => gastos_cli::tui::run_tui(gateway, &settings, &paths)?,
            }
        }
    }

    Ok(())
}
