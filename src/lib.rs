//! gastos - Terminal expense tracker for monthly cost-center budgets
//!
//! This library provides the core functionality for the gastos application.
//! Expenses are recorded against cost centers, optionally with a receipt
//! photo, and a monthly budget must be set before a month accepts entries.
//! All durable state lives behind a [`gateway::DataGateway`]: a hosted
//! Supabase project or a local directory.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: tracing subscriber setup
//! - `models`: Core data models (expenses, budgets, DDI codes, receipts)
//! - `gateway`: Backend access (Supabase REST and local files)
//! - `services`: Expense store, form and list controllers, budgets, metrics
//! - `display`: CLI output formatting
//! - `cli`: CLI command handlers
//! - `tui`: Interactive terminal interface
//!
//! # Example
//!
//! ```rust,ignore
//! use gastos_cli::config::{GastosPaths, Settings};
//! use gastos_cli::gateway::open_gateway;
//!
//! let paths = GastosPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let gateway = open_gateway(&paths, &settings)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod services;
pub mod tui;

pub use error::{GastosError, GastosResult};
