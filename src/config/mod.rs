//! Configuration module for gastos
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Backend connection settings
//! - Display preferences

pub mod paths;
pub mod settings;

pub use paths::GastosPaths;
pub use settings::{BackendKind, BackendSettings, Settings};
