//! Terminal User Interface module
//!
//! An interactive view of one month: month selector, budget metrics,
//! filterable expense table and dialogs for adding, editing, inspecting
//! and deleting expenses.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
