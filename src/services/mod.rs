//! Business logic layer for gastos
//!
//! The store owns the cached month; the form and list controllers drive
//! it from user input. Budget and metrics derive the month's gate and
//! totals.

pub mod budget;
pub mod events;
pub mod form;
pub mod list;
pub mod metrics;
pub mod notice;
pub mod store;

pub use budget::BudgetService;
pub use events::{EventBus, StoreEvent};
pub use form::{ExpenseForm, FormField, ReceiptUpload, SubmitOutcome};
pub use list::{
    CostCenterFilter, DetailsState, EditDraft, EditField, ExpenseList, ReceiptView,
};
pub use metrics::MonthMetrics;
pub use notice::{Notice, NoticeKind};
pub use store::{ExpenseStore, FetchSnapshot, FetchTicket};
