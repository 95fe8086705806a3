//! Store event bus
//!
//! Publish/subscribe over std mpsc channels. Each subscriber gets its own
//! receiver; subscribers whose receiver was dropped are pruned on publish.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use crate::models::{ExpenseId, Month};

/// Changes to the expense store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The selected month changed and a fetch is in flight
    MonthChanged(Month),
    /// A fetch for the month completed and replaced the cache
    ExpensesLoaded { month: Month, count: usize },
    ExpenseAdded(ExpenseId),
    ExpenseUpdated(ExpenseId),
    ExpenseDeleted(ExpenseId),
    CostCentersChanged,
    /// A receipt was uploaded or removed
    ReceiptChanged(ExpenseId),
}

/// Fan-out of store events to any number of subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to all live subscribers
    pub fn publish(&self, event: StoreEvent) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }
}
