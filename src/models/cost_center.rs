//! Cost center labels
//!
//! Cost centers are plain strings. The set preserves first-seen order and
//! never holds the same label twice.

use crate::error::GastosError;

/// Labels offered before any expense references them
pub const DEFAULT_COST_CENTERS: [&str; 2] = ["600-500-140", "600-600-300"];

/// Insertion-ordered, de-duplicated set of cost-center labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostCenterSet {
    labels: Vec<String>,
}

impl CostCenterSet {
    /// An empty set
    pub fn empty() -> Self {
        Self { labels: Vec::new() }
    }

    /// A set seeded with the given defaults
    pub fn with_defaults<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        set.merge(defaults);
        set
    }

    /// Add a label if it is non-empty and unseen. Returns true if added.
    pub fn insert(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.labels.push(label.to_string());
        true
    }

    /// Merge many labels, returning true if any was new
    pub fn merge<I, S>(&mut self, labels: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changed = false;
        for label in labels {
            changed |= self.insert(label.as_ref());
        }
        changed
    }

    /// Validate and add a user-entered label
    pub fn add_new(&mut self, label: &str) -> Result<String, GastosError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(GastosError::Validation(
                "Cost center cannot be empty".into(),
            ));
        }
        if self.contains(label) {
            return Err(GastosError::duplicate_cost_center(label));
        }
        self.labels.push(label.to_string());
        Ok(label.to_string())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl Default for CostCenterSet {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_COST_CENTERS)
    }
}
