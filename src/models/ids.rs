//! Strongly-typed expense identifier
//!
//! The backend assigns identifiers; the newtype keeps them from being mixed
//! up with free-form strings such as cost-center labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix used when displaying short identifiers
pub const EXPENSE_ID_PREFIX: &str = "exp-";

/// Backend-assigned expense identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ID from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// First eight hex digits, used in short displays
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }

    /// Whether a user-typed fragment (`exp-1a2b`, `1a2b3c4d`, full UUID)
    /// refers to this ID
    pub fn matches_prefix(&self, fragment: &str) -> bool {
        let fragment = fragment.trim();
        let fragment = fragment.strip_prefix(EXPENSE_ID_PREFIX).unwrap_or(fragment);
        !fragment.is_empty() && self.0.to_string().starts_with(&fragment.to_lowercase())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", EXPENSE_ID_PREFIX, self.short())
    }
}

impl From<Uuid> for ExpenseId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(uuid) = Uuid::parse_str(s) {
            return Ok(Self(uuid));
        }
        let s = s.strip_prefix(EXPENSE_ID_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}
