//! Shared domain types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier type used across the domain
pub type Id = Uuid;

/// Generate a fresh random identifier
pub fn new_id() -> Id {
    Uuid::new_v4()
}

/// Unix timestamp in seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn as_secs(self) -> i64 {
        self.0
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
