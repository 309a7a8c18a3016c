//! UTC timestamps for session lifecycle markers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point in time, pinned to UTC.
///
/// Ordering and equality come straight from the wrapped datetime, so the
/// session's created/updated markers compare chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Captures the current instant.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wraps an existing UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Borrows the wrapped datetime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
