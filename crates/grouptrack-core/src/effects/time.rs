//! Physical time trait definitions.
//!
//! Both suspension points of a run (the 2FA freshness wait and the roster
//! page throttle) sleep through this trait, so tests can drive a simulated
//! clock instead of the wall clock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// The system clock reads before the Unix epoch
    #[error("Clock is before the Unix epoch")]
    BeforeEpoch,
}

impl From<TimeError> for crate::TrackerError {
    fn from(err: TimeError) -> Self {
        crate::TrackerError::io(format!("clock: {err}"))
    }
}

/// Wall-clock reading in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
}

impl PhysicalTime {
    /// Create from a millisecond timestamp
    pub fn from_ms(ts_ms: u64) -> Self {
        Self { ts_ms }
    }

    /// Whole seconds since the Unix epoch
    pub fn unix_seconds(&self) -> u64 {
        self.ts_ms / 1000
    }
}

/// Wall-clock time and sleeping.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current wall-clock time
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError>;

    /// Suspend for `ms` milliseconds
    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError>;
}
