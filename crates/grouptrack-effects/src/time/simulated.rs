//! Simulated time effect handler for testing
//!
//! Sleeping advances the simulated clock instantly, so a run that would wait
//! several seconds on the wall clock completes immediately while still
//! observing the passage of time.

use async_trait::async_trait;
use grouptrack_core::effects::{PhysicalTime, PhysicalTimeEffects, TimeError};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SimulatedClock {
    now_ms: u64,
    sleeps: Vec<u64>,
}

/// Simulated time handler for testing and simulation
#[derive(Debug, Clone, Default)]
pub struct SimulatedTimeHandler {
    clock: Arc<Mutex<SimulatedClock>>,
}

impl SimulatedTimeHandler {
    /// Create a new simulated time handler starting at the given time
    pub fn new(start_time_ms: u64) -> Self {
        Self {
            clock: Arc::new(Mutex::new(SimulatedClock {
                now_ms: start_time_ms,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Create a simulated time handler starting at a whole Unix second
    pub fn at_unix_seconds(seconds: u64) -> Self {
        Self::new(seconds * 1000)
    }

    /// Advance simulated time without recording a sleep
    pub fn advance_time(&self, duration_ms: u64) {
        self.clock.lock().now_ms += duration_ms;
    }

    /// Current simulated time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.clock.lock().now_ms
    }

    /// Every sleep requested so far, in milliseconds
    pub fn sleeps(&self) -> Vec<u64> {
        self.clock.lock().sleeps.clone()
    }
}

#[async_trait]
impl PhysicalTimeEffects for SimulatedTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        Ok(PhysicalTime::from_ms(self.now_ms()))
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        let mut clock = self.clock.lock();
        clock.now_ms += ms;
        clock.sleeps.push(ms);
        Ok(())
    }
}
