use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Result, SchedError};

/// Simulated clock measured in time-units since the scheduler started.
///
/// Backed by the tokio clock, so a paused runtime advances it
/// deterministically.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    origin: Instant,
    time_unit: Duration,
}

impl SimClock {
    pub fn start(time_unit: Duration) -> Self {
        Self {
            origin: Instant::now(),
            time_unit,
        }
    }

    /// Time-units elapsed since `start`.
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() / self.time_unit.as_secs_f64()
    }

    /// Wall duration of `units` time-units. Non-positive spans are zero.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::DelayOverflow`] if the duration is not
    /// representable.
    pub fn duration(&self, units: f64) -> Result<Duration> {
        if units <= 0.0 {
            return Ok(Duration::ZERO);
        }
        Duration::try_from_secs_f64(self.time_unit.as_secs_f64() * units)
            .map_err(|_| SchedError::DelayOverflow(units))
    }
}

/// Sleep on the tokio clock, skipping the timer entirely for a zero delay.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
