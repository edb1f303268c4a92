use std::time::Duration;

use crate::error::{Result, SchedError};

/// Configuration for the hybrid scheduler.
///
/// All delays are expressed in simulated time-units. One time-unit maps to
/// `time_unit` of wall time on the tokio clock, so tests can shrink or pause
/// it without touching the scheduling policy.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Jobs drawn per group. Backlogs shorter than this run sequentially.
    pub group_size: usize,
    /// Time-units charged per unit of burst time.
    pub scale_factor: f64,
    /// Delay per decrement in a group member's countdown loop.
    pub unit_delay: f64,
    /// Head-start the followers get before the leader starts counting down.
    pub leader_head_start: f64,
    /// Wall duration of one simulated time-unit.
    pub time_unit: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            group_size: 3,
            scale_factor: 0.1,
            unit_delay: 0.1,
            leader_head_start: 0.5,
            time_unit: Duration::from_secs(1),
        }
    }
}

impl SchedulerConfig {
    pub fn new(time_unit: Duration) -> Self {
        Self {
            time_unit,
            ..Default::default()
        }
    }

    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_unit_delay(mut self, unit_delay: f64) -> Self {
        self.unit_delay = unit_delay;
        self
    }

    pub fn with_leader_head_start(mut self, leader_head_start: f64) -> Self {
        self.leader_head_start = leader_head_start;
        self
    }

    /// Reject settings that would make the simulated clock meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(SchedError::InvalidConfig(
                "group_size must be at least 1".to_string(),
            ));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(SchedError::InvalidConfig(format!(
                "scale_factor must be positive, got {}",
                self.scale_factor
            )));
        }
        if !(self.unit_delay.is_finite() && self.unit_delay >= 0.0) {
            return Err(SchedError::InvalidConfig(format!(
                "unit_delay must be non-negative, got {}",
                self.unit_delay
            )));
        }
        if !(self.leader_head_start.is_finite() && self.leader_head_start >= 0.0) {
            return Err(SchedError::InvalidConfig(format!(
                "leader_head_start must be non-negative, got {}",
                self.leader_head_start
            )));
        }
        if self.time_unit.is_zero() {
            return Err(SchedError::InvalidConfig(
                "time_unit must be non-zero".to_string(),
            ));
        }
        for (name, units) in [
            ("unit_delay", self.unit_delay),
            ("leader_head_start", self.leader_head_start),
        ] {
            if Duration::try_from_secs_f64(self.time_unit.as_secs_f64() * units).is_err() {
                return Err(SchedError::InvalidConfig(format!(
                    "{name} of {units} time-units overflows the clock"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_config_default() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.group_size, 3);
        assert_eq!(cfg.scale_factor, 0.1);
        assert_eq!(cfg.unit_delay, 0.1);
        assert_eq!(cfg.leader_head_start, 0.5);
        assert_eq!(cfg.time_unit, Duration::from_secs(1));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn scheduler_config_new() {
        let cfg = SchedulerConfig::new(Duration::from_millis(10));
        assert_eq!(cfg.time_unit, Duration::from_millis(10));
        assert_eq!(cfg.group_size, 3);
    }

    #[test]
    fn scheduler_config_builders() {
        let cfg = SchedulerConfig::default()
            .with_group_size(4)
            .with_scale_factor(0.2)
            .with_unit_delay(0.05)
            .with_leader_head_start(1.0);
        assert_eq!(cfg.group_size, 4);
        assert_eq!(cfg.scale_factor, 0.2);
        assert_eq!(cfg.unit_delay, 0.05);
        assert_eq!(cfg.leader_head_start, 1.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_group_size_is_rejected() {
        let cfg = SchedulerConfig::default().with_group_size(0);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));
    }

    #[test]
    fn non_positive_scale_factor_is_rejected() {
        let cfg = SchedulerConfig::default().with_scale_factor(0.0);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));

        let cfg = SchedulerConfig::default().with_scale_factor(f64::NAN);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));
    }

    #[test]
    fn negative_delays_are_rejected() {
        let cfg = SchedulerConfig::default().with_unit_delay(-0.1);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));

        let cfg = SchedulerConfig::default().with_leader_head_start(-1.0);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_delays_are_rejected() {
        let cfg = SchedulerConfig::default().with_unit_delay(1e30);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));

        let cfg = SchedulerConfig::default().with_leader_head_start(1e30);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));
    }

    #[test]
    fn zero_time_unit_is_rejected() {
        let cfg = SchedulerConfig::new(Duration::ZERO);
        assert!(matches!(cfg.validate(), Err(SchedError::InvalidConfig(_))));
    }
}
