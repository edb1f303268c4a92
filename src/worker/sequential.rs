use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::events::Observers;
use crate::scheduler::job::Role;
use crate::scheduler::queue::ReadyQueue;
use crate::worker::clock::{pause, SimClock};
use crate::worker::ExecutionBatch;

/// Runs jobs one at a time to completion.
///
/// Sequential runs are a single blocking delay of `burst_time * scale_factor`
/// time-units; `remaining_time` is left untouched.
#[derive(Debug, Clone)]
pub struct SequentialExecutor {
    clock: SimClock,
    scale_factor: f64,
    observers: Observers,
}

impl SequentialExecutor {
    pub fn new(clock: SimClock, config: &SchedulerConfig, observers: Observers) -> Self {
        Self {
            clock,
            scale_factor: config.scale_factor,
            observers,
        }
    }

    /// Pop and run jobs from the head of `queue` until it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::DelayOverflow`](crate::error::SchedError::DelayOverflow)
    /// if a job's cost cannot be slept on the clock. That job is never
    /// started.
    pub async fn drain(&self, queue: &mut ReadyQueue) -> Result<ExecutionBatch> {
        let mut batch = ExecutionBatch::default();

        while let Some(mut job) = queue.pop() {
            let cost = job.burst_time as f64 * self.scale_factor;
            let delay = self.clock.duration(cost)?;

            job.mark_started(self.clock.now());
            self.observers.job_started(&job, Role::Sequential);
            tracing::debug!(job_id = job.id, cost, "Running job sequentially");

            pause(delay).await;

            job.mark_finished(self.clock.now());
            self.observers.job_completed(&job, Role::Sequential);

            batch.push(job, cost);
        }

        Ok(batch)
    }
}
