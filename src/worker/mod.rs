//! Execution strategies driven by the scheduler.
//!
//! - [`SequentialExecutor`]: drains the ready queue one job at a time
//! - [`GroupExecutor`]: runs a leader and its followers as concurrent tasks
//!   and joins them before returning
//!
//! Both return an [`ExecutionBatch`]; the scheduler alone appends it to its
//! completed list, so executors never touch scheduler state.

pub mod clock;
pub mod group;
pub mod sequential;

pub use clock::SimClock;
pub use group::GroupExecutor;
pub use sequential::SequentialExecutor;

use crate::scheduler::job::Job;

/// Jobs finished by one executor call, in completion-list order.
#[derive(Debug, Default)]
pub struct ExecutionBatch {
    pub jobs: Vec<Job>,
    /// Sum of `burst_time * scale_factor` over `jobs`.
    pub execution_time: f64,
}

impl ExecutionBatch {
    pub fn push(&mut self, job: Job, cost: f64) {
        self.execution_time += cost;
        self.jobs.push(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
