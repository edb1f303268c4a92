use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::error::{Result, SchedError};
use crate::events::{Observers, SchedulerObserver};
use crate::scheduler::job::Job;
use crate::scheduler::queue::ReadyQueue;
use crate::worker::{ExecutionBatch, GroupExecutor, SequentialExecutor, SimClock};

/// Where the scheduler is in its dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerPhase {
    Idle,
    Dispatching,
    Sequential,
    Grouping,
    Drained,
    /// An executor failed. Terminal: jobs of the failed batch are lost.
    Failed,
}

impl std::fmt::Display for SchedulerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerPhase::Idle => write!(f, "idle"),
            SchedulerPhase::Dispatching => write!(f, "dispatching"),
            SchedulerPhase::Sequential => write!(f, "sequential"),
            SchedulerPhase::Grouping => write!(f, "grouping"),
            SchedulerPhase::Drained => write!(f, "drained"),
            SchedulerPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Everything a reporter needs once the run is over.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResults {
    pub completed: Vec<Job>,
    pub total_execution_time: f64,
    pub total_processes: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Hybrid scheduler: sequential for short backlogs, leader/follower groups
/// otherwise.
///
/// Each dispatch cycle looks at the ready queue:
/// - fewer than `group_size` jobs: the sequential executor drains the queue
/// - otherwise: exactly one group of `group_size` is drawn and run
///
/// The loop ends when the queue is empty. Because the sequential pass runs
/// to empty, a run is always zero or more groups followed by at most one
/// sequential pass over the remainder.
#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    ready_queue: ReadyQueue,
    known_ids: HashSet<u64>,
    completed: Vec<Job>,
    total_execution_time: f64,
    total_processes: usize,
    phase: SchedulerPhase,
    observers: Observers,
    failure: Option<String>,
    clock: Option<SimClock>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::with_valid_config(SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            ready_queue: ReadyQueue::new(),
            known_ids: HashSet::new(),
            completed: Vec::new(),
            total_execution_time: 0.0,
            total_processes: 0,
            phase: SchedulerPhase::Idle,
            observers: Observers::new(),
            failure: None,
            clock: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Register an observer for job and group events.
    pub fn subscribe(&mut self, observer: Arc<dyn SchedulerObserver>) {
        self.observers.subscribe(observer);
    }

    /// Queue a job for the upcoming run.
    ///
    /// # Errors
    ///
    /// - [`SchedError::PrematureAdd`] once `schedule()` has been called
    /// - [`SchedError::DuplicateJob`] if a job with the same id is queued
    pub fn add(&mut self, job: Job) -> Result<()> {
        if self.phase != SchedulerPhase::Idle {
            tracing::warn!(
                job_id = job.id,
                phase = %self.phase,
                "Rejected job added after scheduling started"
            );
            return Err(SchedError::PrematureAdd(job.id));
        }
        if !self.known_ids.insert(job.id) {
            return Err(SchedError::DuplicateJob(job.id));
        }

        tracing::debug!(
            job_id = job.id,
            burst_time = job.burst_time,
            priority = job.priority,
            "Job added"
        );
        self.ready_queue.push(job);
        self.total_processes += 1;
        Ok(())
    }

    /// Run every queued job to completion.
    ///
    /// Calling this again on a drained scheduler is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::TaskFailed`] if a group member's task panicked
    /// and [`SchedError::DelayOverflow`] if a delay does not fit the clock.
    /// Either moves the scheduler to [`SchedulerPhase::Failed`]; the jobs of
    /// the failed batch are lost and every later call returns
    /// [`SchedError::Aborted`].
    pub async fn schedule(&mut self) -> Result<()> {
        match self.phase {
            SchedulerPhase::Drained => {
                tracing::debug!("Ready queue already drained, nothing to schedule");
                return Ok(());
            }
            SchedulerPhase::Failed => {
                let reason = self.failure.clone().unwrap_or_default();
                return Err(SchedError::Aborted(reason));
            }
            _ => {}
        }

        let time_unit = self.config.time_unit;
        let clock = *self.clock.get_or_insert_with(|| SimClock::start(time_unit));
        self.started_at.get_or_insert_with(Utc::now);

        let sequential = SequentialExecutor::new(clock, &self.config, self.observers.clone());
        let grouped = GroupExecutor::new(clock, &self.config, self.observers.clone());

        tracing::info!(
            jobs = self.ready_queue.len(),
            group_size = self.config.group_size,
            "Scheduling started"
        );

        if let Err(e) = self.dispatch(&sequential, &grouped).await {
            tracing::error!(error = %e, phase = %self.phase, "Scheduling failed");
            self.phase = SchedulerPhase::Failed;
            self.failure = Some(e.to_string());
            return Err(e);
        }

        self.phase = SchedulerPhase::Drained;
        self.finished_at = Some(Utc::now());
        tracing::info!(
            completed = self.completed.len(),
            total_execution_time = self.total_execution_time,
            "Scheduling complete"
        );
        Ok(())
    }

    async fn dispatch(
        &mut self,
        sequential: &SequentialExecutor,
        grouped: &GroupExecutor,
    ) -> Result<()> {
        let group_size = self.config.group_size;
        loop {
            self.phase = SchedulerPhase::Dispatching;
            let depth = self.ready_queue.len();
            if depth == 0 {
                break;
            }

            if depth < group_size {
                self.phase = SchedulerPhase::Sequential;
                tracing::debug!(depth, "Dispatching sequential pass");
                let batch = sequential.drain(&mut self.ready_queue).await?;
                self.record(batch);
            } else {
                self.phase = SchedulerPhase::Grouping;
                tracing::debug!(depth, "Dispatching group");
                let group = self.ready_queue.draw(group_size);
                let batch = grouped.run(group).await?;
                self.record(batch);
            }
        }
        Ok(())
    }

    fn record(&mut self, batch: ExecutionBatch) {
        self.total_execution_time += batch.execution_time;
        self.completed.extend(batch.jobs);
    }

    /// Snapshot of the run for the metrics reporter.
    pub fn results(&self) -> ScheduleResults {
        ScheduleResults {
            completed: self.completed.clone(),
            total_execution_time: self.total_execution_time,
            total_processes: self.total_processes,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }

    /// Consume the scheduler, returning its results without cloning.
    pub fn into_results(self) -> ScheduleResults {
        ScheduleResults {
            completed: self.completed,
            total_execution_time: self.total_execution_time,
            total_processes: self.total_processes,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Why the run failed, once the scheduler is in [`SchedulerPhase::Failed`].
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn pending(&self) -> usize {
        self.ready_queue.len()
    }

    pub fn completed(&self) -> &[Job] {
        &self.completed
    }

    pub fn total_execution_time(&self) -> f64 {
        self.total_execution_time
    }

    pub fn total_processes(&self) -> usize {
        self.total_processes
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scheduler_is_idle() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.phase(), SchedulerPhase::Idle);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.total_processes(), 0);
        assert!(scheduler.completed().is_empty());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SchedulerConfig::default().with_group_size(0);
        assert!(matches!(
            Scheduler::new(config),
            Err(SchedError::InvalidConfig(_))
        ));
    }

    #[test]
    fn add_counts_jobs() {
        let mut scheduler = Scheduler::default();
        scheduler.add(Job::new(1, 2, 0).unwrap()).unwrap();
        scheduler.add(Job::new(2, 2, 0).unwrap()).unwrap();
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.total_processes(), 2);
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut scheduler = Scheduler::default();
        scheduler.add(Job::new(1, 2, 0).unwrap()).unwrap();
        let err = scheduler.add(Job::new(1, 4, 1).unwrap()).unwrap_err();
        assert!(matches!(err, SchedError::DuplicateJob(1)));
        assert_eq!(scheduler.total_processes(), 1);
    }

    #[test]
    fn phase_display() {
        assert_eq!(SchedulerPhase::Idle.to_string(), "idle");
        assert_eq!(SchedulerPhase::Grouping.to_string(), "grouping");
        assert_eq!(SchedulerPhase::Drained.to_string(), "drained");
        assert_eq!(SchedulerPhase::Failed.to_string(), "failed");
    }
}
