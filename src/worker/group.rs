use std::time::Duration;

use futures::future::join_all;

use crate::config::SchedulerConfig;
use crate::error::{Result, SchedError};
use crate::events::Observers;
use crate::scheduler::job::{Job, Role};
use crate::scheduler::ordering::sort_group;
use crate::worker::clock::{pause, SimClock};
use crate::worker::ExecutionBatch;

/// Runs a drawn group as one leader and its followers, concurrently.
///
/// Protocol:
/// 1. Sort the group (longest burst first) and promote the head to leader
/// 2. Spawn one task per follower, then one for the leader
/// 3. Every task stamps its start time and counts `remaining_time` down to 0,
///    sleeping `unit_delay` per unit; the leader first waits
///    `leader_head_start` so the followers get ahead
/// 4. Join all tasks; only then is the group recorded, in sorted order
///
/// Each task owns its `Job` for the duration of the run and hands it back
/// through the join handle, so nothing is shared between tasks.
#[derive(Debug, Clone)]
pub struct GroupExecutor {
    clock: SimClock,
    scale_factor: f64,
    unit_delay: f64,
    leader_head_start: f64,
    observers: Observers,
}

impl GroupExecutor {
    pub fn new(clock: SimClock, config: &SchedulerConfig, observers: Observers) -> Self {
        Self {
            clock,
            scale_factor: config.scale_factor,
            unit_delay: config.unit_delay,
            leader_head_start: config.leader_head_start,
            observers,
        }
    }

    /// Execute `group` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::EmptyGroup`] if `group` is empty,
    /// [`SchedError::DelayOverflow`] if the protocol delays cannot be slept
    /// on the clock (checked before any member starts) and
    /// [`SchedError::TaskFailed`] if any member's task panicked.
    pub async fn run(&self, mut group: Vec<Job>) -> Result<ExecutionBatch> {
        if group.is_empty() {
            return Err(SchedError::EmptyGroup);
        }
        let head_start = self.clock.duration(self.leader_head_start)?;
        let step = self.clock.duration(self.unit_delay)?;

        sort_group(&mut group);
        let mut leader = group.remove(0);
        leader.promote_to_leader();
        let followers = group;

        self.observers.group_formed(&leader, &followers);

        let mut handles = Vec::with_capacity(followers.len() + 1);
        for follower in followers {
            handles.push(self.spawn_member(follower, Role::Follower, Duration::ZERO, step));
        }
        handles.push(self.spawn_member(leader, Role::Leader, head_start, step));

        let joined = join_all(handles).await;

        let mut finished = Vec::with_capacity(joined.len());
        for result in joined {
            match result {
                Ok(job) => finished.push(job),
                Err(e) => {
                    tracing::error!(error = %e, "Group member task failed");
                    return Err(SchedError::TaskFailed(e.to_string()));
                }
            }
        }

        // Handles were pushed followers-first; restore the sorted order.
        sort_group(&mut finished);

        let mut batch = ExecutionBatch::default();
        for job in finished {
            let cost = job.burst_time as f64 * self.scale_factor;
            batch.push(job, cost);
        }
        Ok(batch)
    }

    fn spawn_member(
        &self,
        mut job: Job,
        role: Role,
        head_start: Duration,
        step: Duration,
    ) -> tokio::task::JoinHandle<Job> {
        let clock = self.clock;
        let observers = self.observers.clone();

        tokio::spawn(async move {
            job.mark_started(clock.now());
            observers.job_started(&job, role);

            pause(head_start).await;

            while job.remaining_time > 0 {
                job.tick();
                observers.job_progressed(&job, role);
                pause(step).await;
            }

            job.mark_finished(clock.now());
            observers.job_completed(&job, role);
            job
        })
    }
}
