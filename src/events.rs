//! Progress reporting for a scheduling run.
//!
//! Executors never print. They call into a set of [`SchedulerObserver`]s,
//! which may log ([`TracingObserver`]), forward to a channel
//! ([`ChannelObserver`]) or drive an external reporter.
//!
//! Group members report from their own tasks, so observers must be
//! `Send + Sync` and calls for different jobs may interleave.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::scheduler::job::{Job, Role};

/// Hooks invoked while jobs move through the executors. All default to no-ops.
pub trait SchedulerObserver: Send + Sync {
    fn on_job_start(&self, _job: &Job, _role: Role) {}

    /// A group member consumed one unit of work.
    fn on_job_progress(&self, _job: &Job, _role: Role) {}

    fn on_job_complete(&self, _job: &Job, _role: Role) {}

    fn on_group_formed(&self, _leader: &Job, _followers: &[Job]) {}
}

/// Owned snapshot of an observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    JobStarted {
        job_id: u64,
        role: Role,
        at: f64,
    },
    JobProgress {
        job_id: u64,
        role: Role,
        remaining: u64,
    },
    JobCompleted {
        job_id: u64,
        role: Role,
        at: f64,
    },
    GroupFormed {
        leader: u64,
        followers: Vec<u64>,
    },
}

/// Logs every callback through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SchedulerObserver for TracingObserver {
    fn on_job_start(&self, job: &Job, role: Role) {
        tracing::info!(
            job_id = job.id,
            burst_time = job.burst_time,
            priority = job.priority,
            role = %role,
            "Executing job"
        );
    }

    fn on_job_progress(&self, job: &Job, role: Role) {
        tracing::trace!(
            job_id = job.id,
            role = %role,
            remaining = job.remaining_time,
            "Job progressed"
        );
    }

    fn on_job_complete(&self, job: &Job, role: Role) {
        tracing::info!(
            job_id = job.id,
            role = %role,
            start_time = ?job.start_time,
            end_time = ?job.end_time,
            "Job completed"
        );
    }

    fn on_group_formed(&self, leader: &Job, followers: &[Job]) {
        tracing::info!(
            leader = leader.id,
            followers = ?followers.iter().map(|j| j.id).collect::<Vec<_>>(),
            "Group created"
        );
    }
}

/// Forwards callbacks as [`SchedulerEvent`]s. Events sent after the
/// receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SchedulerEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<SchedulerEvent>) -> Self {
        Self { tx }
    }

    /// Create an observer together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SchedulerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: SchedulerEvent) {
        // Receiver dropped, nobody is listening
        let _ = self.tx.send(event);
    }
}

impl SchedulerObserver for ChannelObserver {
    fn on_job_start(&self, job: &Job, role: Role) {
        self.send(SchedulerEvent::JobStarted {
            job_id: job.id,
            role,
            at: job.start_time.unwrap_or_default(),
        });
    }

    fn on_job_progress(&self, job: &Job, role: Role) {
        self.send(SchedulerEvent::JobProgress {
            job_id: job.id,
            role,
            remaining: job.remaining_time,
        });
    }

    fn on_job_complete(&self, job: &Job, role: Role) {
        self.send(SchedulerEvent::JobCompleted {
            job_id: job.id,
            role,
            at: job.end_time.unwrap_or_default(),
        });
    }

    fn on_group_formed(&self, leader: &Job, followers: &[Job]) {
        self.send(SchedulerEvent::GroupFormed {
            leader: leader.id,
            followers: followers.iter().map(|j| j.id).collect(),
        });
    }
}

/// Fan-out over every subscribed observer. Cheap to clone into tasks.
#[derive(Clone, Default)]
pub struct Observers {
    subscribers: Vec<Arc<dyn SchedulerObserver>>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn SchedulerObserver>) {
        self.subscribers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn job_started(&self, job: &Job, role: Role) {
        for observer in &self.subscribers {
            observer.on_job_start(job, role);
        }
    }

    pub fn job_progressed(&self, job: &Job, role: Role) {
        for observer in &self.subscribers {
            observer.on_job_progress(job, role);
        }
    }

    pub fn job_completed(&self, job: &Job, role: Role) {
        for observer in &self.subscribers {
            observer.on_job_complete(job, role);
        }
    }

    pub fn group_formed(&self, leader: &Job, followers: &[Job]) {
        for observer in &self.subscribers {
            observer.on_group_formed(leader, followers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_observer_forwards_events() {
        let (observer, mut rx) = ChannelObserver::channel();
        let mut observers = Observers::new();
        observers.subscribe(Arc::new(observer));

        let mut job = Job::new(1, 2, 0).unwrap();
        job.mark_started(0.5);
        observers.job_started(&job, Role::Sequential);
        job.tick();
        observers.job_progressed(&job, Role::Sequential);
        job.mark_finished(1.5);
        observers.job_completed(&job, Role::Sequential);

        assert_eq!(
            rx.try_recv().unwrap(),
            SchedulerEvent::JobStarted {
                job_id: 1,
                role: Role::Sequential,
                at: 0.5
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SchedulerEvent::JobProgress {
                job_id: 1,
                role: Role::Sequential,
                remaining: 1
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SchedulerEvent::JobCompleted {
                job_id: 1,
                role: Role::Sequential,
                at: 1.5
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn group_formed_lists_follower_ids() {
        let (observer, mut rx) = ChannelObserver::channel();
        let leader = Job::new(3, 8, 3).unwrap();
        let followers = vec![Job::new(1, 5, 2).unwrap(), Job::new(2, 3, 1).unwrap()];

        observer.on_group_formed(&leader, &followers);

        assert_eq!(
            rx.try_recv().unwrap(),
            SchedulerEvent::GroupFormed {
                leader: 3,
                followers: vec![1, 2]
            }
        );
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (observer, rx) = ChannelObserver::channel();
        drop(rx);
        let job = Job::new(1, 1, 0).unwrap();
        observer.on_job_start(&job, Role::Leader);
    }

    #[test]
    fn fan_out_reaches_every_subscriber() {
        let (first, mut rx1) = ChannelObserver::channel();
        let (second, mut rx2) = ChannelObserver::channel();
        let mut observers = Observers::new();
        observers.subscribe(Arc::new(first));
        observers.subscribe(Arc::new(second));
        observers.subscribe(Arc::new(TracingObserver));
        assert_eq!(observers.len(), 3);

        let job = Job::new(9, 1, 0).unwrap();
        observers.job_completed(&job, Role::Follower);

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
