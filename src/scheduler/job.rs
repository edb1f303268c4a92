use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Result, SchedError};

/// How a job was run. Only `Leader` is recorded on the job itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sequential,
    Leader,
    Follower,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Sequential => write!(f, "sequential"),
            Role::Leader => write!(f, "leader"),
            Role::Follower => write!(f, "follower"),
        }
    }
}

/// One schedulable unit of work.
///
/// Timestamps are simulated time-units since the scheduler started.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: u64,
    pub burst_time: u64,
    pub priority: i64,
    pub remaining_time: u64,
    pub is_leader: bool,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl Job {
    pub fn new(id: u64, burst_time: u64, priority: i64) -> Result<Self> {
        if burst_time == 0 {
            return Err(SchedError::InvalidJobSpec {
                id,
                reason: "burst time must be positive".to_string(),
            });
        }
        if priority < 0 {
            return Err(SchedError::InvalidJobSpec {
                id,
                reason: format!("priority must be non-negative, got {}", priority),
            });
        }

        Ok(Self {
            id,
            burst_time,
            priority,
            remaining_time: burst_time,
            is_leader: false,
            start_time: None,
            end_time: None,
        })
    }

    /// Set the start timestamp. Later calls keep the first value.
    pub fn mark_started(&mut self, at: f64) {
        if self.start_time.is_none() {
            self.start_time = Some(at);
        }
    }

    /// Set the end timestamp. Later calls keep the first value.
    pub fn mark_finished(&mut self, at: f64) {
        if self.end_time.is_none() {
            self.end_time = Some(at);
        }
    }

    pub fn promote_to_leader(&mut self) {
        self.is_leader = true;
    }

    /// Consume one unit of remaining work. Returns the units still left.
    pub fn tick(&mut self) -> u64 {
        self.remaining_time = self.remaining_time.saturating_sub(1);
        self.remaining_time
    }
}

// Natural order: shortest burst first, higher priority value wins ties.
// The id keeps the order total so it agrees with Eq.
impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        self.burst_time
            .cmp(&other.burst_time)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Job {}
