use std::collections::VecDeque;

use crate::scheduler::job::Job;

/// FIFO of jobs waiting to run. Unbounded.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    jobs: VecDeque<Job>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job at the tail.
    pub fn push(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    /// Remove the job at the head.
    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    /// Remove up to `count` jobs from the head, preserving their order.
    pub fn draw(&mut self, count: usize) -> Vec<Job> {
        let take = count.min(self.jobs.len());
        self.jobs.drain(..take).collect()
    }

    /// Returns the current number of waiting jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if no jobs are waiting
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
