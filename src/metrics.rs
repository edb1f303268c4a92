//! Turnaround, waiting time and throughput for a finished run.

use serde::Serialize;

use crate::error::{Result, SchedError};
use crate::scheduler::ScheduleResults;

/// Per-job timing derived from a completed job.
#[derive(Debug, Clone, Serialize)]
pub struct JobMetrics {
    pub id: u64,
    pub burst_time: u64,
    pub priority: i64,
    pub is_leader: bool,
    pub start_time: f64,
    pub end_time: f64,
    /// `end_time - start_time`
    pub turnaround: f64,
    /// `turnaround - burst_time`
    pub waiting: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub jobs: Vec<JobMetrics>,
    pub total_processes: usize,
    pub total_execution_time: f64,
    /// `None` when no execution time was recorded.
    pub throughput: Option<f64>,
    pub average_turnaround: Option<f64>,
    pub average_waiting: Option<f64>,
    /// Latest end time across all jobs.
    pub makespan: f64,
}

/// Processed jobs per time-unit of accumulated execution time.
///
/// # Errors
///
/// Returns [`SchedError::EmptyMetrics`] when `total_execution_time` is zero.
pub fn throughput(total_processes: usize, total_execution_time: f64) -> Result<f64> {
    if total_execution_time <= 0.0 {
        return Err(SchedError::EmptyMetrics);
    }
    Ok(total_processes as f64 / total_execution_time)
}

impl MetricsReport {
    /// Compute the report for `results`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::IncompleteJob`] if a completed job lacks either
    /// timestamp.
    pub fn from_results(results: &ScheduleResults) -> Result<Self> {
        let mut jobs = Vec::with_capacity(results.completed.len());

        for job in &results.completed {
            let (start_time, end_time) = match (job.start_time, job.end_time) {
                (Some(start), Some(end)) => (start, end),
                _ => return Err(SchedError::IncompleteJob(job.id)),
            };
            let turnaround = end_time - start_time;

            jobs.push(JobMetrics {
                id: job.id,
                burst_time: job.burst_time,
                priority: job.priority,
                is_leader: job.is_leader,
                start_time,
                end_time,
                turnaround,
                waiting: turnaround - job.burst_time as f64,
            });
        }

        let throughput = match throughput(results.total_processes, results.total_execution_time) {
            Ok(value) => Some(value),
            Err(SchedError::EmptyMetrics) => None,
            Err(e) => return Err(e),
        };

        let average_turnaround = mean(jobs.iter().map(|j| j.turnaround));
        let average_waiting = mean(jobs.iter().map(|j| j.waiting));
        let makespan = jobs.iter().map(|j| j.end_time).fold(0.0, f64::max);

        Ok(Self {
            jobs,
            total_processes: results.total_processes,
            total_execution_time: results.total_execution_time,
            throughput,
            average_turnaround,
            average_waiting,
            makespan,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
