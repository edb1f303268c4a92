//! Ways to build the job list handed to the scheduler.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::error::{Result, SchedError};
use crate::scheduler::Job;

/// On-disk form of a job. Validated through [`Job::new`] on load.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub id: u64,
    pub burst_time: u64,
    pub priority: i64,
}

impl TryFrom<JobSpec> for Job {
    type Error = SchedError;

    fn try_from(spec: JobSpec) -> Result<Self> {
        Job::new(spec.id, spec.burst_time, spec.priority)
    }
}

/// The six-job reference workload: two full groups, no remainder.
pub fn demo_jobs() -> Vec<Job> {
    [(1, 5, 2), (2, 3, 1), (3, 8, 3), (4, 4, 2), (5, 6, 1), (6, 2, 3)]
        .into_iter()
        .filter_map(|(id, burst, priority)| Job::new(id, burst, priority).ok())
        .collect()
}

/// Parse `id:burst:priority`.
pub fn parse_job(spec: &str) -> Result<Job> {
    let parts: Vec<&str> = spec.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(SchedError::ParseJob(format!(
            "expected id:burst:priority, got {:?}",
            spec
        )));
    }

    let field = |name: &str, value: &str| {
        SchedError::ParseJob(format!("invalid {} {:?} in {:?}", name, value, spec))
    };
    let id: u64 = parts[0].parse().map_err(|_| field("id", parts[0]))?;
    let burst: u64 = parts[1].parse().map_err(|_| field("burst", parts[1]))?;
    let priority: i64 = parts[2].parse().map_err(|_| field("priority", parts[2]))?;

    Job::new(id, burst, priority)
}

/// Load a JSON array of `{id, burst_time, priority}` objects.
pub fn load_jobs_file(path: &Path) -> Result<Vec<Job>> {
    let data = std::fs::read_to_string(path)?;
    let specs: Vec<JobSpec> = serde_json::from_str(&data)?;
    specs.into_iter().map(Job::try_from).collect()
}

/// Generate `count` jobs with ids `1..=count`, burst in `1..=max_burst` and
/// priority in `0..=max_priority`. Same seed, same workload.
pub fn random_jobs(count: usize, max_burst: u64, max_priority: i64, seed: u64) -> Result<Vec<Job>> {
    if max_burst == 0 {
        return Err(SchedError::ParseJob("max burst must be positive".to_string()));
    }
    if max_priority < 0 {
        return Err(SchedError::ParseJob(
            "max priority must be non-negative".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count as u64)
        .map(|id| {
            let burst = rng.gen_range(1..=max_burst);
            let priority = rng.gen_range(0..=max_priority);
            Job::new(id, burst, priority)
        })
        .collect()
}
