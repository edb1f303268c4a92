pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod scheduler;
pub mod worker;
pub mod workload;

pub use config::SchedulerConfig;
pub use error::{Result, SchedError};
pub use scheduler::{Job, Scheduler};
