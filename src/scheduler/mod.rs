pub mod dispatch;
pub mod job;
pub mod ordering;
pub mod queue;

pub use dispatch::{ScheduleResults, Scheduler, SchedulerPhase};
pub use job::{Job, Role};
pub use queue::ReadyQueue;
