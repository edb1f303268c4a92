use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("Invalid job {id}: {reason}")]
    InvalidJobSpec { id: u64, reason: String },

    #[error("Malformed job spec: {0}")]
    ParseJob(String),

    #[error("Job {0} is already known to the scheduler")]
    DuplicateJob(u64),

    #[error("Cannot add job {0}: scheduling has already started")]
    PrematureAdd(u64),

    #[error("Invalid scheduler config: {0}")]
    InvalidConfig(String),

    #[error("Group executor invoked with no jobs")]
    EmptyGroup,

    #[error("Group task failed: {0}")]
    TaskFailed(String),

    #[error("Delay of {0} time-units does not fit the clock")]
    DelayOverflow(f64),

    #[error("Scheduling aborted by an earlier failure: {0}")]
    Aborted(String),

    #[error("No execution time recorded, throughput is undefined")]
    EmptyMetrics,

    #[error("Job {0} is missing start or end time")]
    IncompleteJob(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedError>;
