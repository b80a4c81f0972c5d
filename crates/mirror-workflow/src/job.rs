use std::fmt;

/// Outcome of a single provisioning job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Ok,
    Failed { message: String, details: String },
}

impl JobResult {
    pub fn failed(message: impl Into<String>, details: impl Into<String>) -> Self {
        JobResult::Failed {
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, JobResult::Ok)
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobResult::Ok => write!(f, "ok"),
            JobResult::Failed { message, details } if details.is_empty() => {
                write!(f, "{}", message)
            }
            JobResult::Failed { message, details } => write!(f, "{}: {}", message, details),
        }
    }
}

/// A deferred unit of provisioning work.
pub trait Job {
    fn pretty_name(&self) -> String;

    /// Runs the job. In dry-run mode nothing on the target may change.
    fn exec(&self, dry_run: bool) -> JobResult;
}

pub type JobList = Vec<Box<dyn Job>>;
