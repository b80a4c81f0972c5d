use crate::job::{Job, JobResult};

/// Name and result of the job that stopped the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub job: String,
    pub result: JobResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub completed: Vec<String>,
    pub failure: Option<JobFailure>,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs provisioning jobs in order, stopping at the first failure.
pub struct JobQueue {
    dry_run: bool,
}

impl JobQueue {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn run(&self, jobs: &[Box<dyn Job>]) -> JobReport {
        let mut report = JobReport::default();

        for (idx, job) in jobs.iter().enumerate() {
            let name = job.pretty_name();
            if self.dry_run {
                log::info!("DRY RUN: job {}/{}: {}", idx + 1, jobs.len(), name);
            } else {
                log::info!("Job {}/{}: {}", idx + 1, jobs.len(), name);
            }

            let result = job.exec(self.dry_run);
            if let JobResult::Failed { .. } = &result {
                log::error!("Job failed: {} ({})", name, result);
                report.failure = Some(JobFailure { job: name, result });
                break;
            }
            report.completed.push(name);
        }

        report
    }
}
