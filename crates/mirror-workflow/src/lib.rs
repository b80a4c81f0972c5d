//! Provisioning workflow for the install-type step.
//!
//! The interactive step ([`install_type_step::InstallTypeStep`]) hands a list
//! of [`job::Job`]s to the [`job_queue::JobQueue`], which runs them once the
//! interactive phase is over.

pub mod install_type_step;
pub mod job;
pub mod job_queue;
pub mod update_mirror_list;

pub use install_type_step::InstallTypeStep;
pub use job::{Job, JobList, JobResult};
pub use job_queue::{JobFailure, JobQueue, JobReport};
pub use update_mirror_list::UpdateMirrorListJob;
