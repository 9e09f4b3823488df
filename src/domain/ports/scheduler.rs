//! Scheduler port
//!
//! Registers maintenance triggers with the external timer engine. Jobs are
//! addressed by a stable id (`depot-maintenance-<name>`); the timer host is
//! expected to call `application::maintenance::run` for a fired job. The
//! timer mechanics themselves live outside the crate.

use crate::domain::entities::ScheduleTrigger;

pub trait Scheduler: Send + Sync {
    fn schedule(&self, job_id: &str, trigger: &ScheduleTrigger) -> Result<(), SchedulerError>;

    fn unschedule(&self, job_id: &str) -> Result<(), SchedulerError>;

    /// Ids of all currently registered jobs.
    fn job_ids(&self) -> Vec<String>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("failed to schedule job '{job_id}': {message}")]
    ScheduleFailed { job_id: String, message: String },

    #[error("failed to unschedule job '{job_id}': {message}")]
    UnscheduleFailed { job_id: String, message: String },
}
