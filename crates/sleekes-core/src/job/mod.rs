//! Archive jobs: one target, one resolved configuration, one terminal outcome.
//!
//! An [`ArchiveJob`] drives the extraction engine and turns its low-level
//! events into caller-facing [`JobEvent`]s. A [`JobRunner`] executes it on the
//! blocking pool and hands back a [`JobHandle`] for events and cancellation.

mod archive;
mod event;
mod runner;
mod translate;

pub use archive::ArchiveJob;
pub use event::{JobEvent, JobListener, LogEvent, ProgressEvent};
pub use runner::{JobHandle, JobRunner};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Reason carried by jobs stopped through their handle.
pub const CANCELLED: &str = "cancelled";

/// Process-unique job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        JobId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle: `Pending -> Running -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        }
    }
}

/// Terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { reason: String },
}

impl Outcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::Failure { reason } => Some(reason),
        }
    }

    fn state(&self) -> JobState {
        match self {
            Outcome::Success => JobState::Succeeded,
            Outcome::Failure { .. } => JobState::Failed,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("succeeded"),
            Outcome::Failure { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_increase() {
        let a = JobId::next();
        let b = JobId::next();
        assert!(b > a);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn outcome_maps_to_terminal_state() {
        assert_eq!(Outcome::Success.state(), JobState::Succeeded);
        let failed = Outcome::failure("disk full");
        assert_eq!(failed.state(), JobState::Failed);
        assert_eq!(failed.reason(), Some("disk full"));
        assert_eq!(failed.to_string(), "failed: disk full");
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Running.is_terminal());
    }
}
