//! Caller-facing event protocol.

use super::Outcome;

/// Progress of the current item.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// 0 to 100.
    pub percent: f32,
    /// e.g. `[3/5] clip.mp4`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub message: String,
}

/// Everything a job reports, in engine order. `Done` is always last.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Progress(ProgressEvent),
    Log(LogEvent),
    Done(Outcome),
}

impl JobEvent {
    pub(crate) fn log(message: impl Into<String>) -> Self {
        JobEvent::Log(LogEvent {
            message: message.into(),
        })
    }
}

/// Sink bound by front ends. CLI and interactive callers implement the same
/// three callbacks; `on_done` is called exactly once per job.
pub trait JobListener {
    fn on_progress(&mut self, event: &ProgressEvent);
    fn on_log(&mut self, event: &LogEvent);
    fn on_done(&mut self, outcome: &Outcome);
}
