//! Engine failure type.

use super::ErrorClass;

/// Failure surfaced by the extraction engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{message}")]
    Fatal { class: ErrorClass, message: String },
    #[error("{program} exited with {}{}", status_text(.code), last_error_text(.last_error))]
    Exit {
        program: String,
        code: Option<i32>,
        last_error: Option<String>,
    },
    #[error("malformed probe output: {0}")]
    Probe(String),
    #[error("aborted")]
    Aborted,
    #[error("engine i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Classification used by the job to decide the outcome.
    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::Fatal { class, .. } => *class,
            EngineError::Exit {
                last_error: Some(msg),
                ..
            } => super::classify(msg),
            EngineError::Io(e) if e.raw_os_error() == Some(28) => ErrorClass::DiskFull,
            _ => ErrorClass::Other,
        }
    }
}

fn status_text(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (killed by signal)".to_string(),
    }
}

fn last_error_text(last: &Option<String>) -> String {
    match last {
        Some(msg) => format!(": {msg}"),
        None => String::new(),
    }
}
