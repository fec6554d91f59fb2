//! Engine events to job events, plus the per-item failure policy.

use std::collections::BTreeMap;
use std::path::Path;

use crate::control::AbortToken;
use crate::engine::{classify, EngineEvent, ErrorClass, HookAction};

use super::{JobEvent, ProgressEvent, CANCELLED};

/// Why the job asked the engine to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum StopReason {
    Cancelled,
    Fatal(String),
}

impl StopReason {
    pub(super) fn reason(&self) -> String {
        match self {
            StopReason::Cancelled => CANCELLED.to_string(),
            StopReason::Fatal(reason) => reason.clone(),
        }
    }
}

pub(super) struct Translator<'a> {
    target: &'a str,
    ignore_errors: bool,
    has_cookie_source: bool,
    abort: &'a AbortToken,
    index: Option<u32>,
    count: Option<u32>,
    label: Option<String>,
    finished_files: usize,
    /// Failed items keyed by batch index (0 outside a batch), last message kept.
    failures: BTreeMap<u32, String>,
    stop: Option<StopReason>,
}

impl<'a> Translator<'a> {
    pub(super) fn new(
        target: &'a str,
        ignore_errors: bool,
        has_cookie_source: bool,
        abort: &'a AbortToken,
    ) -> Self {
        Self {
            target,
            ignore_errors,
            has_cookie_source,
            abort,
            index: None,
            count: None,
            label: None,
            finished_files: 0,
            failures: BTreeMap::new(),
            stop: None,
        }
    }

    pub(super) fn stop(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    /// Items the engine announced, or 1 for a single target.
    pub(super) fn total_items(&self) -> u32 {
        self.count.unwrap_or(1).max(1)
    }

    pub(super) fn failed_items(&self) -> usize {
        self.failures.len()
    }

    pub(super) fn finished_files(&self) -> usize {
        self.finished_files
    }

    pub(super) fn last_failure(&self) -> Option<&str> {
        self.failures.values().next_back().map(String::as_str)
    }

    fn item_label(&self) -> String {
        let name = self.label.as_deref().unwrap_or(self.target);
        match (self.index, self.count) {
            (Some(i), Some(n)) if n > 1 => format!("[{i}/{n}] {name}"),
            _ => name.to_string(),
        }
    }

    fn progress(&self, percent: f32) -> JobEvent {
        JobEvent::Progress(ProgressEvent {
            percent: percent.clamp(0.0, 100.0),
            label: self.item_label(),
        })
    }

    /// Translate one engine event, pushing zero or more job events to `emit`.
    pub(super) fn on_event(
        &mut self,
        event: EngineEvent,
        emit: &mut dyn FnMut(JobEvent),
    ) -> HookAction {
        if self.abort.is_requested() {
            self.stop.get_or_insert(StopReason::Cancelled);
            return HookAction::Abort;
        }

        match event {
            EngineEvent::ItemStarted { index, count } => {
                self.index = Some(index);
                self.count = Some(count);
                self.label = None;
                emit(JobEvent::log(format!("Downloading item {index} of {count}")));
            }
            EngineEvent::Destination { path } => {
                self.label = Some(file_label(&path));
                emit(JobEvent::log(format!("Destination: {}", path.display())));
            }
            EngineEvent::Downloading { percent, .. } => emit(self.progress(percent)),
            EngineEvent::Finished { path } => {
                if let Some(path) = path {
                    self.label = Some(file_label(&path));
                }
                self.finished_files += 1;
                emit(self.progress(100.0));
                emit(JobEvent::log(format!(
                    "Download finished, post-processing {}",
                    self.item_label()
                )));
            }
            EngineEvent::ItemFailed { index, message } => {
                return self.on_item_failed(index.or(self.index), message, emit);
            }
            EngineEvent::Message(message) => emit(JobEvent::log(message)),
        }
        HookAction::Continue
    }

    fn on_item_failed(
        &mut self,
        index: Option<u32>,
        message: String,
        emit: &mut dyn FnMut(JobEvent),
    ) -> HookAction {
        let class = classify(&message);
        let what = match index {
            Some(i) => format!("item {i}"),
            None => self.target.to_string(),
        };
        let line = format!("{what} failed ({}): {message}", class.label());
        self.failures.insert(index.unwrap_or(0), message);

        if class.is_fatal(self.has_cookie_source) {
            tracing::warn!(item = ?index, class = class.label(), "fatal engine error");
            emit(JobEvent::log(line.clone()));
            if class == ErrorClass::AuthRequired {
                emit(JobEvent::log(
                    "Authentication required: pass a browser cookie source to continue",
                ));
            }
            self.stop = Some(StopReason::Fatal(line));
            return HookAction::Abort;
        }
        if !self.ignore_errors {
            tracing::info!(item = ?index, class = class.label(), "item failed, ignore_errors off");
            emit(JobEvent::log(line.clone()));
            self.stop = Some(StopReason::Fatal(line));
            return HookAction::Abort;
        }

        tracing::info!(item = ?index, class = class.label(), "skipping failed item");
        emit(JobEvent::log(format!("{line}; skipping")));
        HookAction::Continue
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
