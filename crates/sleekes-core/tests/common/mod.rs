//! Shared helpers for integration tests: a scripted engine and a recording listener.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sleekes_core::config::Settings;
use sleekes_core::control::AbortToken;
use sleekes_core::engine::{
    EngineConfig, EngineError, EngineEvent, EventHook, Extractor, HookAction, Metadata,
};
use sleekes_core::job::{JobListener, LogEvent, Outcome, ProgressEvent};
use sleekes_core::options::{resolve, PartialOptions, ResolvedOptions};

/// Engine double that plays a batch of `items`, failing the chosen ones.
pub struct ScriptedExtractor {
    items: u32,
    failures: HashMap<u32, String>,
    pause: Duration,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn batch(items: u32) -> Self {
        Self {
            items,
            failures: HashMap::new(),
            pause: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self, index: u32, message: &str) -> Self {
        self.failures.insert(index, message.to_string());
        self
    }

    /// Sleep after each item, standing in for the pacing delay.
    pub fn paced(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

macro_rules! send {
    ($hook:expr, $event:expr) => {
        if $hook($event) == HookAction::Abort {
            return Err(EngineError::Aborted);
        }
    };
}

impl Extractor for ScriptedExtractor {
    fn name(&self) -> &str {
        "scripted"
    }

    fn download(
        &self,
        _config: &EngineConfig,
        _url: &str,
        abort: &AbortToken,
        hook: &mut EventHook<'_>,
    ) -> Result<(), EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for index in 1..=self.items {
            if abort.is_requested() {
                return Err(EngineError::Aborted);
            }
            send!(hook, EngineEvent::ItemStarted { index, count: self.items });
            if let Some(message) = self.failures.get(&index) {
                send!(
                    hook,
                    EngineEvent::ItemFailed {
                        index: Some(index),
                        message: message.clone(),
                    }
                );
                continue;
            }
            let path = PathBuf::from(format!("/archive/item-{index}.mp4"));
            send!(hook, EngineEvent::Destination { path });
            send!(
                hook,
                EngineEvent::Downloading {
                    percent: 50.0,
                    speed: Some("1.00MiB/s".into()),
                    eta: Some("00:01".into()),
                }
            );
            send!(hook, EngineEvent::Finished { path: None });
            if !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
        }
        Ok(())
    }

    fn extract_info(&self, _config: &EngineConfig, url: &str) -> Result<Metadata, EngineError> {
        let doc = serde_json::json!({
            "id": "scripted",
            "title": url,
            "entries": (1..=self.items).map(|i| serde_json::json!({"id": i})).collect::<Vec<_>>(),
        });
        Metadata::from_json(doc.to_string().as_bytes()).map_err(|e| EngineError::Probe(e.to_string()))
    }
}

/// Everything a listener saw, in order.
#[derive(Default)]
pub struct Recorder {
    pub progress: Vec<ProgressEvent>,
    pub logs: Vec<String>,
    pub done: Vec<Outcome>,
}

impl Recorder {
    pub fn logged(&self, needle: &str) -> bool {
        self.logs.iter().any(|l| l.contains(needle))
    }

    pub fn log_position(&self, needle: &str) -> Option<usize> {
        self.logs.iter().position(|l| l.contains(needle))
    }
}

impl JobListener for Recorder {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.progress.push(event.clone());
    }

    fn on_log(&mut self, event: &LogEvent) {
        self.logs.push(event.message.clone());
    }

    fn on_done(&mut self, outcome: &Outcome) {
        self.done.push(outcome.clone());
    }
}

/// Options for a batch target with the given error policy and no pacing.
pub fn batch_options(ignore_errors: bool) -> ResolvedOptions {
    let overrides = PartialOptions {
        ignore_errors: Some(ignore_errors),
        sleep_interval: Some(0),
        max_sleep_interval: Some(0),
        ..PartialOptions::for_target("https://example.com/channel/abc")
    };
    resolve(&Settings::default(), &overrides, None).expect("valid options")
}
