//! Execute jobs off the caller's control path.
//!
//! The job runs inside `spawn_blocking`; its events go through an unbounded
//! channel so a slow listener buffers instead of stalling the engine.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::control::{AbortToken, JobControl};
use crate::engine::Extractor;

use super::{ArchiveJob, JobEvent, JobId, JobListener, LogEvent, Outcome, ProgressEvent};

/// Starts [`ArchiveJob`]s against one extraction engine.
#[derive(Clone)]
pub struct JobRunner {
    extractor: Arc<dyn Extractor>,
    control: Arc<JobControl>,
}

impl JobRunner {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            control: Arc::new(JobControl::new()),
        }
    }

    /// Registry of running jobs, for cancelling by id.
    pub fn control(&self) -> Arc<JobControl> {
        Arc::clone(&self.control)
    }

    /// Start `job` on the blocking pool. Must be called within a Tokio runtime.
    pub fn start(&self, mut job: ArchiveJob) -> JobHandle {
        let id = job.id();
        let abort = self.control.register(id);
        let (tx, events) = mpsc::unbounded_channel();

        let extractor = Arc::clone(&self.extractor);
        let control = Arc::clone(&self.control);
        let token = abort.clone();
        let task = tokio::task::spawn_blocking(move || {
            let outcome = job.run(extractor.as_ref(), &token, &mut |event| {
                // A dropped receiver only means nobody is listening any more.
                let _ = tx.send(event);
            });
            control.unregister(id);
            tracing::debug!(job = %id, %outcome, "worker done");
        });

        JobHandle {
            id,
            abort,
            events,
            task,
        }
    }
}

/// Caller side of a running job.
pub struct JobHandle {
    id: JobId,
    abort: AbortToken,
    events: mpsc::UnboundedReceiver<JobEvent>,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Ask the job to stop; it ends `Failed{"cancelled"}`.
    pub fn cancel(&self) {
        tracing::info!(job = %self.id, "cancel requested");
        self.abort.request();
    }

    /// Token that cancels this job, for wiring into signal handlers.
    pub fn abort_token(&self) -> AbortToken {
        self.abort.clone()
    }

    /// Next event in engine order; `None` once the job is over.
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        self.events.recv().await
    }

    /// Deliver every event to `listener` and return the outcome.
    ///
    /// `on_done` is called exactly once, including when the worker dies
    /// without reporting.
    pub async fn forward<L: JobListener + ?Sized>(mut self, listener: &mut L) -> Outcome {
        let mut outcome = None;
        while let Some(event) = self.events.recv().await {
            match event {
                JobEvent::Progress(p) => listener.on_progress(&p),
                JobEvent::Log(l) => listener.on_log(&l),
                JobEvent::Done(o) => {
                    if outcome.is_none() {
                        listener.on_done(&o);
                        outcome = Some(o);
                    }
                }
            }
        }

        let joined = self.task.await;
        match outcome {
            Some(o) => o,
            None => {
                let reason = match joined {
                    Err(e) => format!("job worker failed: {e}"),
                    Ok(()) => "job ended without an outcome".to_string(),
                };
                tracing::error!(job = %self.id, "{reason}");
                let o = Outcome::failure(reason);
                listener.on_done(&o);
                o
            }
        }
    }

    /// Wait for the outcome, discarding progress and log events.
    pub async fn wait(self) -> Outcome {
        struct Discard;
        impl JobListener for Discard {
            fn on_progress(&mut self, _: &ProgressEvent) {}
            fn on_log(&mut self, _: &LogEvent) {}
            fn on_done(&mut self, _: &Outcome) {}
        }
        self.forward(&mut Discard).await
    }
}
