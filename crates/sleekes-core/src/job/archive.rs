//! The unit of work.

use crate::control::AbortToken;
use crate::engine::{EngineConfig, EngineError, Extractor};
use crate::options::ResolvedOptions;
use crate::stealth::StealthPolicy;

use super::translate::{StopReason, Translator};
use super::{JobEvent, JobId, JobState, Outcome, CANCELLED};

/// One target with its resolved options and stealth policy.
///
/// The policy (and with it the rotated identity) is drawn once at
/// construction; a retry is a new job with a fresh draw.
#[derive(Debug)]
pub struct ArchiveJob {
    id: JobId,
    options: ResolvedOptions,
    policy: StealthPolicy,
    config: EngineConfig,
    state: JobState,
}

impl ArchiveJob {
    pub fn new(options: ResolvedOptions) -> Self {
        let policy = StealthPolicy::derive(&options);
        Self::with_policy(options, policy)
    }

    /// Build with an already derived policy (deterministic tests, callers
    /// that need to inspect the identity first).
    pub fn with_policy(options: ResolvedOptions, policy: StealthPolicy) -> Self {
        let config = EngineConfig::build(&options, &policy);
        Self {
            id: JobId::next(),
            options,
            policy,
            config,
            state: JobState::Pending,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn policy(&self) -> &StealthPolicy {
        &self.policy
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run to completion on the current thread.
    ///
    /// Every call ends with exactly one [`JobEvent::Done`] carrying the returned
    /// outcome. A job runs once; calling this again on a finished job fails
    /// without touching the engine.
    pub fn run(
        &mut self,
        extractor: &dyn Extractor,
        abort: &AbortToken,
        emit: &mut dyn FnMut(JobEvent),
    ) -> Outcome {
        if self.state != JobState::Pending {
            let outcome = Outcome::failure(format!(
                "job {} already {}; start a new job to retry",
                self.id,
                self.state.as_str()
            ));
            emit(JobEvent::Done(outcome.clone()));
            return outcome;
        }

        let id = self.id;
        let emit = &mut |event: JobEvent| {
            if let JobEvent::Log(log) = &event {
                tracing::debug!(job = %id, "{}", log.message);
            }
            emit(event)
        };

        let target = self.options.target().to_string();
        self.state = JobState::Running;
        tracing::info!(
            job = %self.id,
            target_url = %target,
            engine = extractor.name(),
            stealth = self.policy.stealth,
            "job started"
        );
        emit(JobEvent::log(format!("Starting {target}")));
        if self.policy.stealth {
            emit(JobEvent::log(format!(
                "Stealth mode: {}-{} s between items, rate limit {} KiB/s",
                self.policy.pacing.item_delay.as_secs(),
                self.policy.pacing.max_item_delay.as_secs(),
                self.policy.rate_limit.unwrap_or(0) / 1024
            )));
        }

        let outcome = if abort.is_requested() {
            Outcome::failure(CANCELLED)
        } else {
            self.drive(extractor, &target, abort, &mut *emit)
        };

        self.state = outcome.state();
        tracing::info!(job = %self.id, state = self.state.as_str(), "job finished");
        emit(JobEvent::Done(outcome.clone()));
        outcome
    }

    fn drive(
        &self,
        extractor: &dyn Extractor,
        target: &str,
        abort: &AbortToken,
        emit: &mut dyn FnMut(JobEvent),
    ) -> Outcome {
        let mut translator = Translator::new(
            target,
            self.config.ignore_errors,
            self.config.has_cookie_source(),
            abort,
        );
        let result = extractor.download(&self.config, target, abort, &mut |event| {
            translator.on_event(event, &mut *emit)
        });

        let outcome = match (result, translator.stop()) {
            (_, Some(stop)) => Outcome::failure(stop.reason()),
            (Err(EngineError::Aborted), None) if abort.is_requested() => {
                Outcome::failure(StopReason::Cancelled.reason())
            }
            (Err(e), None) => {
                tracing::warn!(job = %self.id, class = e.class().label(), "engine failed: {e}");
                Outcome::failure(e.to_string())
            }
            (Ok(()), None) => {
                let total = translator.total_items() as usize;
                let failed = translator.failed_items();
                if failed > 0 && failed >= total {
                    let last = translator.last_failure().unwrap_or("unknown error");
                    Outcome::failure(if total == 1 {
                        format!("download failed: {last}")
                    } else {
                        format!("all {total} items failed; last error: {last}")
                    })
                } else {
                    Outcome::Success
                }
            }
        };

        let total = translator.total_items() as usize;
        let failed = translator.failed_items();
        let summary = format!(
            "Finished {} of {total} item(s), {failed} skipped after errors, {} file(s) written",
            total.saturating_sub(failed),
            translator.finished_files()
        );
        tracing::info!(
            job = %self.id,
            items = total,
            skipped = failed,
            files = translator.finished_files(),
            "job summary"
        );
        if outcome.is_success() {
            emit(JobEvent::log(summary));
        }
        outcome
    }
}
