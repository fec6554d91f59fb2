//! Integration test: batch jobs through the runner against a scripted engine.
//!
//! Covers the per-item failure policy, ordering of delivered events,
//! the single `on_done` call and cancellation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{batch_options, Recorder, ScriptedExtractor};
use sleekes_core::job::{ArchiveJob, JobEvent, JobRunner, Outcome, CANCELLED};

async fn run_batch(engine: ScriptedExtractor, ignore_errors: bool) -> (Outcome, Recorder) {
    let runner = JobRunner::new(Arc::new(engine));
    let handle = runner.start(ArchiveJob::new(batch_options(ignore_errors)));
    let mut recorder = Recorder::default();
    let outcome = handle.forward(&mut recorder).await;
    (outcome, recorder)
}

#[tokio::test]
async fn recoverable_item_failure_is_skipped() {
    let engine = ScriptedExtractor::batch(5).failing(3, "[site] c: Private video");
    let (outcome, rec) = run_batch(engine, true).await;

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(rec.done, vec![Outcome::Success]);

    let failed = rec.log_position("item 3 failed").expect("item 3 failure logged");
    let item4 = rec.log_position("Downloading item 4 of 5").expect("item 4 started");
    let item5 = rec.log_position("Downloading item 5 of 5").expect("item 5 started");
    assert!(failed < item4 && item4 < item5);
    assert!(rec.logged("4 of 5 item(s), 1 skipped"));
}

#[tokio::test]
async fn item_failure_without_ignore_errors_fails_the_job() {
    let engine = ScriptedExtractor::batch(5).failing(3, "[site] c: Private video");
    let (outcome, rec) = run_batch(engine, false).await;

    let reason = outcome.reason().expect("job failed");
    assert!(reason.contains("item 3"), "reason was {reason:?}");
    assert_eq!(rec.done.len(), 1);
    assert!(!rec.logged("Downloading item 4 of 5"));
}

#[tokio::test]
async fn disk_full_is_fatal_even_when_ignoring_errors() {
    let engine = ScriptedExtractor::batch(4).failing(2, "[Errno 28] No space left on device");
    let (outcome, rec) = run_batch(engine, true).await;

    assert!(outcome.reason().unwrap().contains("disk full"));
    assert!(!rec.logged("Downloading item 3 of 4"));
}

#[tokio::test]
async fn lost_connectivity_mid_batch_fails_the_job() {
    let lost = "Unable to download webpage: <urlopen error [Errno -3] \
                Temporary failure in name resolution>. Giving up after 10 retries";
    let engine = ScriptedExtractor::batch(5)
        .failing(3, lost)
        .failing(4, lost)
        .failing(5, lost);
    let (outcome, rec) = run_batch(engine, true).await;

    assert_ne!(outcome, Outcome::Success);
    let reason = outcome.reason().expect("job failed");
    assert!(reason.contains("network exhausted"), "reason was {reason:?}");
    assert_eq!(rec.done, vec![outcome.clone()]);
    assert!(!rec.logged("Downloading item 4 of 5"));
    assert!(!rec.logged("Finished 2 of 5"));
}

#[tokio::test]
async fn every_item_failing_is_not_success() {
    let engine = ScriptedExtractor::batch(2)
        .failing(1, "Video unavailable")
        .failing(2, "Video unavailable");
    let (outcome, _) = run_batch(engine, true).await;

    assert!(outcome.reason().unwrap().contains("all 2 items failed"));
}

#[tokio::test]
async fn events_arrive_in_engine_order() {
    let (outcome, rec) = run_batch(ScriptedExtractor::batch(5), true).await;
    assert!(outcome.is_success());

    let labels: Vec<&str> = rec
        .progress
        .iter()
        .filter(|p| p.percent < 100.0)
        .map(|p| p.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "[1/5] item-1.mp4",
            "[2/5] item-2.mp4",
            "[3/5] item-3.mp4",
            "[4/5] item-4.mp4",
            "[5/5] item-5.mp4",
        ]
    );
    let post_processing = rec
        .logs
        .iter()
        .filter(|l| l.contains("post-processing"))
        .count();
    assert_eq!(post_processing, 5);
}

#[tokio::test]
async fn cancel_ends_the_job_as_cancelled() {
    let engine = Arc::new(ScriptedExtractor::batch(200).paced(Duration::from_millis(20)));
    let runner = JobRunner::new(engine.clone());
    let mut handle = runner.start(ArchiveJob::new(batch_options(true)));

    // Wait until the engine is demonstrably running.
    while let Some(event) = handle.next_event().await {
        if matches!(event, JobEvent::Progress(_)) {
            break;
        }
    }
    handle.cancel();
    let outcome = handle.wait().await;

    assert_eq!(outcome, Outcome::failure(CANCELLED));
    assert_eq!(engine.calls(), 1);
    assert_eq!(runner.control().running(), 0);
}

#[tokio::test]
async fn runner_control_cancels_by_id() {
    let runner = JobRunner::new(Arc::new(
        ScriptedExtractor::batch(200).paced(Duration::from_millis(20)),
    ));
    let handle = runner.start(ArchiveJob::new(batch_options(true)));
    assert!(runner.control().request_abort(handle.id()));

    let outcome = handle.wait().await;
    assert_eq!(outcome.reason(), Some(CANCELLED));
}
