//! Terminal listener for job events.

use std::time::{Duration, Instant};

use sleekes_core::job::{JobListener, LogEvent, Outcome, ProgressEvent};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Prints log lines as they come and progress at most every 500 ms.
#[derive(Default)]
pub struct ConsoleListener {
    last_print: Option<Instant>,
}

impl ConsoleListener {
    pub fn new() -> Self {
        Self { last_print: None }
    }
}

pub(crate) fn format_progress(event: &ProgressEvent) -> String {
    format!("  {:>5.1}%  {}", event.percent, event.label)
}

impl JobListener for ConsoleListener {
    fn on_progress(&mut self, event: &ProgressEvent) {
        let now = Instant::now();
        let due = self
            .last_print
            .map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
        if due || event.percent >= 100.0 {
            println!("{}", format_progress(event));
            self.last_print = Some(now);
        }
    }

    fn on_log(&mut self, event: &LogEvent) {
        println!("{}", event.message);
    }

    fn on_done(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success => println!("Done."),
            Outcome::Failure { reason } => eprintln!("Failed: {reason}"),
        }
    }
}
