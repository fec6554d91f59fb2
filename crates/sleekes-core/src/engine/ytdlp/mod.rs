//! yt-dlp as an external process.
//!
//! Output is read line by line (`--newline`) from both pipes on reader
//! threads, funnelled through one channel and translated into
//! [`EngineEvent`]s for the hook. The driver loop wakes up regularly even
//! when the process is silent (sleep intervals) so an abort request is
//! honoured promptly.

mod parse;

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::control::AbortToken;
use crate::engine::{
    classify, EngineConfig, EngineError, EngineEvent, EventHook, Extractor, HookAction, Metadata,
};

use parse::parse_line;

const DEFAULT_PROGRAM: &str = "yt-dlp";
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// yt-dlp backend. Blocking; run it on a worker thread.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable instead of `yt-dlp` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn spawn(&self, args: &[String], url: &str) -> Result<Child, EngineError> {
        tracing::debug!(program = %self.program.display(), ?args, url, "spawning engine");
        Command::new(&self.program)
            .args(args)
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program_name(),
                source,
            })
    }
}

/// Per-run bookkeeping that fills in what single lines cannot know.
#[derive(Default)]
struct RunState {
    current_index: Option<u32>,
    destination: Option<PathBuf>,
    item_errors: usize,
    last_error: Option<String>,
}

impl RunState {
    fn complete(&mut self, event: EngineEvent) -> EngineEvent {
        match event {
            EngineEvent::ItemStarted { index, .. } => {
                self.current_index = Some(index);
                self.destination = None;
                event
            }
            EngineEvent::Destination { ref path } => {
                self.destination = Some(path.clone());
                event
            }
            EngineEvent::Finished { path: None } => EngineEvent::Finished {
                path: self.destination.clone(),
            },
            EngineEvent::ItemFailed { message, .. } => {
                self.item_errors += 1;
                self.last_error = Some(message.clone());
                EngineEvent::ItemFailed {
                    index: self.current_index,
                    message,
                }
            }
            other => other,
        }
    }
}

fn pump<R: Read + Send + 'static>(stream: R, tx: mpsc::Sender<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl Extractor for YtDlp {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    fn download(
        &self,
        config: &EngineConfig,
        url: &str,
        abort: &AbortToken,
        hook: &mut EventHook<'_>,
    ) -> Result<(), EngineError> {
        let mut child = self.spawn(&config.download_args(), url)?;

        let (tx, rx) = mpsc::channel::<String>();
        let mut readers = Vec::new();
        if let Some(out) = child.stdout.take() {
            readers.push(pump(out, tx.clone()));
        }
        if let Some(err) = child.stderr.take() {
            readers.push(pump(err, tx.clone()));
        }
        drop(tx);

        let mut state = RunState::default();
        loop {
            if abort.is_requested() {
                tracing::info!(url, "abort requested, stopping engine");
                stop(&mut child);
                return Err(EngineError::Aborted);
            }
            let line = match rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => line,
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };
            tracing::trace!(line = %line, "engine output");
            let Some(event) = parse_line(&line) else {
                continue;
            };
            let event = state.complete(event);
            if hook(event) == HookAction::Abort {
                tracing::info!(url, "hook requested abort, stopping engine");
                stop(&mut child);
                return Err(EngineError::Aborted);
            }
        }

        for reader in readers {
            let _ = reader.join();
        }
        let status = child.wait()?;
        if status.success() {
            return Ok(());
        }
        // Per-item failures were already reported through the hook; with
        // ignore_errors the non-zero exit only summarises them, unless the
        // last one ended the run for everything after it.
        let last_recoverable = state
            .last_error
            .as_deref()
            .is_some_and(|m| !classify(m).is_fatal(config.has_cookie_source()));
        if config.ignore_errors && state.item_errors > 0 && last_recoverable {
            tracing::debug!(
                code = ?status.code(),
                item_errors = state.item_errors,
                "engine exited non-zero after skipped items"
            );
            return Ok(());
        }
        Err(EngineError::Exit {
            program: self.program_name(),
            code: status.code(),
            last_error: state.last_error,
        })
    }

    fn extract_info(&self, config: &EngineConfig, url: &str) -> Result<Metadata, EngineError> {
        let child = self.spawn(&config.probe_args(), url)?;
        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_error = stderr
                .lines()
                .rev()
                .find_map(|l| l.strip_prefix("ERROR:"))
                .map(|m| m.trim().to_string());
            return Err(EngineError::Exit {
                program: self.program_name(),
                code: output.status.code(),
                last_error,
            });
        }
        Metadata::from_json(&output.stdout).map_err(|e| EngineError::Probe(e.to_string()))
    }
}
