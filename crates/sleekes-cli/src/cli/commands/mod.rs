//! CLI command handlers, one file per command.

mod archive;
mod completions;
mod probe;
mod settings;

pub use archive::{run_archive, ArchiveArgs};
pub use completions::{run_completions, run_man};
pub use probe::{run_probe, ProbeArgs};
pub use settings::{run_settings, SettingsAction};

use std::path::PathBuf;

use sleekes_core::engine::YtDlp;

/// Engine backend: `--yt-dlp <PATH>` or `yt-dlp` from `PATH`.
fn extractor(program: Option<&PathBuf>) -> YtDlp {
    match program {
        Some(path) => YtDlp::with_program(path),
        None => YtDlp::new(),
    }
}
