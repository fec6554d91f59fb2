//! Boundary to the media extraction engine.
//!
//! The engine resolves targets into formats and metadata and writes media and
//! side files. Sleekes never fetches bytes itself: it hands the engine a fully
//! derived [`EngineConfig`] and consumes the low-level [`EngineEvent`]s it
//! reports through a hook.

mod classify;
mod config;
mod error;
mod metadata;
mod ytdlp;

pub use classify::{classify, ErrorClass};
pub use config::{EngineConfig, AUDIO_CODEC, AUDIO_QUALITY, MERGE_CONTAINER, SUBTITLE_FORMAT};
pub use error::EngineError;
pub use metadata::Metadata;
pub use ytdlp::YtDlp;

use std::path::PathBuf;

use crate::control::AbortToken;

/// Low-level event reported by the engine while it works.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A batch item begins (1-based).
    ItemStarted { index: u32, count: u32 },
    /// The engine chose the file the current item is written to.
    Destination { path: PathBuf },
    /// Media bytes are moving.
    Downloading {
        percent: f32,
        speed: Option<String>,
        eta: Option<String>,
    },
    /// A media file finished downloading; post-processing follows.
    Finished { path: Option<PathBuf> },
    /// One item failed. `index` is `None` outside a batch.
    ItemFailed { index: Option<u32>, message: String },
    /// Anything else worth showing the user.
    Message(String),
}

/// Answer from the event hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    Continue,
    /// Stop as soon as possible; the engine returns [`EngineError::Aborted`].
    Abort,
}

/// Event hook handed to [`Extractor::download`].
pub type EventHook<'a> = dyn FnMut(EngineEvent) -> HookAction + 'a;

/// Extraction engine capability. Calls block; run them off the caller's thread.
pub trait Extractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fetch and persist media and side files for `url`.
    ///
    /// Returns [`EngineError::Aborted`] once `abort` is requested or the hook
    /// answers [`HookAction::Abort`].
    fn download(
        &self,
        config: &EngineConfig,
        url: &str,
        abort: &AbortToken,
        hook: &mut EventHook<'_>,
    ) -> Result<(), EngineError>;

    /// Probe `url` without downloading.
    fn extract_info(&self, config: &EngineConfig, url: &str) -> Result<Metadata, EngineError>;
}
