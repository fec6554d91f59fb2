use std::path::{Path, PathBuf};

use super::{CookieSource, PlaylistItems};

/// Directory layout of written files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// `<uploader>/<upload date> - <title>/<title>.<ext>`
    #[default]
    Nested,
    /// `<title>.<ext>` directly in the output directory.
    Flat,
}

impl OutputLayout {
    /// Engine output template relative to the output directory.
    pub fn template(self) -> &'static str {
        match self {
            OutputLayout::Nested => "%(uploader)s/%(upload_date)s - %(title)s/%(title)s.%(ext)s",
            OutputLayout::Flat => "%(title)s.%(ext)s",
        }
    }
}

/// The six side-file toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentToggles {
    pub description: bool,
    pub info_json: bool,
    pub subtitles: bool,
    pub auto_captions: bool,
    pub thumbnail: bool,
    pub comments: bool,
}

impl ContentToggles {
    pub fn all() -> Self {
        Self {
            description: true,
            info_json: true,
            subtitles: true,
            auto_captions: true,
            thumbnail: true,
            comments: true,
        }
    }

    pub fn any_captions(&self) -> bool {
        self.subtitles || self.auto_captions
    }
}

/// Inputs to the stealth policy derivation, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StealthInputs {
    pub sleep_interval: u64,
    pub max_sleep_interval: u64,
    pub enabled: bool,
}

/// Final per-run configuration. Only [`resolve`](super::resolve) builds it,
/// so archive normalisation always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub(super) target: String,
    pub(super) output_dir: PathBuf,
    pub(super) layout: OutputLayout,
    pub(super) archive_mode: bool,
    pub(super) toggles: ContentToggles,
    pub(super) audio_only: bool,
    pub(super) skip_media: bool,
    pub(super) playlist_items: Option<PlaylistItems>,
    pub(super) use_playlist: bool,
    pub(super) cookie_source: Option<CookieSource>,
    pub(super) ignore_errors: bool,
    pub(super) stealth: StealthInputs,
}

impl ResolvedOptions {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn layout(&self) -> OutputLayout {
        self.layout
    }

    /// Full output template: output directory joined with the layout template.
    pub fn output_template(&self) -> PathBuf {
        self.output_dir.join(self.layout.template())
    }

    pub fn archive_mode(&self) -> bool {
        self.archive_mode
    }

    /// Side-file toggles, already forced on when archive mode is set.
    pub fn toggles(&self) -> ContentToggles {
        self.toggles
    }

    pub fn audio_only(&self) -> bool {
        self.audio_only
    }

    pub fn skip_media(&self) -> bool {
        self.skip_media
    }

    pub fn playlist_items(&self) -> Option<&PlaylistItems> {
        self.playlist_items.as_ref()
    }

    pub fn use_playlist(&self) -> bool {
        self.use_playlist
    }

    pub fn cookie_source(&self) -> Option<CookieSource> {
        self.cookie_source
    }

    pub fn ignore_errors(&self) -> bool {
        self.ignore_errors
    }

    pub fn stealth(&self) -> StealthInputs {
        self.stealth
    }

    /// Format selector at the engine boundary. Audio-only wins over archive.
    pub fn format_selector(&self) -> &'static str {
        if self.audio_only {
            "bestaudio/best"
        } else {
            "bestvideo+bestaudio/best"
        }
    }
}
