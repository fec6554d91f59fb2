//! Persisted user settings (`~/.config/sleekes/settings.toml`).
//!
//! The store never fails to load: a missing or unreadable document is replaced
//! by the defaults, which are written back so the file heals itself.

mod store;

pub use store::{PersistenceError, SettingsStore};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::options::{CookieSource, OutputLayout, ResolvedOptions};

/// UI colour theme. Only persisted here; rendering belongs to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ko,
}

/// Flat, process-wide settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Collect every side file (description, info, subtitles, thumbnail, comments).
    pub archive_mode: bool,
    /// Extract audio only.
    pub only_audio: bool,
    /// Skip the media file and keep metadata only.
    pub skip_download: bool,
    /// Fixed pause between media items, in seconds.
    pub sleep_interval: u64,
    /// Upper bound of the randomized pause between items, in seconds.
    pub max_sleep_interval: u64,
    /// Browser to borrow cookies from. Absent means no cookies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_browser: Option<CookieSource>,
    /// Write files straight into the output directory.
    pub flat_output: bool,
    /// Skip failing playlist items instead of aborting the batch.
    pub ignore_errors: bool,
    /// Output directory used by the previous run.
    pub last_path: PathBuf,
    pub theme: Theme,
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            archive_mode: true,
            only_audio: false,
            skip_download: false,
            sleep_interval: 5,
            max_sleep_interval: 10,
            cookie_browser: None,
            flat_output: false,
            ignore_errors: true,
            last_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            theme: Theme::default(),
            language: Language::default(),
        }
    }
}

impl Settings {
    /// Parse a settings document. Missing keys take their defaults.
    pub fn from_toml(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Adopt the persistable fields of a resolved run ("save these options").
    /// Content toggles and stealth stay per-run.
    pub fn remember(&mut self, options: &ResolvedOptions) {
        let stealth = options.stealth();
        self.archive_mode = options.archive_mode();
        self.only_audio = options.audio_only();
        self.skip_download = options.skip_media();
        self.sleep_interval = stealth.sleep_interval;
        self.max_sleep_interval = stealth.max_sleep_interval;
        self.cookie_browser = options.cookie_source();
        self.flat_output = options.layout() == OutputLayout::Flat;
        self.ignore_errors = options.ignore_errors();
        self.last_path = options.output_dir().to_path_buf();
    }
}
