use std::fmt;
use std::str::FromStr;

use super::{OutputLayout, PartialOptions};

/// Named, versioned option bundle applied at the highest precedence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Full archive at a safe pace: archive + stealth, 5 s between items.
    Recommended,
    /// Anti-detection pacing and identity rotation only.
    Stealth,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Recommended, Preset::Stealth];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Recommended => "recommended",
            Preset::Stealth => "stealth",
        }
    }

    /// Bumped whenever the bundle's overrides change.
    pub fn version(self) -> u32 {
        match self {
            Preset::Recommended => 1,
            Preset::Stealth => 1,
        }
    }

    /// The fixed overrides this preset stands for.
    pub fn overrides(self) -> PartialOptions {
        match self {
            Preset::Recommended => PartialOptions {
                archive_mode: Some(true),
                stealth: Some(true),
                sleep_interval: Some(5),
                audio_only: Some(false),
                skip_media: Some(false),
                layout: Some(OutputLayout::Nested),
                ..PartialOptions::default()
            },
            Preset::Stealth => PartialOptions {
                stealth: Some(true),
                ignore_errors: Some(true),
                ..PartialOptions::default()
            },
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown preset {wanted:?}"))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (v{})", self.name(), self.version())
    }
}
