use std::path::PathBuf;

use super::{CookieSource, OutputLayout, PlaylistItems};

/// Per-run override layer. `None` leaves the lower layer's value in place.
///
/// Presets are expressed in the same shape and applied on top, so a preset is
/// nothing more than a fixed set of overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialOptions {
    pub target: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub layout: Option<OutputLayout>,

    pub archive_mode: Option<bool>,
    pub audio_only: Option<bool>,
    pub skip_media: Option<bool>,

    pub write_description: Option<bool>,
    pub write_info_json: Option<bool>,
    pub write_subtitles: Option<bool>,
    pub write_auto_captions: Option<bool>,
    pub write_thumbnail: Option<bool>,
    pub write_comments: Option<bool>,

    /// Raw range expression; validated during resolution.
    pub playlist_items: Option<String>,
    pub use_playlist: Option<bool>,
    /// Raw cookie source name; `"none"` clears a persisted source.
    pub cookie_source: Option<String>,
    pub ignore_errors: Option<bool>,

    pub sleep_interval: Option<u64>,
    pub max_sleep_interval: Option<u64>,
    pub stealth: Option<bool>,
}

impl PartialOptions {
    /// Overrides targeting `target`, everything else inherited.
    pub fn for_target(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Layer `other` on top of `self`; set fields in `other` win.
    pub fn merged_with(&self, other: &PartialOptions) -> PartialOptions {
        macro_rules! pick {
            ($($field:ident),* $(,)?) => {
                PartialOptions {
                    $($field: other.$field.clone().or_else(|| self.$field.clone()),)*
                }
            };
        }
        pick!(
            target,
            output_dir,
            layout,
            archive_mode,
            audio_only,
            skip_media,
            write_description,
            write_info_json,
            write_subtitles,
            write_auto_captions,
            write_thumbnail,
            write_comments,
            playlist_items,
            use_playlist,
            cookie_source,
            ignore_errors,
            sleep_interval,
            max_sleep_interval,
            stealth,
        )
    }

    /// Parse the raw playlist expression, if any.
    pub(super) fn parsed_playlist(&self) -> Result<Option<PlaylistItems>, super::InvalidOptions> {
        self.playlist_items
            .as_deref()
            .map(PlaylistItems::parse)
            .transpose()
    }

    pub(super) fn parsed_cookie_source(
        &self,
    ) -> Result<Option<Option<CookieSource>>, super::InvalidOptions> {
        self.cookie_source
            .as_deref()
            .map(CookieSource::parse_optional)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_with_prefers_later_layer() {
        let base = PartialOptions {
            archive_mode: Some(false),
            sleep_interval: Some(3),
            target: Some("https://a.example/".into()),
            ..Default::default()
        };
        let top = PartialOptions {
            archive_mode: Some(true),
            ..Default::default()
        };
        let merged = base.merged_with(&top);
        assert_eq!(merged.archive_mode, Some(true));
        assert_eq!(merged.sleep_interval, Some(3));
        assert_eq!(merged.target.as_deref(), Some("https://a.example/"));
    }
}
