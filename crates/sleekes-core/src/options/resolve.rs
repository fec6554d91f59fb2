//! Layered resolution: defaults < settings < overrides < preset.

use crate::config::Settings;

use super::{
    ContentToggles, InvalidOptions, OutputLayout, PartialOptions, Preset, ResolvedOptions,
    StealthInputs,
};

/// Longest pause accepted for either sleep value: one day.
pub const MAX_SLEEP_SECS: u64 = 24 * 60 * 60;

/// Build the immutable run configuration.
///
/// Pure: no I/O, same inputs give the same result. Fails only on values that
/// cannot be validated (playlist range, cookie source, target, sleep bounds).
pub fn resolve(
    persisted: &Settings,
    overrides: &PartialOptions,
    preset: Option<Preset>,
) -> Result<ResolvedOptions, InvalidOptions> {
    let layered = match preset {
        Some(p) => overrides.merged_with(&p.overrides()),
        None => overrides.clone(),
    };

    let mut draft = Draft::compiled_defaults();
    draft.apply_settings(persisted);
    draft.apply(&layered)?;
    let resolved = draft.finish()?;

    tracing::debug!(
        target_url = %resolved.target,
        archive = resolved.archive_mode,
        audio_only = resolved.audio_only,
        stealth = resolved.stealth.enabled,
        preset = preset.map(Preset::name),
        "resolved options"
    );
    Ok(resolved)
}

struct Draft {
    target: Option<String>,
    opts: ResolvedOptions,
}

impl Draft {
    fn compiled_defaults() -> Self {
        Self {
            target: None,
            opts: ResolvedOptions {
                target: String::new(),
                output_dir: std::path::PathBuf::from("."),
                layout: OutputLayout::Nested,
                archive_mode: false,
                toggles: ContentToggles::default(),
                audio_only: false,
                skip_media: false,
                playlist_items: None,
                use_playlist: true,
                cookie_source: None,
                ignore_errors: true,
                stealth: StealthInputs::default(),
            },
        }
    }

    fn apply_settings(&mut self, s: &Settings) {
        let o = &mut self.opts;
        o.archive_mode = s.archive_mode;
        o.audio_only = s.only_audio;
        o.skip_media = s.skip_download;
        o.stealth.sleep_interval = s.sleep_interval;
        o.stealth.max_sleep_interval = s.max_sleep_interval;
        o.cookie_source = s.cookie_browser;
        o.layout = if s.flat_output {
            OutputLayout::Flat
        } else {
            OutputLayout::Nested
        };
        o.ignore_errors = s.ignore_errors;
        o.output_dir = s.last_path.clone();
    }

    fn apply(&mut self, p: &PartialOptions) -> Result<(), InvalidOptions> {
        if let Some(t) = &p.target {
            self.target = Some(t.clone());
        }
        let o = &mut self.opts;
        set(&mut o.output_dir, &p.output_dir);
        set(&mut o.layout, &p.layout);
        set(&mut o.archive_mode, &p.archive_mode);
        set(&mut o.audio_only, &p.audio_only);
        set(&mut o.skip_media, &p.skip_media);

        set(&mut o.toggles.description, &p.write_description);
        set(&mut o.toggles.info_json, &p.write_info_json);
        set(&mut o.toggles.subtitles, &p.write_subtitles);
        set(&mut o.toggles.auto_captions, &p.write_auto_captions);
        set(&mut o.toggles.thumbnail, &p.write_thumbnail);
        set(&mut o.toggles.comments, &p.write_comments);

        if let Some(items) = p.parsed_playlist()? {
            o.playlist_items = Some(items);
        }
        set(&mut o.use_playlist, &p.use_playlist);
        if let Some(cookie) = p.parsed_cookie_source()? {
            o.cookie_source = cookie;
        }
        set(&mut o.ignore_errors, &p.ignore_errors);

        set(&mut o.stealth.sleep_interval, &p.sleep_interval);
        set(&mut o.stealth.max_sleep_interval, &p.max_sleep_interval);
        set(&mut o.stealth.enabled, &p.stealth);
        Ok(())
    }

    fn finish(self) -> Result<ResolvedOptions, InvalidOptions> {
        let mut opts = self.opts;
        opts.target = validate_target(self.target)?;
        validate_sleep("sleep interval", opts.stealth.sleep_interval)?;
        validate_sleep("max sleep interval", opts.stealth.max_sleep_interval)?;
        if opts.archive_mode {
            opts.toggles = ContentToggles::all();
        }
        Ok(opts)
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

fn validate_sleep(field: &'static str, secs: u64) -> Result<(), InvalidOptions> {
    if secs > MAX_SLEEP_SECS {
        return Err(InvalidOptions::Sleep { field, secs });
    }
    Ok(())
}

fn validate_target(target: Option<String>) -> Result<String, InvalidOptions> {
    let target = target
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(InvalidOptions::MissingTarget)?;
    if target.contains("://") {
        let parsed =
            url::Url::parse(&target).map_err(|_| InvalidOptions::Target(target.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(InvalidOptions::Target(target));
        }
    }
    Ok(target)
}
