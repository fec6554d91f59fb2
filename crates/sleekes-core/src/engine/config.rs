//! Engine configuration derived from resolved options and the stealth policy.

use std::path::PathBuf;
use std::time::Duration;

use crate::options::{ContentToggles, CookieSource, ResolvedOptions};
use crate::stealth::{ClientProfile, StealthPolicy};

/// Container media is merged into when not in audio-only mode.
pub const MERGE_CONTAINER: &str = "mp4";
/// Audio-only extraction codec and quality.
pub const AUDIO_CODEC: &str = "mp3";
pub const AUDIO_QUALITY: &str = "192K";
/// Subtitles are converted to this format when requested.
pub const SUBTITLE_FORMAT: &str = "srt";
/// Lower bound passed for a randomized pause that starts at zero; the engine
/// skips item sleeps entirely when the lower bound is zero.
const ZERO_SLEEP_FLOOR: Duration = Duration::from_millis(1);

/// Everything the engine needs for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub output_template: PathBuf,
    pub format: String,
    pub audio_only: bool,
    pub toggles: ContentToggles,
    pub skip_download: bool,
    pub playlist_items: Option<String>,
    pub no_playlist: bool,
    pub cookies_from_browser: Option<CookieSource>,
    pub user_agent: Option<String>,
    pub headers: Vec<(String, String)>,
    pub client_fallback: Vec<ClientProfile>,
    pub sleep_interval: Duration,
    pub max_sleep_interval: Duration,
    pub sleep_requests: Duration,
    pub rate_limit: Option<u64>,
    pub concurrent_fragments: usize,
    pub ignore_errors: bool,
}

impl EngineConfig {
    pub fn build(options: &ResolvedOptions, policy: &StealthPolicy) -> Self {
        Self {
            output_template: options.output_template(),
            format: options.format_selector().to_string(),
            audio_only: options.audio_only(),
            toggles: options.toggles(),
            skip_download: options.skip_media(),
            playlist_items: options.playlist_items().map(|p| p.to_string()),
            no_playlist: !options.use_playlist(),
            cookies_from_browser: options.cookie_source(),
            user_agent: policy.identity.user_agent.clone(),
            headers: policy.identity.headers.clone(),
            client_fallback: policy.client_fallback.clone(),
            sleep_interval: policy.pacing.item_delay,
            max_sleep_interval: policy.pacing.max_item_delay,
            sleep_requests: policy.pacing.request_delay,
            rate_limit: policy.rate_limit,
            concurrent_fragments: policy.concurrency,
            ignore_errors: options.ignore_errors(),
        }
    }

    /// Whether a cookie source could satisfy an authentication challenge.
    pub fn has_cookie_source(&self) -> bool {
        self.cookies_from_browser.is_some()
    }

    /// Arguments shared by downloads and probes: who we are to the origin.
    pub fn identity_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(browser) = self.cookies_from_browser {
            args.push("--cookies-from-browser".into());
            args.push(browser.as_str().into());
        }
        if let Some(ua) = &self.user_agent {
            args.push("--user-agent".into());
            args.push(ua.clone());
        }
        for (name, value) in &self.headers {
            args.push("--add-header".into());
            args.push(format!("{name}:{value}"));
        }
        if !self.client_fallback.is_empty() {
            let clients: Vec<&str> = self.client_fallback.iter().map(|c| c.as_str()).collect();
            args.push("--extractor-args".into());
            args.push(format!("youtube:player_client={}", clients.join(",")));
        }
        if !self.sleep_requests.is_zero() {
            args.push("--sleep-requests".into());
            args.push(secs(self.sleep_requests));
        }
        args
    }

    /// Full argument list for a download run (URL not included).
    pub fn download_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--newline".into(),
            "-o".into(),
            self.output_template.to_string_lossy().into_owned(),
            "-f".into(),
            self.format.clone(),
        ];

        let t = &self.toggles;
        let flags = [
            (t.description, "--write-description"),
            (t.info_json, "--write-info-json"),
            (t.subtitles, "--write-subs"),
            (t.auto_captions, "--write-auto-subs"),
            (t.thumbnail, "--write-thumbnail"),
            (t.comments, "--write-comments"),
        ];
        args.extend(flags.iter().filter(|(on, _)| *on).map(|(_, f)| f.to_string()));
        if t.info_json {
            args.push("--no-clean-info-json".into());
        }

        if self.audio_only {
            args.extend(
                ["-x", "--audio-format", AUDIO_CODEC, "--audio-quality", AUDIO_QUALITY]
                    .map(String::from),
            );
        } else {
            args.push("--merge-output-format".into());
            args.push(MERGE_CONTAINER.into());
        }
        if t.any_captions() {
            args.push("--convert-subs".into());
            args.push(SUBTITLE_FORMAT.into());
        }

        if let Some(items) = &self.playlist_items {
            args.push("--playlist-items".into());
            args.push(items.clone());
        }
        if self.no_playlist {
            args.push("--no-playlist".into());
        }
        if self.skip_download {
            args.push("--skip-download".into());
        }

        args.extend(self.identity_args());

        let randomized = self.max_sleep_interval > self.sleep_interval;
        if !self.sleep_interval.is_zero() || randomized {
            args.push("--sleep-interval".into());
            args.push(secs(self.sleep_interval.max(ZERO_SLEEP_FLOOR)));
            if randomized {
                args.push("--max-sleep-interval".into());
                args.push(secs(self.max_sleep_interval));
            }
        }
        if let Some(rate) = self.rate_limit {
            args.push("--limit-rate".into());
            args.push(rate.to_string());
        }
        args.push("--concurrent-fragments".into());
        args.push(self.concurrent_fragments.max(1).to_string());

        args.push(if self.ignore_errors {
            "--ignore-errors".into()
        } else {
            "--abort-on-error".into()
        });
        args
    }

    /// Argument list for a metadata probe (URL not included).
    pub fn probe_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["--dump-single-json", "--skip-download", "--flat-playlist"]
            .map(String::from)
            .to_vec();
        args.extend(self.identity_args());
        args
    }
}

fn secs(d: Duration) -> String {
    d.as_secs_f64().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::options::{resolve, PartialOptions, Preset};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(o: PartialOptions, preset: Option<Preset>) -> EngineConfig {
        let mut s = Settings::default();
        s.last_path = PathBuf::from("/out");
        s.archive_mode = false;
        let opts = resolve(&s, &o, preset).unwrap();
        let policy = StealthPolicy::derive_with(&opts, &mut StdRng::seed_from_u64(5));
        EngineConfig::build(&opts, &policy)
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn plain_video_run() {
        let cfg = build(PartialOptions::for_target("https://e.com/v"), None);
        let args = cfg.download_args();
        assert!(has_pair(&args, "-f", "bestvideo+bestaudio/best"));
        assert!(has_pair(&args, "--merge-output-format", "mp4"));
        assert!(has_pair(
            &args,
            "-o",
            "/out/%(uploader)s/%(upload_date)s - %(title)s/%(title)s.%(ext)s"
        ));
        assert!(!args.contains(&"--write-comments".to_string()));
        assert!(!args.contains(&"--user-agent".to_string()));
        assert!(args.contains(&"--ignore-errors".to_string()));
        assert!(has_pair(&args, "--sleep-interval", "5"));
        assert!(has_pair(&args, "--max-sleep-interval", "10"));
    }

    #[test]
    fn audio_only_archive_run() {
        let o = PartialOptions {
            archive_mode: Some(true),
            audio_only: Some(true),
            layout: Some(crate::options::OutputLayout::Flat),
            ..PartialOptions::for_target("https://e.com/v")
        };
        let args = build(o, None).download_args();
        assert!(has_pair(&args, "-f", "bestaudio/best"));
        assert!(has_pair(&args, "--audio-format", "mp3"));
        assert!(has_pair(&args, "--convert-subs", "srt"));
        assert!(has_pair(&args, "-o", "/out/%(title)s.%(ext)s"));
        for flag in [
            "--write-description",
            "--write-info-json",
            "--write-subs",
            "--write-auto-subs",
            "--write-thumbnail",
            "--write-comments",
            "--no-clean-info-json",
        ] {
            assert!(args.contains(&flag.to_string()), "missing {flag}");
        }
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn stealth_run_carries_identity_and_limits() {
        let o = PartialOptions {
            playlist_items: Some("1-3,8".into()),
            use_playlist: Some(true),
            cookie_source: Some("firefox".into()),
            ignore_errors: Some(false),
            ..PartialOptions::for_target("https://e.com/list")
        };
        let cfg = build(o, Some(Preset::Stealth));
        let args = cfg.download_args();
        assert!(has_pair(&args, "--playlist-items", "1-3,8"));
        assert!(has_pair(&args, "--cookies-from-browser", "firefox"));
        assert!(has_pair(&args, "--concurrent-fragments", "1"));
        assert!(has_pair(
            &args,
            "--extractor-args",
            "youtube:player_client=android,ios,web,web_safari"
        ));
        assert!(has_pair(&args, "--sleep-requests", "5"));
        assert!(args.contains(&"--user-agent".to_string()));
        assert!(args.contains(&"--limit-rate".to_string()));
        // The stealth preset re-enables error skipping.
        assert!(args.contains(&"--ignore-errors".to_string()));
        assert!(cfg.has_cookie_source());
    }

    #[test]
    fn no_playlist_and_skip_download() {
        let o = PartialOptions {
            use_playlist: Some(false),
            skip_media: Some(true),
            sleep_interval: Some(0),
            max_sleep_interval: Some(0),
            ignore_errors: Some(false),
            ..PartialOptions::for_target("https://e.com/v")
        };
        let args = build(o, None).download_args();
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--skip-download".to_string()));
        assert!(args.contains(&"--abort-on-error".to_string()));
        assert!(!args.contains(&"--sleep-interval".to_string()));
    }

    #[test]
    fn window_from_zero_keeps_random_pause() {
        let o = PartialOptions {
            sleep_interval: Some(0),
            max_sleep_interval: Some(10),
            ..PartialOptions::for_target("https://e.com/list")
        };
        let args = build(o, None).download_args();
        assert!(has_pair(&args, "--sleep-interval", "0.001"));
        assert!(has_pair(&args, "--max-sleep-interval", "10"));
    }

    #[test]
    fn probe_args_reuse_identity() {
        let cfg = build(PartialOptions::for_target("https://e.com/v"), Some(Preset::Stealth));
        let args = cfg.probe_args();
        assert_eq!(args[0], "--dump-single-json");
        assert!(args.contains(&"--user-agent".to_string()));
        assert!(!args.contains(&"-o".to_string()));
    }
}
