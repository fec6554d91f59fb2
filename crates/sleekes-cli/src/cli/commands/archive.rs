//! `sleekes archive` – resolve options and run one archive job.

use anyhow::{bail, Result};
use clap::Args;
use sleekes_core::config::{Settings, SettingsStore};
use sleekes_core::job::{ArchiveJob, JobRunner, Outcome};
use sleekes_core::options::{resolve, OutputLayout, PartialOptions, Preset};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::console::ConsoleListener;

#[derive(Debug, Clone, Args)]
pub struct ArchiveArgs {
    /// Video, playlist or channel URL (or an id the engine understands).
    pub target: String,

    /// Output directory (default: last used).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Archive mode: also write description, info JSON, subtitles, captions, thumbnail and comments.
    #[arg(short, long)]
    pub archive: bool,

    /// Extract audio only (mp3).
    #[arg(short = 'x', long = "audio")]
    pub audio: bool,

    /// Skip the media file; write metadata only.
    #[arg(long)]
    pub skip_video: bool,

    /// Recommended preset: archive + stealth, 5 s between items.
    #[arg(long, conflicts_with = "stealth")]
    pub rec: bool,

    /// Stealth preset: slow pacing, rate limit and a rotated identity.
    #[arg(long)]
    pub stealth: bool,

    /// Write the description.
    #[arg(long)]
    pub desc: bool,

    /// Write the info JSON.
    #[arg(long)]
    pub json: bool,

    /// Write subtitles.
    #[arg(long)]
    pub subs: bool,

    /// Write automatic captions.
    #[arg(long)]
    pub auto_subs: bool,

    /// Write the thumbnail.
    #[arg(long)]
    pub thumb: bool,

    /// Write comments.
    #[arg(long)]
    pub comments: bool,

    /// Fixed pause between items, in seconds.
    #[arg(long, value_name = "SECS")]
    pub sleep: Option<u64>,

    /// Upper bound of the randomized pause between items, in seconds.
    #[arg(long, value_name = "SECS")]
    pub max_sleep: Option<u64>,

    /// Borrow cookies from a browser (chrome, firefox, edge, safari, ...; "none" to clear).
    #[arg(long, value_name = "BROWSER")]
    pub cookies: Option<String>,

    /// Playlist items to fetch, e.g. "1-5,10".
    #[arg(long, value_name = "RANGE")]
    pub playlist_items: Option<String>,

    /// Only fetch the video when the URL also names a playlist.
    #[arg(long)]
    pub no_playlist: bool,

    /// Write files straight into the output directory.
    #[arg(long)]
    pub flat: bool,

    /// Abort the batch on the first failing item.
    #[arg(long)]
    pub no_ignore_errors: bool,

    /// Remember these options as the new defaults.
    #[arg(long)]
    pub save: bool,

    /// Path to the yt-dlp executable.
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,
}

fn on(flag: bool) -> Option<bool> {
    flag.then_some(true)
}

impl ArchiveArgs {
    /// Per-run overrides. Flags that are not given leave the settings alone.
    pub fn to_overrides(&self) -> PartialOptions {
        PartialOptions {
            target: Some(self.target.clone()),
            output_dir: self.output.clone(),
            layout: self.flat.then_some(OutputLayout::Flat),
            archive_mode: on(self.archive),
            audio_only: on(self.audio),
            skip_media: on(self.skip_video),
            write_description: on(self.desc),
            write_info_json: on(self.json),
            write_subtitles: on(self.subs),
            write_auto_captions: on(self.auto_subs),
            write_thumbnail: on(self.thumb),
            write_comments: on(self.comments),
            playlist_items: self.playlist_items.clone(),
            use_playlist: self.no_playlist.then_some(false),
            cookie_source: self.cookies.clone(),
            ignore_errors: self.no_ignore_errors.then_some(false),
            sleep_interval: self.sleep,
            max_sleep_interval: self.max_sleep,
            stealth: None,
        }
    }

    pub fn preset(&self) -> Option<Preset> {
        if self.rec {
            Some(Preset::Recommended)
        } else if self.stealth {
            Some(Preset::Stealth)
        } else {
            None
        }
    }
}

/// Save without failing the run; the in-memory settings stay valid.
fn persist(store: &SettingsStore, settings: &Settings) {
    if let Err(e) = store.save(settings) {
        tracing::warn!("could not save settings: {e}");
        eprintln!("warning: could not save settings: {e}");
    }
}

pub async fn run_archive(
    store: &SettingsStore,
    mut settings: Settings,
    args: ArchiveArgs,
) -> Result<()> {
    let preset = args.preset();
    let options = resolve(&settings, &args.to_overrides(), preset)?;

    if args.save {
        settings.remember(&options);
        persist(store, &settings);
    }

    let job = ArchiveJob::new(options);
    if let Some(p) = preset {
        println!("Preset: {p}");
    }
    println!("Output: {}", job.options().output_dir().display());
    let output_dir = job.options().output_dir().to_path_buf();

    let runner = JobRunner::new(Arc::new(super::extractor(args.yt_dlp.as_ref())));
    let handle = runner.start(job);

    let token = handle.abort_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ncancelling...");
            token.request();
        }
    });

    let mut console = ConsoleListener::new();
    let outcome = handle.forward(&mut console).await;
    ctrl_c.abort();

    match outcome {
        Outcome::Success => {
            settings.last_path = std::fs::canonicalize(&output_dir).unwrap_or(output_dir);
            persist(store, &settings);
            Ok(())
        }
        Outcome::Failure { reason } => bail!("archive failed: {reason}"),
    }
}
