//! `sleekes probe` – metadata only, nothing is written.

use anyhow::{Context, Result};
use clap::Args;
use sleekes_core::config::Settings;
use sleekes_core::engine::{EngineConfig, Extractor};
use sleekes_core::options::{resolve, PartialOptions};
use sleekes_core::stealth::StealthPolicy;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct ProbeArgs {
    /// Video, playlist or channel URL.
    pub target: String,

    /// Borrow cookies from a browser ("none" to clear).
    #[arg(long, value_name = "BROWSER")]
    pub cookies: Option<String>,

    /// Probe with a rotated identity.
    #[arg(long)]
    pub stealth: bool,

    /// Path to the yt-dlp executable.
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,
}

pub async fn run_probe(settings: &Settings, args: ProbeArgs) -> Result<()> {
    let overrides = PartialOptions {
        cookie_source: args.cookies.clone(),
        stealth: Some(args.stealth),
        ..PartialOptions::for_target(&args.target)
    };
    let options = resolve(settings, &overrides, None)?;
    let config = EngineConfig::build(&options, &StealthPolicy::derive(&options));
    let extractor = super::extractor(args.yt_dlp.as_ref());
    let target = options.target().to_string();

    let meta = tokio::task::spawn_blocking(move || extractor.extract_info(&config, &target))
        .await
        .context("probe task join")??;

    println!("Title:    {}", meta.title.as_deref().unwrap_or("-"));
    println!("Uploader: {}", meta.uploader.as_deref().unwrap_or("-"));
    if let Some(secs) = meta.duration_secs {
        let secs = secs.round() as u64;
        println!("Duration: {}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
    }
    if let Some(n) = meta.entry_count {
        println!("Entries:  {n}");
    }
    if let Some(url) = &meta.webpage_url {
        println!("URL:      {url}");
    }
    Ok(())
}
