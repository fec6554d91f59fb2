//! CLI for the Sleekes media archiver.

mod commands;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sleekes_core::config::{Settings, SettingsStore};

use commands::{
    run_archive, run_completions, run_man, run_probe, run_settings, ArchiveArgs, ProbeArgs,
    SettingsAction,
};

/// Top-level CLI for Sleekes.
#[derive(Debug, Parser)]
#[command(name = "sleekes", version)]
#[command(about = "Sleekes: archive videos, playlists and channels with their metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Archive a video, playlist or channel.
    Archive(ArchiveArgs),

    /// Show what a target resolves to without downloading.
    Probe(ProbeArgs),

    /// Show, locate or reset the persisted settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

/// Settings are read once per invocation.
fn load_settings() -> Result<(SettingsStore, Settings)> {
    let store = SettingsStore::open_default()?;
    let settings = store.load();
    tracing::debug!("loaded settings from {}: {:?}", store.path().display(), settings);
    Ok((store, settings))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Archive(args) => {
                let (store, settings) = load_settings()?;
                run_archive(&store, settings, args).await?;
            }
            CliCommand::Probe(args) => {
                let (_, settings) = load_settings()?;
                run_probe(&settings, args).await?;
            }
            CliCommand::Settings { action } => {
                let (store, settings) = load_settings()?;
                run_settings(&store, &settings, action)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
