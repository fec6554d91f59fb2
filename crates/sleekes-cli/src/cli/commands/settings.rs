//! `sleekes settings` – inspect or reset the settings document.

use anyhow::Result;
use clap::Subcommand;
use sleekes_core::config::{Settings, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Print where the settings live.
    Path,
    /// Replace the settings with the defaults.
    Reset,
}

pub fn run_settings(store: &SettingsStore, settings: &Settings, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => print!("{}", settings.to_toml()?),
        SettingsAction::Path => println!("{}", store.path().display()),
        SettingsAction::Reset => {
            store.save(&Settings::default())?;
            println!("Settings reset: {}", store.path().display());
        }
    }
    Ok(())
}
