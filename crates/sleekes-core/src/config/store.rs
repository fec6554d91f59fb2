//! Settings persistence: load with self-healing defaults, atomic save.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::Settings;

/// Settings could not be written. The in-memory settings stay valid.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("cannot locate settings directory: {0}")]
    Location(String),
    #[error("create settings directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("write settings {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Backing document for [`Settings`]. One writer at a time is assumed.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at the default location: `~/.config/sleekes/settings.toml`.
    pub fn open_default() -> Result<Self, PersistenceError> {
        Ok(Self::at(Self::default_path()?))
    }

    /// Store backed by an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, PersistenceError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("sleekes")
            .map_err(|e| PersistenceError::Location(e.to_string()))?;
        Ok(xdg_dirs.get_config_home().join("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. Never fails: an absent or malformed document yields the
    /// defaults, which are then written back.
    pub fn load(&self) -> Settings {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no settings at {}, creating defaults", self.path.display());
                return self.heal();
            }
            Err(e) => {
                tracing::warn!("read settings {}: {}; using defaults", self.path.display(), e);
                return self.heal();
            }
        };
        match Settings::from_toml(&data) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "settings {} are malformed ({}); replacing with defaults",
                    self.path.display(),
                    e.message()
                );
                self.heal()
            }
        }
    }

    /// Persist settings atomically (temp file in the same directory, then rename).
    pub fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|source| PersistenceError::CreateDir {
            path: parent.clone(),
            source,
        })?;

        let body = settings.to_toml()?;
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(body.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        tracing::debug!("saved settings to {}", self.path.display());
        Ok(())
    }

    fn heal(&self) -> Settings {
        let defaults = Settings::default();
        if let Err(e) = self.save(&defaults) {
            tracing::warn!("could not write default settings: {}", e);
        }
        defaults
    }
}
