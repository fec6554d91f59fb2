//! Option resolution.
//!
//! Merges compiled-in defaults, persisted [`Settings`](crate::config::Settings),
//! explicit per-run overrides and an optional named preset into one immutable
//! [`ResolvedOptions`]. Later layers win field by field; archive mode is
//! normalised here so every caller sees the same toggles.

mod cookie;
mod error;
mod partial;
mod playlist;
mod preset;
mod resolve;
mod resolved;

pub use cookie::CookieSource;
pub use error::InvalidOptions;
pub use partial::PartialOptions;
pub use playlist::PlaylistItems;
pub use preset::Preset;
pub use resolve::{resolve, MAX_SLEEP_SECS};
pub use resolved::{ContentToggles, OutputLayout, ResolvedOptions, StealthInputs};
