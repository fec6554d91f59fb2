//! Probe result (`extract_info`).

use serde::Deserialize;

/// Metadata for a single item or a whole playlist/channel.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub duration_secs: Option<f64>,
    /// Number of entries when the target is a playlist or channel.
    pub entry_count: Option<usize>,
    pub webpage_url: Option<String>,
    /// The full engine document.
    pub raw: serde_json::Value,
}

#[derive(Deserialize)]
struct Summary {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    playlist_count: Option<usize>,
    #[serde(default)]
    entries: Option<Vec<serde_json::Value>>,
    webpage_url: Option<String>,
}

impl Metadata {
    /// Build from the engine's JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: serde_json::Value = serde_json::from_slice(bytes)?;
        let s: Summary = serde_json::from_value(raw.clone())?;
        let entry_count = s
            .entries
            .as_ref()
            .map(|e| e.len())
            .or(s.playlist_count);
        Ok(Self {
            id: s.id,
            title: s.title,
            uploader: s.uploader,
            duration_secs: s.duration,
            entry_count,
            webpage_url: s.webpage_url,
            raw,
        })
    }

    pub fn is_playlist(&self) -> bool {
        self.entry_count.is_some()
    }
}
