//! Resolution-time validation errors. Reported before any job starts.

/// The requested options cannot form a valid run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOptions {
    #[error("invalid playlist range {input:?}: {reason}")]
    PlaylistRange { input: String, reason: String },
    #[error("unsupported cookie source {0:?} (expected one of: {list})", list = super::CookieSource::names().join(", "))]
    CookieSource(String),
    #[error("no target URL or path given")]
    MissingTarget,
    #[error("unsupported target {0:?}: only http and https URLs are accepted")]
    Target(String),
    #[error("{field} of {secs} s is out of range (at most {max} s)", max = super::MAX_SLEEP_SECS)]
    Sleep { field: &'static str, secs: u64 },
}
