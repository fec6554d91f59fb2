//! Classify engine diagnostics into outcome-relevant error kinds.

/// High-level classification of an engine error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The item itself is gone, private, geo-blocked or age-gated.
    ItemUnavailable,
    /// The origin wants a signed-in session.
    AuthRequired,
    /// The origin asked us to slow down (HTTP 429, bot checks).
    Throttled,
    /// Network-level failure (DNS, connection reset, timeouts).
    Network,
    /// The engine ran out of retries; the connection is gone for the whole run.
    NetworkExhausted,
    /// Output could not be written because the disk is full.
    DiskFull,
    /// Anything else.
    Other,
}

impl ErrorClass {
    /// Whether this error ends the whole job. Authentication failures are only
    /// fatal when there is no cookie source that could have satisfied them.
    pub fn is_fatal(self, has_cookie_source: bool) -> bool {
        match self {
            ErrorClass::DiskFull | ErrorClass::NetworkExhausted => true,
            ErrorClass::AuthRequired => !has_cookie_source,
            ErrorClass::ItemUnavailable
            | ErrorClass::Throttled
            | ErrorClass::Network
            | ErrorClass::Other => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorClass::ItemUnavailable => "unavailable",
            ErrorClass::AuthRequired => "authentication required",
            ErrorClass::Throttled => "throttled",
            ErrorClass::Network => "network",
            ErrorClass::NetworkExhausted => "network exhausted",
            ErrorClass::DiskFull => "disk full",
            ErrorClass::Other => "error",
        }
    }
}

const DISK_FULL: &[&str] = &["no space left on device", "disk quota exceeded", "errno 28"];
const AUTH: &[&str] = &[
    "sign in to confirm",
    "login required",
    "requires authentication",
    "use --cookies",
    "this video is only available for registered users",
    "account cookies",
];
const THROTTLED: &[&str] = &["http error 429", "too many requests", "rate-limit", "rate limit"];
const UNAVAILABLE: &[&str] = &[
    "private video",
    "video unavailable",
    "this video is not available",
    "has been removed",
    "members-only",
    "not available in your country",
    "age-restricted",
    "premieres in",
    "http error 404",
    "http error 410",
];
const NETWORK: &[&str] = &[
    "unable to download webpage",
    "timed out",
    "connection reset",
    "connection refused",
    "name or service not known",
    "temporary failure in name resolution",
    "network is unreachable",
    "urlopen error",
];
const NETWORK_EXHAUSTED: &[&str] = &["giving up after", "retries exhausted", "max retries exceeded"];

/// Classify one engine error message. Order matters: disk, auth and retry
/// exhaustion are checked before the broader patterns they often contain.
pub fn classify(message: &str) -> ErrorClass {
    let m = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| m.contains(n));
    if has(DISK_FULL) {
        ErrorClass::DiskFull
    } else if has(AUTH) {
        ErrorClass::AuthRequired
    } else if has(NETWORK_EXHAUSTED) {
        ErrorClass::NetworkExhausted
    } else if has(THROTTLED) {
        ErrorClass::Throttled
    } else if has(UNAVAILABLE) {
        ErrorClass::ItemUnavailable
    } else if has(NETWORK) {
        ErrorClass::Network
    } else {
        ErrorClass::Other
    }
}
