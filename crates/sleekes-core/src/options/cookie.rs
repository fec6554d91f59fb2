use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::InvalidOptions;

/// Browser whose cookie jar the extraction engine may borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieSource {
    Chrome,
    Firefox,
    Edge,
    Safari,
    Brave,
    Chromium,
    Opera,
    Vivaldi,
}

impl CookieSource {
    pub const ALL: [CookieSource; 8] = [
        CookieSource::Chrome,
        CookieSource::Firefox,
        CookieSource::Edge,
        CookieSource::Safari,
        CookieSource::Brave,
        CookieSource::Chromium,
        CookieSource::Opera,
        CookieSource::Vivaldi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CookieSource::Chrome => "chrome",
            CookieSource::Firefox => "firefox",
            CookieSource::Edge => "edge",
            CookieSource::Safari => "safari",
            CookieSource::Brave => "brave",
            CookieSource::Chromium => "chromium",
            CookieSource::Opera => "opera",
            CookieSource::Vivaldi => "vivaldi",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Parse an optional cookie source where `"none"` (any case) or an empty
    /// string means no cookies.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, InvalidOptions> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for CookieSource {
    type Err = InvalidOptions;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InvalidOptions::CookieSource(s.to_string()))
    }
}

impl fmt::Display for CookieSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_browsers_case_insensitively() {
        assert_eq!("chrome".parse::<CookieSource>().unwrap(), CookieSource::Chrome);
        assert_eq!("Firefox".parse::<CookieSource>().unwrap(), CookieSource::Firefox);
        assert_eq!(" EDGE ".parse::<CookieSource>().unwrap(), CookieSource::Edge);
    }

    #[test]
    fn rejects_unknown_browser() {
        let err = "netscape".parse::<CookieSource>().unwrap_err();
        assert_eq!(err, InvalidOptions::CookieSource("netscape".to_string()));
        assert!(err.to_string().contains("safari"));
    }

    #[test]
    fn none_means_no_cookies() {
        assert_eq!(CookieSource::parse_optional("None").unwrap(), None);
        assert_eq!(CookieSource::parse_optional("").unwrap(), None);
        assert_eq!(
            CookieSource::parse_optional("safari").unwrap(),
            Some(CookieSource::Safari)
        );
    }
}
