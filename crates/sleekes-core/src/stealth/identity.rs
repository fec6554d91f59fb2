//! Outbound identity: user-agent rotation pool and client emulation order.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Browsers the origin sees every day. Rotated per job, never per request.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 18_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Mobile Safari/537.36",
];

/// Headers sent alongside a rotated user agent.
const ROTATED_HEADERS: &[(&str, &str)] = &[
    ("Accept-Language", "en-US,en;q=0.9"),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
];

/// What the origin sees for every request of one job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    /// `None` keeps the extraction engine's own user agent.
    pub user_agent: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Identity {
    /// Engine defaults: no overrides at all.
    pub fn engine_default() -> Self {
        Self::default()
    }

    /// Pick a user agent uniformly from [`USER_AGENT_POOL`].
    pub fn rotated<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let user_agent = USER_AGENT_POOL
            .choose(rng)
            .map(|ua| ua.to_string());
        Self {
            user_agent,
            headers: ROTATED_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.user_agent.is_some()
    }
}

/// Client the engine emulates when talking to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientProfile {
    Android,
    Ios,
    Web,
    WebSafari,
}

impl ClientProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientProfile::Android => "android",
            ClientProfile::Ios => "ios",
            ClientProfile::Web => "web",
            ClientProfile::WebSafari => "web_safari",
        }
    }

    pub fn is_mobile_app(self) -> bool {
        matches!(self, ClientProfile::Android | ClientProfile::Ios)
    }
}

/// Fallback order used in stealth mode: mobile apps first, then desktop web,
/// then the Safari web client as a last resort.
pub const STEALTH_CLIENT_ORDER: [ClientProfile; 4] = [
    ClientProfile::Android,
    ClientProfile::Ios,
    ClientProfile::Web,
    ClientProfile::WebSafari,
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rotated_identity_comes_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let id = Identity::rotated(&mut rng);
            let ua = id.user_agent.as_deref().expect("rotated identity has a UA");
            assert!(USER_AGENT_POOL.contains(&ua));
            assert_eq!(id.headers.len(), ROTATED_HEADERS.len());
        }
    }

    #[test]
    fn rotation_eventually_changes_agent() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = Identity::rotated(&mut rng);
        let changed = (0..64).any(|_| Identity::rotated(&mut rng) != first);
        assert!(changed);
    }

    #[test]
    fn default_identity_has_no_overrides() {
        let id = Identity::engine_default();
        assert!(!id.is_rotated());
        assert!(id.headers.is_empty());
    }

    #[test]
    fn stealth_order_starts_with_mobile() {
        assert!(STEALTH_CLIENT_ORDER[0].is_mobile_app());
        assert!(!STEALTH_CLIENT_ORDER.last().unwrap().is_mobile_app());
        assert_eq!(STEALTH_CLIENT_ORDER.last(), Some(&ClientProfile::WebSafari));
    }
}
