//! Anti-detection policy for one archive job.
//!
//! Derived fresh from [`ResolvedOptions`] for every job:
//! - pacing between items (fixed or randomized window) and between requests
//! - outbound rate ceiling and sub-file concurrency
//! - identity (user agent + headers) and client emulation fallback order
//!
//! With stealth off only the user's own sleep values apply. With stealth on the
//! pacing window is guaranteed non-empty, concurrency drops to 1 and one
//! identity is drawn per job so the fingerprint stays coherent for its whole
//! session.

mod identity;
mod pacing;

pub use identity::{ClientProfile, Identity, STEALTH_CLIENT_ORDER, USER_AGENT_POOL};
pub use pacing::Pacing;

use rand::Rng;
use std::time::Duration;

use crate::options::ResolvedOptions;

/// Minimum fixed item pause in stealth mode, in seconds.
pub const STEALTH_MIN_SLEEP_SECS: u64 = 5;
/// In stealth mode an empty window is widened to `fixed * STEALTH_MAX_SLEEP_FACTOR`.
pub const STEALTH_MAX_SLEEP_FACTOR: u64 = 2;
/// Pause between individual requests in stealth mode, in seconds.
pub const STEALTH_REQUEST_SLEEP_SECS: u64 = 5;
/// Outbound rate ceiling in stealth mode (2 MiB/s).
pub const STEALTH_RATE_LIMIT_BYTES: u64 = 2 * 1024 * 1024;
/// Concurrent sub-file fetches when stealth is off.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Pacing, rate and identity settings applied to every request of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StealthPolicy {
    pub stealth: bool,
    pub pacing: Pacing,
    /// Bytes per second; `None` means unlimited.
    pub rate_limit: Option<u64>,
    pub concurrency: usize,
    pub identity: Identity,
    /// Emulated clients to try in order when the origin rejects a request.
    pub client_fallback: Vec<ClientProfile>,
}

impl StealthPolicy {
    /// Derive the policy using the thread-local RNG.
    pub fn derive(options: &ResolvedOptions) -> Self {
        Self::derive_with(options, &mut rand::rng())
    }

    /// Derive the policy with an explicit RNG (identity draw only).
    pub fn derive_with<R: Rng + ?Sized>(options: &ResolvedOptions, rng: &mut R) -> Self {
        let inputs = options.stealth();
        if !inputs.enabled {
            return Self {
                stealth: false,
                pacing: Pacing {
                    item_delay: Duration::from_secs(inputs.sleep_interval),
                    max_item_delay: Duration::from_secs(inputs.max_sleep_interval),
                    request_delay: Duration::ZERO,
                },
                rate_limit: None,
                concurrency: DEFAULT_CONCURRENCY,
                identity: Identity::engine_default(),
                client_fallback: Vec::new(),
            };
        }

        let fixed = inputs.sleep_interval.max(STEALTH_MIN_SLEEP_SECS);
        let max = if inputs.max_sleep_interval > fixed {
            inputs.max_sleep_interval
        } else {
            fixed.saturating_mul(STEALTH_MAX_SLEEP_FACTOR)
        };
        let policy = Self {
            stealth: true,
            pacing: Pacing {
                item_delay: Duration::from_secs(fixed),
                max_item_delay: Duration::from_secs(max),
                request_delay: Duration::from_secs(STEALTH_REQUEST_SLEEP_SECS),
            },
            rate_limit: Some(STEALTH_RATE_LIMIT_BYTES),
            concurrency: 1,
            identity: Identity::rotated(rng),
            client_fallback: STEALTH_CLIENT_ORDER.to_vec(),
        };
        tracing::debug!(
            fixed_secs = fixed,
            max_secs = max,
            user_agent = policy.identity.user_agent.as_deref().unwrap_or("-"),
            "derived stealth policy"
        );
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::options::{resolve, PartialOptions, MAX_SLEEP_SECS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn options(stealth: bool, sleep: u64, max_sleep: u64) -> ResolvedOptions {
        let o = PartialOptions {
            stealth: Some(stealth),
            sleep_interval: Some(sleep),
            max_sleep_interval: Some(max_sleep),
            ..PartialOptions::for_target("https://example.com/watch?v=1")
        };
        resolve(&Settings::default(), &o, None).unwrap()
    }

    #[test]
    fn non_stealth_uses_user_values_only() {
        let p = StealthPolicy::derive(&options(false, 3, 8));
        assert!(!p.stealth);
        assert_eq!(p.pacing.item_delay, Duration::from_secs(3));
        assert_eq!(p.pacing.max_item_delay, Duration::from_secs(8));
        assert_eq!(p.pacing.request_delay, Duration::ZERO);
        assert_eq!(p.rate_limit, None);
        assert_eq!(p.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(p.identity, Identity::engine_default());
        assert!(p.client_fallback.is_empty());
    }

    #[test]
    fn non_stealth_zero_sleep_means_no_delay() {
        let p = StealthPolicy::derive(&options(false, 0, 0));
        assert_eq!(p.pacing, Pacing::none());
    }

    #[test]
    fn stealth_raises_zero_sleep_to_floor() {
        let p = StealthPolicy::derive(&options(true, 0, 0));
        assert_eq!(p.pacing.item_delay, Duration::from_secs(STEALTH_MIN_SLEEP_SECS));
        assert_eq!(
            p.pacing.max_item_delay,
            Duration::from_secs(STEALTH_MIN_SLEEP_SECS * STEALTH_MAX_SLEEP_FACTOR)
        );
    }

    #[test]
    fn stealth_keeps_wider_user_window() {
        let p = StealthPolicy::derive(&options(true, 15, 40));
        assert_eq!(p.pacing.item_delay, Duration::from_secs(15));
        assert_eq!(p.pacing.max_item_delay, Duration::from_secs(40));
    }

    #[test]
    fn stealth_window_at_the_sleep_ceiling() {
        let p = StealthPolicy::derive(&options(true, MAX_SLEEP_SECS, 0));
        assert_eq!(p.pacing.item_delay, Duration::from_secs(MAX_SLEEP_SECS));
        assert!(p.pacing.max_item_delay > p.pacing.item_delay);
    }

    #[test]
    fn stealth_invariants_hold_for_all_inputs() {
        let mut rng = StdRng::seed_from_u64(3);
        for sleep in [0, 1, 5, 6, 30] {
            for max_sleep in [0, 1, 5, 10, 60] {
                let p = StealthPolicy::derive_with(&options(true, sleep, max_sleep), &mut rng);
                assert_eq!(p.concurrency, 1);
                assert!(p.pacing.item_delay > Duration::ZERO);
                assert!(p.pacing.max_item_delay > p.pacing.item_delay);
                assert_eq!(p.rate_limit, Some(STEALTH_RATE_LIMIT_BYTES));
                assert!(p.pacing.request_delay > Duration::ZERO);
                assert!(p.identity.is_rotated());
                assert!(p.client_fallback.len() >= 2);
            }
        }
    }
}
