//! Delays between items and between requests.

use rand::Rng;
use std::time::Duration;

/// Pacing schedule for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Fixed pause before each media item.
    pub item_delay: Duration,
    /// Upper bound of the randomized item pause. Ignored when `<= item_delay`.
    pub max_item_delay: Duration,
    /// Pause between individual requests, independent of the item pause.
    pub request_delay: Duration,
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            item_delay: Duration::ZERO,
            max_item_delay: Duration::ZERO,
            request_delay: Duration::ZERO,
        }
    }

    /// True when the item pause is drawn from a window rather than fixed.
    pub fn is_randomized(&self) -> bool {
        self.max_item_delay > self.item_delay
    }

    /// Draw the pause before the next item: uniform in `[item_delay,
    /// max_item_delay]`, or exactly `item_delay` when the window is empty.
    pub fn sample_item_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if !self.is_randomized() {
            return self.item_delay;
        }
        let lo = u64::try_from(self.item_delay.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max_item_delay.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}
