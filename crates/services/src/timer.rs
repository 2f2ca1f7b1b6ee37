//! Fixed-period timer that reveals counting icons one by one.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use count_core::model::PlaySettings;

/// Repeating timer bound to a cancellation token.
///
/// The first tick fires one period after creation. The timer stops for good
/// once `total` ticks have fired or the token is cancelled; dropping it
/// releases the underlying interval.
#[derive(Debug)]
pub struct RevealTimer {
    interval: Interval,
    cancel: CancellationToken,
    fired: u8,
    total: u8,
}

impl RevealTimer {
    #[must_use]
    pub fn start(period: Duration, total: u8, cancel: CancellationToken) -> Self {
        let period = PlaySettings::clamp_reveal_period(period);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            cancel,
            fired: 0,
            total,
        }
    }

    /// Wait for the next tick and return how many icons are now visible.
    ///
    /// Returns `None` when all icons are shown or the timer was cancelled.
    pub async fn next(&mut self) -> Option<u8> {
        if self.fired >= self.total || self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            _ = self.interval.tick() => {
                self.fired += 1;
                Some(self.fired)
            }
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
