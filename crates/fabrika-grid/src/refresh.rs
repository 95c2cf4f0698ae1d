//! Periodic reload for grids shown in a long-running view.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Reload period of the contacts view.
pub const CONTACTS_REFRESH: Duration = Duration::from_secs(60);

/// Fires once per period. The first tick comes one full period after
/// creation, since the view has just loaded.
#[derive(Debug)]
pub struct RefreshTimer {
    period: Duration,
    interval: Interval,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
