//! Drift-free periodic ticking.
//!
//! Deadlines are fixed instants, `tick_start + period`, not a sleep of `period`
//! after the work of a tick is done, so time spent fetching or rendering does not
//! push later ticks back. A tick that overruns its period is followed immediately
//! by the next one, which then starts a fresh schedule from that moment; missed
//! ticks are not replayed.

use crate::config::RefreshPeriod;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    cancel: CancellationToken,
    last_start: Option<Instant>,
}

impl Ticker {
    pub fn new(period: RefreshPeriod, cancel: CancellationToken) -> Self {
        Self {
            period: period.as_duration(),
            cancel,
            last_start: None,
        }
    }

    /// Instant at which the tick after one started at `tick_start` is due.
    ///
    /// Periods too long for the clock to represent saturate to a deadline
    /// decades away.
    pub fn next_deadline(&self, tick_start: Instant) -> Instant {
        tick_start
            .checked_add(self.period)
            .unwrap_or_else(|| tick_start + FAR_FUTURE)
    }

    /// Waits for the next tick and returns its start instant, or `None` once the
    /// cancellation token fires. The first tick is due immediately.
    pub async fn tick(&mut self) -> Option<Instant> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let start = match self.last_start {
            None => Instant::now(),
            Some(previous) => {
                let deadline = self.next_deadline(previous);
                if deadline <= Instant::now() {
                    Instant::now()
                } else {
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return None,
                        _ = time::sleep_until(deadline) => deadline,
                    }
                }
            }
        };

        self.last_start = Some(start);
        Some(start)
    }
}
