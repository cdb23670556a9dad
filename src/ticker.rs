use std::time::{Duration, Instant};

/// A cancellable periodic schedule. At most one run is armed at a time; the
/// caller supplies the current time so the schedule can be driven by any clock.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval, next_due: None }
    }

    /// Arms the schedule with the first tick one interval from `now`. Does
    /// nothing if already armed.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Disarms the schedule. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Changes the period. A pending deadline is moved so it falls one new
    /// period after the last tick.
    pub fn set_interval(&mut self, interval: Duration) {
        let old = self.interval;
        self.next_due = self.next_due.map(|due| due.checked_sub(old).map_or(due, |last| last + interval));
        self.interval = interval;
    }

    /// Returns true once per elapsed period and re-arms for the next one.
    /// Missed periods are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, if armed.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
