use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// How often global and country data are re-fetched.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Fixed-interval refresh timer. It is polled, not threaded: the owner calls
/// [`RefreshScheduler::poll`] from its event loop.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    last_run: Option<Instant>,
    last_updated: Option<DateTime<Local>>,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            last_updated: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True if a refresh is due at `now`. The first poll is always due.
    /// A due poll re-arms the timer.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.mark(now);
        }
        due
    }

    /// Record a refresh made at `now` outside the timer (a manual refresh).
    /// The next one becomes due a full interval later.
    pub fn mark(&mut self, now: Instant) {
        self.last_run = Some(now);
        self.last_updated = Some(Local::now());
    }

    /// Time left until the next refresh (zero if one is due).
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last_run {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    /// Wall-clock time of the last refresh, for the "last updated" label.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn last_updated_label(&self) -> String {
        self.last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_is_due_then_waits_for_interval() {
        let mut s = RefreshScheduler::new(Duration::from_secs(60));
        let t0 = Instant::now();
        assert_eq!(s.last_updated_label(), "never");
        assert!(s.poll(t0));
        assert!(s.last_updated().is_some());
        assert!(!s.poll(t0 + Duration::from_secs(59)));
        assert_eq!(
            s.time_until_next(t0 + Duration::from_secs(20)),
            Duration::from_secs(40)
        );
        assert!(s.poll(t0 + Duration::from_secs(60)));
        assert!(!s.poll(t0 + Duration::from_secs(61)));
    }

    #[test]
    fn manual_mark_rearms_the_timer() {
        let mut s = RefreshScheduler::new(Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(s.poll(t0));
        s.mark(t0 + Duration::from_secs(50));
        assert!(!s.poll(t0 + Duration::from_secs(60)));
        assert_eq!(
            s.time_until_next(t0 + Duration::from_secs(60)),
            Duration::from_secs(50)
        );
        assert!(s.poll(t0 + Duration::from_secs(110)));
    }

    #[test]
    fn mark_before_first_poll_sets_label() {
        let mut s = RefreshScheduler::default();
        s.mark(Instant::now());
        assert_ne!(s.last_updated_label(), "never");
        assert!(s.time_until_next(Instant::now()) > Duration::ZERO);
    }
}
