// ── Fixed-interval throttle ──
//
// A call is allowed when no successful call has been recorded yet, or
// when strictly more than `interval` has passed since the last one.
// Only successes are recorded, so a failed refresh can be retried at once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Wall-clock source, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real UTC clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Stateful guard: last successful call plus minimum interval.
#[derive(Clone)]
pub struct Throttle {
    interval: Duration,
    last_success: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Throttle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .field("last_success", &self.last_success)
            .finish_non_exhaustive()
    }
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(interval, Arc::new(SystemClock))
    }

    pub fn with_clock(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            last_success: None,
            clock,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    /// Whether a call made now would go through.
    pub fn is_ready(&self) -> bool {
        let Some(last) = self.last_success else {
            return true;
        };
        // A clock that went backwards counts as "too soon".
        (self.clock.now() - last)
            .to_std()
            .is_ok_and(|elapsed| elapsed > self.interval)
    }

    /// Record a successful call at the current time.
    pub fn record_success(&mut self) {
        self.last_success = Some(self.clock.now());
    }

    /// Forget the last call; the next one goes through.
    pub fn reset(&mut self) {
        self.last_success = None;
    }
}
