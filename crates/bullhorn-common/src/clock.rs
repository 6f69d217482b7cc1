use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of the current instant (UTC).
///
/// All temporal decisions in the engine (active windows, snooze
/// expiry, reminder due-ness) go through this trait so they can be
/// driven by a [`ManualClock`] in tests instead of wall time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic scheduling tests.
///
/// # Examples
///
/// ```
/// use bullhorn_common::clock::{Clock, ManualClock};
/// use chrono::{Duration, Utc};
///
/// let clock = ManualClock::new(Utc::now());
/// let t0 = clock.now();
/// clock.advance(Duration::minutes(30));
/// assert_eq!(clock.now() - t0, Duration::minutes(30));
/// ```
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now = instant;
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Start of the next UTC calendar day after `now`.
///
/// This is the deadline used by "snooze for today": the alert stays
/// silent until midnight UTC, then surfaces again.
pub fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(now)
}
