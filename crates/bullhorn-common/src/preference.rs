//! Per-user, per-alert read/snooze state machine.
//!
//! The state is a closed tagged variant: the read timestamp exists
//! only in `Read` and the snooze deadline only in `Snoozed`, so the
//! "timestamp set iff in the matching state" invariant holds by
//! construction. All transitions are total over the three states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::next_utc_midnight;

/// Current read/snooze state of one (user, alert) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PreferenceState {
    Unread,
    Read { last_read_at: DateTime<Utc> },
    Snoozed { until: DateTime<Utc> },
}

/// Preference record for one (user, alert) pair, created lazily the
/// first time the user enters the alert's audience or is addressed by
/// a delivery, read, or snooze action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAlertPreference {
    pub user_id: String,
    pub alert_id: String,
    pub state: PreferenceState,
}

impl UserAlertPreference {
    pub fn new(user_id: impl Into<String>, alert_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            alert_id: alert_id.into(),
            state: PreferenceState::Unread,
        }
    }

    /// Mark read. No-op when already read, so the original read
    /// timestamp survives repeated calls.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        match self.state {
            PreferenceState::Read { .. } => {}
            PreferenceState::Unread | PreferenceState::Snoozed { .. } => {
                self.state = PreferenceState::Read { last_read_at: now };
            }
        }
    }

    /// Mark unread from any state, dropping the read timestamp or
    /// snooze deadline the prior state carried.
    pub fn mark_unread(&mut self) {
        self.state = PreferenceState::Unread;
    }

    /// Snooze until `until`. Re-snoozing while already snoozed
    /// replaces the deadline with the new value.
    pub fn snooze(&mut self, until: DateTime<Utc>) {
        self.state = PreferenceState::Snoozed { until };
    }

    /// Snooze until the start of the next UTC calendar day.
    pub fn snooze_for_today(&mut self, now: DateTime<Utc>) {
        self.snooze(next_utc_midnight(now));
    }

    /// Whether the pair is effectively snoozed at `now`. A deadline
    /// that has already passed counts as not snoozed even if the lazy
    /// expiry transition has not run yet.
    pub fn is_snoozed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.state, PreferenceState::Snoozed { until } if now < until)
    }

    /// Lazy snooze expiry: force the state back to Unread once the
    /// deadline has passed. Idempotent; must run before any read of
    /// the effective state. Returns true when a transition happened.
    pub fn ensure_snooze_expired(&mut self, now: DateTime<Utc>) -> bool {
        if let PreferenceState::Snoozed { until } = self.state {
            if now >= until {
                self.state = PreferenceState::Unread;
                return true;
            }
        }
        false
    }

    pub fn last_read_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            PreferenceState::Read { last_read_at } => Some(last_read_at),
            _ => None,
        }
    }

    pub fn snoozed_until(&self) -> Option<DateTime<Utc>> {
        match self.state {
            PreferenceState::Snoozed { until } => Some(until),
            _ => None,
        }
    }

    pub fn state_name(&self) -> &'static str {
        match self.state {
            PreferenceState::Unread => "unread",
            PreferenceState::Read { .. } => "read",
            PreferenceState::Snoozed { .. } => "snoozed",
        }
    }
}

/// API projection of a preference record.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PreferenceView {
    /// Current state: unread / read / snoozed
    pub state: String,
    /// When the user last marked the alert read (read state only)
    pub last_read_at: Option<DateTime<Utc>>,
    /// When the snooze lifts (snoozed state only)
    pub snoozed_until: Option<DateTime<Utc>>,
}

impl From<&UserAlertPreference> for PreferenceView {
    fn from(pref: &UserAlertPreference) -> Self {
        Self {
            state: pref.state_name().to_string(),
            last_read_at: pref.last_read_at(),
            snoozed_until: pref.snoozed_until(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn starts_unread_with_no_timestamps() {
        let pref = UserAlertPreference::new("u1", "a1");
        assert_eq!(pref.state, PreferenceState::Unread);
        assert!(pref.last_read_at().is_none());
        assert!(pref.snoozed_until().is_none());
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut pref = UserAlertPreference::new("u1", "a1");
        pref.mark_read(t0());
        assert_eq!(pref.last_read_at(), Some(t0()));

        // Second call must not move the read timestamp
        pref.mark_read(t0() + Duration::hours(1));
        assert_eq!(pref.last_read_at(), Some(t0()));
    }

    #[test]
    fn mark_read_clears_snooze_deadline() {
        let mut pref = UserAlertPreference::new("u1", "a1");
        pref.snooze(t0() + Duration::hours(2));
        pref.mark_read(t0());
        assert_eq!(pref.state_name(), "read");
        assert!(pref.snoozed_until().is_none());
    }

    #[test]
    fn mark_unread_clears_read_timestamp() {
        let mut pref = UserAlertPreference::new("u1", "a1");
        pref.mark_read(t0());
        pref.mark_unread();
        assert_eq!(pref.state, PreferenceState::Unread);
        assert!(pref.last_read_at().is_none());
    }

    #[test]
    fn resnooze_updates_deadline() {
        let mut pref = UserAlertPreference::new("u1", "a1");
        pref.snooze(t0() + Duration::hours(1));
        pref.snooze(t0() + Duration::hours(3));
        assert_eq!(pref.snoozed_until(), Some(t0() + Duration::hours(3)));
    }

    #[test]
    fn snooze_for_today_targets_next_utc_midnight() {
        let mut pref = UserAlertPreference::new("u1", "a1");
        pref.snooze_for_today(t0());
        assert_eq!(
            pref.snoozed_until(),
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn snooze_expiry_is_lazy_and_idempotent() {
        let mut pref = UserAlertPreference::new("u1", "a1");
        pref.snooze(t0() + Duration::minutes(30));

        assert!(pref.is_snoozed(t0()));
        assert!(!pref.ensure_snooze_expired(t0()));

        // Deadline passed: effective state is not snoozed even before
        // the transition runs
        let later = t0() + Duration::minutes(30);
        assert!(!pref.is_snoozed(later));
        assert!(pref.ensure_snooze_expired(later));
        assert_eq!(pref.state, PreferenceState::Unread);

        assert!(!pref.ensure_snooze_expired(later));
    }

    #[test]
    fn timestamps_exist_only_in_their_state() {
        let mut pref = UserAlertPreference::new("u1", "a1");

        pref.mark_read(t0());
        assert!(pref.last_read_at().is_some());
        assert!(pref.snoozed_until().is_none());

        pref.snooze(t0() + Duration::hours(1));
        assert!(pref.last_read_at().is_none());
        assert!(pref.snoozed_until().is_some());

        pref.mark_unread();
        assert!(pref.last_read_at().is_none());
        assert!(pref.snoozed_until().is_none());
    }
}
