use crate::audience::AudienceResolver;
use bullhorn_common::clock::{next_utc_midnight, Clock};
use bullhorn_common::preference::{PreferenceView, UserAlertPreference};
use bullhorn_common::types::{User, UserAlertEntry};
use bullhorn_store::error::{Result, StoreError};
use bullhorn_store::{Directory, MemStore};
use std::sync::Arc;

/// End-user operations on per-alert preference state: the personal
/// alert feed, read/unread marks and the snooze-for-today action.
///
/// Snooze expiry is lazy. Any read path that touches a preference
/// first collapses an elapsed snooze back to unread and persists the
/// change, so callers never observe a stale snoozed state.
#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<MemStore>,
    directory: Arc<dyn Directory>,
    audience: AudienceResolver,
    clock: Arc<dyn Clock>,
}

impl PreferenceService {
    pub fn new(
        store: Arc<MemStore>,
        directory: Arc<dyn Directory>,
        audience: AudienceResolver,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            audience,
            clock,
        }
    }

    fn require_user(&self, user_id: &str) -> Result<User> {
        self.directory
            .get_user(user_id)
            .ok_or_else(|| StoreError::not_found("user", user_id))
    }

    /// The user's current alert feed: every active alert whose
    /// audience includes them, paired with their preference state.
    /// Snoozed entries are filtered out unless `include_snoozed`.
    pub fn user_alerts(&self, user_id: &str, include_snoozed: bool) -> Result<Vec<UserAlertEntry>> {
        let user = self.require_user(user_id)?;
        let now = self.clock.now();

        let mut entries = Vec::new();
        for alert in self.store.list_alerts() {
            if !alert.is_active(now) || !self.audience.includes(&alert, &user) {
                continue;
            }
            let pref = self.effective_preference(&user.id, &alert.id);
            if !include_snoozed && pref.is_snoozed(now) {
                continue;
            }
            entries.push(UserAlertEntry {
                alert,
                preference: PreferenceView::from(&pref),
            });
        }
        entries.sort_by(|a, b| {
            b.alert
                .created_at
                .cmp(&a.alert.created_at)
                .then(a.alert.id.cmp(&b.alert.id))
        });
        Ok(entries)
    }

    /// All of the user's preference records, snooze expiry applied.
    pub fn user_preferences(&self, user_id: &str) -> Result<Vec<UserAlertPreference>> {
        self.require_user(user_id)?;
        let prefs = self
            .store
            .list_preferences()
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| self.effective_preference(&p.user_id, &p.alert_id))
            .collect();
        Ok(prefs)
    }

    /// Snooze the alert for the user until the next UTC midnight.
    /// Creates the preference record if the pair has none yet.
    pub async fn snooze_for_today(&self, user_id: &str, alert_id: &str) -> Result<UserAlertPreference> {
        self.require_user(user_id)?;
        if self.store.get_alert(alert_id).is_none() {
            return Err(StoreError::not_found("alert", alert_id));
        }

        let lock = self.store.pair_lock(user_id, alert_id);
        let _guard = lock.lock().await;

        let now = self.clock.now();
        let mut pref = self.store.ensure_preference(user_id, alert_id);
        pref.snooze(next_utc_midnight(now));
        self.store.put_preference(pref.clone());
        tracing::debug!(user_id, alert_id, until = %next_utc_midnight(now), "alert snoozed");
        Ok(pref)
    }

    /// Mark an existing preference read. An elapsed snooze collapses
    /// first; an active one is overridden by the explicit read.
    pub async fn mark_read(&self, user_id: &str, alert_id: &str) -> Result<UserAlertPreference> {
        self.mutate_existing(user_id, alert_id, |pref, now| pref.mark_read(now))
            .await
    }

    /// Mark an existing preference unread, clearing any snooze.
    pub async fn mark_unread(&self, user_id: &str, alert_id: &str) -> Result<UserAlertPreference> {
        self.mutate_existing(user_id, alert_id, |pref, _now| pref.mark_unread())
            .await
    }

    async fn mutate_existing(
        &self,
        user_id: &str,
        alert_id: &str,
        f: impl FnOnce(&mut UserAlertPreference, chrono::DateTime<chrono::Utc>),
    ) -> Result<UserAlertPreference> {
        self.require_user(user_id)?;

        let lock = self.store.pair_lock(user_id, alert_id);
        let _guard = lock.lock().await;

        let mut pref = self
            .store
            .get_preference(user_id, alert_id)
            .ok_or_else(|| StoreError::not_found("preference", alert_id))?;
        let now = self.clock.now();
        pref.ensure_snooze_expired(now);
        f(&mut pref, now);
        self.store.put_preference(pref.clone());
        Ok(pref)
    }

    /// Load (or create) the pair's preference with snooze expiry
    /// applied. The collapse runs atomically inside the store, so a
    /// read or snooze committed by a concurrent writer is never
    /// overwritten by the feed path.
    fn effective_preference(&self, user_id: &str, alert_id: &str) -> UserAlertPreference {
        self.store
            .refresh_preference(user_id, alert_id, self.clock.now())
    }
}
