//! In-memory store for alerts, directory records, preference state,
//! and the append-only delivery log.
//!
//! The engine owns exactly one [`MemStore`]; it is shared behind an
//! `Arc` between the HTTP handlers and the reminder loop. Readers
//! (metrics, audience resolution) take snapshot clones under a read
//! lock, so they never observe a torn record. Mutation of a single
//! (user, alert) preference together with the deliver-or-not decision
//! is serialized through [`MemStore::pair_lock`].

pub mod error;

#[cfg(test)]
mod tests;

use bullhorn_common::preference::UserAlertPreference;
use bullhorn_common::types::{Alert, NotificationDelivery, Team, User};
use chrono::{DateTime, Utc};
use error::{Result, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Read-only lookup of users and teams. Owned by an external
/// collaborator in larger deployments; [`MemStore`] implements it
/// directly for the single-process case.
pub trait Directory: Send + Sync {
    fn list_users(&self) -> Vec<User>;
    fn get_user(&self, id: &str) -> Option<User>;
    fn list_teams(&self) -> Vec<Team>;
}

/// Composite preference key: (user_id, alert_id).
type PrefKey = (String, String);

/// Process-wide state behind explicit locks.
#[derive(Default)]
pub struct MemStore {
    alerts: RwLock<HashMap<String, Alert>>,
    users: RwLock<HashMap<String, User>>,
    teams: RwLock<HashMap<String, Team>>,
    preferences: RwLock<HashMap<PrefKey, UserAlertPreference>>,
    deliveries: RwLock<Vec<NotificationDelivery>>,
    // Per-(user, alert) serialization points for deliver decisions and
    // preference mutation. tokio mutexes so external channel sends can
    // happen between acquisitions without blocking a worker thread.
    pair_locks: Mutex<HashMap<PrefKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Alerts ----

    pub fn insert_alert(&self, alert: Alert) {
        let mut alerts = self.alerts.write().unwrap_or_else(|p| p.into_inner());
        alerts.insert(alert.id.clone(), alert);
    }

    pub fn get_alert(&self, id: &str) -> Option<Alert> {
        let alerts = self.alerts.read().unwrap_or_else(|p| p.into_inner());
        alerts.get(id).cloned()
    }

    /// Apply `f` to the alert with `id` under the write lock, so
    /// concurrent readers see either the old or the new record, never
    /// a half-applied update.
    pub fn update_alert(&self, id: &str, f: impl FnOnce(&mut Alert)) -> Result<Alert> {
        let mut alerts = self.alerts.write().unwrap_or_else(|p| p.into_inner());
        let alert = alerts
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("alert", id))?;
        f(alert);
        Ok(alert.clone())
    }

    pub fn list_alerts(&self) -> Vec<Alert> {
        let alerts = self.alerts.read().unwrap_or_else(|p| p.into_inner());
        alerts.values().cloned().collect()
    }

    pub fn alert_count(&self) -> u64 {
        let alerts = self.alerts.read().unwrap_or_else(|p| p.into_inner());
        alerts.len() as u64
    }

    // ---- Directory records (seed-side writes) ----

    pub fn insert_user(&self, user: User) {
        let mut users = self.users.write().unwrap_or_else(|p| p.into_inner());
        users.insert(user.id.clone(), user);
    }

    pub fn insert_team(&self, team: Team) {
        let mut teams = self.teams.write().unwrap_or_else(|p| p.into_inner());
        teams.insert(team.id.clone(), team);
    }

    // ---- Preferences ----

    /// Atomic create-if-absent: returns the existing record untouched,
    /// or a fresh Unread record. Two concurrent first-touches for the
    /// same pair cannot create duplicates because the whole operation
    /// runs under the write lock.
    pub fn ensure_preference(&self, user_id: &str, alert_id: &str) -> UserAlertPreference {
        let mut prefs = self.preferences.write().unwrap_or_else(|p| p.into_inner());
        prefs
            .entry((user_id.to_string(), alert_id.to_string()))
            .or_insert_with(|| UserAlertPreference::new(user_id, alert_id))
            .clone()
    }

    /// Create-if-absent plus lazy snooze expiry in one atomic step.
    /// The whole read-modify-write runs under the preferences write
    /// lock: the collapse decision is made against the stored record,
    /// so it can never overwrite a read or snooze committed by a
    /// concurrent writer between a separate get and put.
    pub fn refresh_preference(
        &self,
        user_id: &str,
        alert_id: &str,
        now: DateTime<Utc>,
    ) -> UserAlertPreference {
        let mut prefs = self.preferences.write().unwrap_or_else(|p| p.into_inner());
        let pref = prefs
            .entry((user_id.to_string(), alert_id.to_string()))
            .or_insert_with(|| UserAlertPreference::new(user_id, alert_id));
        pref.ensure_snooze_expired(now);
        pref.clone()
    }

    pub fn get_preference(&self, user_id: &str, alert_id: &str) -> Option<UserAlertPreference> {
        let prefs = self.preferences.read().unwrap_or_else(|p| p.into_inner());
        prefs
            .get(&(user_id.to_string(), alert_id.to_string()))
            .cloned()
    }

    /// Replace one preference record in a single swap.
    pub fn put_preference(&self, pref: UserAlertPreference) {
        let mut prefs = self.preferences.write().unwrap_or_else(|p| p.into_inner());
        prefs.insert((pref.user_id.clone(), pref.alert_id.clone()), pref);
    }

    pub fn list_preferences(&self) -> Vec<UserAlertPreference> {
        let prefs = self.preferences.read().unwrap_or_else(|p| p.into_inner());
        prefs.values().cloned().collect()
    }

    // ---- Deliveries (append-only) ----

    pub fn append_delivery(&self, delivery: NotificationDelivery) {
        let mut deliveries = self.deliveries.write().unwrap_or_else(|p| p.into_inner());
        deliveries.push(delivery);
    }

    /// Most recent delivery for the pair, ordered by delivery
    /// timestamp; equal timestamps break toward the later append.
    pub fn last_delivery(&self, alert_id: &str, user_id: &str) -> Option<NotificationDelivery> {
        let deliveries = self.deliveries.read().unwrap_or_else(|p| p.into_inner());
        let mut best: Option<&NotificationDelivery> = None;
        for d in deliveries.iter() {
            if d.alert_id != alert_id || d.user_id != user_id {
                continue;
            }
            match best {
                Some(b) if d.delivered_at < b.delivered_at => {}
                _ => best = Some(d),
            }
        }
        best.cloned()
    }

    pub fn list_deliveries(&self) -> Vec<NotificationDelivery> {
        let deliveries = self.deliveries.read().unwrap_or_else(|p| p.into_inner());
        deliveries.clone()
    }

    pub fn delivery_count(&self) -> u64 {
        let deliveries = self.deliveries.read().unwrap_or_else(|p| p.into_inner());
        deliveries.len() as u64
    }

    // ---- Per-pair serialization ----

    /// Lock serializing the deliver-or-not decision and preference
    /// mutation for one (user, alert) pair. Callers must not hold it
    /// across an external channel send; decide under the lock, drop
    /// it, send, then re-acquire to record the outcome.
    pub fn pair_lock(&self, user_id: &str, alert_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.pair_locks.lock().unwrap_or_else(|p| p.into_inner());
        locks
            .entry((user_id.to_string(), alert_id.to_string()))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop all state. Used when re-seeding demo data.
    pub fn clear(&self) {
        self.alerts
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.users
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.teams
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.preferences
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.deliveries
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
        self.pair_locks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

impl Directory for MemStore {
    fn list_users(&self) -> Vec<User> {
        let users = self.users.read().unwrap_or_else(|p| p.into_inner());
        users.values().cloned().collect()
    }

    fn get_user(&self, id: &str) -> Option<User> {
        let users = self.users.read().unwrap_or_else(|p| p.into_inner());
        users.get(id).cloned()
    }

    fn list_teams(&self) -> Vec<Team> {
        let teams = self.teams.read().unwrap_or_else(|p| p.into_inner());
        teams.values().cloned().collect()
    }
}
