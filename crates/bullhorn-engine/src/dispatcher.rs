use bullhorn_common::clock::Clock;
use bullhorn_common::id;
use bullhorn_common::types::{Alert, ChannelKind, NotificationDelivery, User};
use bullhorn_notify::registry::ChannelRegistry;
use bullhorn_store::MemStore;
use chrono::Duration;
use std::sync::Arc;

/// Result of one deliver-if-due attempt for a (user, alert) pair.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    /// The alert went out and the delivery was recorded.
    Delivered(NotificationDelivery),
    /// The user has an unexpired snooze for this alert; nothing sent.
    Snoozed,
    /// The reminder interval since the last delivery has not elapsed.
    NotDue,
}

/// Sends alerts through the configured channel and records each
/// successful send in the delivery log.
///
/// Concurrency protocol per (user, alert) pair: the snooze check and
/// due-ness decision run under the pair lock, the lock is released
/// for the external channel send, then re-acquired to re-check
/// due-ness before appending the record. A concurrent worker that
/// recorded first wins; at most one record lands per interval. A
/// failed send records nothing.
#[derive(Clone)]
pub struct DeliveryDispatcher {
    store: Arc<MemStore>,
    registry: Arc<ChannelRegistry>,
    clock: Arc<dyn Clock>,
}

impl DeliveryDispatcher {
    pub fn new(store: Arc<MemStore>, registry: Arc<ChannelRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            registry,
            clock,
        }
    }

    /// Deliver the alert to the user if the reminder interval has
    /// elapsed and the user is not snoozed.
    pub async fn deliver_if_due(&self, alert: &Alert, user: &User) -> anyhow::Result<DeliveryOutcome> {
        let lock = self.store.pair_lock(&user.id, &alert.id);
        let guard = lock.lock().await;

        let now = self.clock.now();
        let pref = self.store.refresh_preference(&user.id, &alert.id, now);
        if pref.is_snoozed(now) {
            return Ok(DeliveryOutcome::Snoozed);
        }
        if !self.is_due(alert, user, now) {
            return Ok(DeliveryOutcome::NotDue);
        }
        drop(guard);

        let channel = self.registry.select(alert.channel);
        channel.send(alert, user).await?;

        // Another worker may have recorded a delivery while we were
        // sending; only the first record per interval lands.
        let _guard = lock.lock().await;
        let now = self.clock.now();
        if !self.is_due(alert, user, now) {
            return Ok(DeliveryOutcome::NotDue);
        }
        Ok(DeliveryOutcome::Delivered(
            self.record(alert, user, channel.kind(), now),
        ))
    }

    /// Deliver unconditionally, bypassing the due-ness check. Snoozed
    /// recipients still get the delivery recorded; their visible state
    /// is left untouched until the snooze lapses.
    pub async fn deliver(&self, alert: &Alert, user: &User) -> anyhow::Result<NotificationDelivery> {
        let lock = self.store.pair_lock(&user.id, &alert.id);

        let channel = self.registry.select(alert.channel);
        channel.send(alert, user).await?;

        let _guard = lock.lock().await;
        let now = self.clock.now();
        Ok(self.record(alert, user, channel.kind(), now))
    }

    /// Due when the pair has no delivery yet, or the full reminder
    /// interval has elapsed since the last one. The boundary instant
    /// itself counts as due.
    fn is_due(&self, alert: &Alert, user: &User, now: chrono::DateTime<chrono::Utc>) -> bool {
        match self.store.last_delivery(&alert.id, &user.id) {
            None => true,
            Some(last) => {
                now - last.delivered_at >= Duration::minutes(alert.reminder_frequency_minutes)
            }
        }
    }

    /// Append the delivery record and surface the alert as unread,
    /// unless the user already read it or is snoozed. Callers hold
    /// the pair lock.
    fn record(
        &self,
        alert: &Alert,
        user: &User,
        kind: ChannelKind,
        now: chrono::DateTime<chrono::Utc>,
    ) -> NotificationDelivery {
        let delivery = NotificationDelivery {
            id: id::next_id(),
            alert_id: alert.id.clone(),
            user_id: user.id.clone(),
            delivered_at: now,
            channel: kind,
        };
        self.store.append_delivery(delivery.clone());

        let mut pref = self.store.ensure_preference(&user.id, &alert.id);
        pref.ensure_snooze_expired(now);
        if !pref.is_snoozed(now) && pref.last_read_at().is_none() {
            pref.mark_unread();
        }
        self.store.put_preference(pref);

        tracing::debug!(
            alert_id = %alert.id,
            user_id = %user.id,
            channel = %kind,
            "delivery recorded"
        );
        delivery
    }
}
