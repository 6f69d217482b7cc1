use crate::audience::AudienceResolver;
use crate::dispatcher::{DeliveryDispatcher, DeliveryOutcome};
use bullhorn_common::clock::Clock;
use bullhorn_common::types::ReminderRunSummary;
use bullhorn_store::MemStore;
use std::sync::Arc;

/// Walks every reminder-enabled alert and offers it to its audience.
///
/// One `run_once` pass is the unit of work: the background loop calls
/// it on a fixed tick and the manual trigger endpoint calls it on
/// demand. A pass never aborts; a failed send for one recipient is
/// logged and the pass moves on.
#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<MemStore>,
    audience: AudienceResolver,
    dispatcher: DeliveryDispatcher,
    clock: Arc<dyn Clock>,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<MemStore>,
        audience: AudienceResolver,
        dispatcher: DeliveryDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            audience,
            dispatcher,
            clock,
        }
    }

    /// Run a single reminder pass over the whole alert catalog.
    ///
    /// Alerts with reminders disabled are ignored outright and do not
    /// appear in the summary counters. Inactive alerts and alerts that
    /// resolve to an empty audience are counted once per alert;
    /// snoozed recipients are counted per (user, alert) pair.
    pub async fn run_once(&self) -> ReminderRunSummary {
        let started = self.clock.now();
        let mut summary = ReminderRunSummary {
            deliveries_sent: 0,
            skipped_snoozed: 0,
            skipped_inactive: 0,
            skipped_no_audience: 0,
            timestamp: started,
        };

        for alert in self.store.list_alerts() {
            if !alert.reminder_enabled {
                continue;
            }
            if !alert.is_active(started) {
                summary.skipped_inactive += 1;
                continue;
            }
            let audience = self.audience.resolve(&alert);
            if audience.is_empty() {
                summary.skipped_no_audience += 1;
                continue;
            }
            for user in &audience {
                match self.dispatcher.deliver_if_due(&alert, user).await {
                    Ok(DeliveryOutcome::Delivered(_)) => summary.deliveries_sent += 1,
                    Ok(DeliveryOutcome::Snoozed) => summary.skipped_snoozed += 1,
                    Ok(DeliveryOutcome::NotDue) => {}
                    Err(err) => {
                        tracing::warn!(
                            alert_id = %alert.id,
                            user_id = %user.id,
                            error = %err,
                            "delivery failed, continuing pass"
                        );
                    }
                }
            }
        }

        tracing::info!(
            sent = summary.deliveries_sent,
            snoozed = summary.skipped_snoozed,
            inactive = summary.skipped_inactive,
            no_audience = summary.skipped_no_audience,
            "reminder pass complete"
        );
        summary
    }
}
