use bullhorn_common::clock::Clock;
use bullhorn_common::types::{DeliveredVsRead, MetricsSnapshot, Severity};
use bullhorn_store::MemStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Computes analytics on demand from store state. Nothing is cached;
/// every snapshot reflects the store at the instant of the call.
#[derive(Clone)]
pub struct MetricsAggregator {
    store: Arc<MemStore>,
    clock: Arc<dyn Clock>,
}

impl MetricsAggregator {
    pub fn new(store: Arc<MemStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let now = self.clock.now();
        let alerts = self.store.list_alerts();

        let read = self
            .store
            .list_preferences()
            .iter()
            .filter(|p| p.last_read_at().is_some())
            .count() as u64;

        // Every alert appears in the map, zero when nobody is snoozed.
        let mut snoozed_counts_per_alert: HashMap<String, u64> =
            alerts.iter().map(|a| (a.id.clone(), 0)).collect();
        for pref in self.store.list_preferences() {
            if pref.is_snoozed(now) {
                *snoozed_counts_per_alert
                    .entry(pref.alert_id.clone())
                    .or_insert(0) += 1;
            }
        }

        // Every severity appears in the breakdown even when no alert
        // carries it.
        let mut severity_breakdown: HashMap<String, u64> = HashMap::new();
        for severity in [Severity::Info, Severity::Warning, Severity::Critical] {
            severity_breakdown.insert(severity.to_string(), 0);
        }
        for alert in &alerts {
            *severity_breakdown
                .entry(alert.severity.to_string())
                .or_insert(0) += 1;
        }

        MetricsSnapshot {
            total_alerts: alerts.len() as u64,
            delivered_vs_read: DeliveredVsRead {
                delivered: self.store.delivery_count(),
                read,
            },
            snoozed_counts_per_alert,
            severity_breakdown,
        }
    }
}
