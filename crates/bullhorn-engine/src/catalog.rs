use crate::audience::AudienceResolver;
use bullhorn_common::clock::Clock;
use bullhorn_common::id;
use bullhorn_common::types::{Alert, CreateAlertRequest, Severity, UpdateAlertRequest, Visibility};
use bullhorn_store::error::Result;
use bullhorn_store::MemStore;
use std::sync::Arc;

/// Admin-side filter over the alert list. All fields combine with AND;
/// `active` selects by liveness at the time of the call, so
/// `Some(false)` returns archived, expired and not-yet-started alerts.
#[derive(Debug, Default, Clone)]
pub struct AlertFilter {
    pub severity: Option<Severity>,
    pub active: Option<bool>,
    pub visibility: Option<Visibility>,
}

/// Alert lifecycle: create, update, list. Creation and audience
/// changes register preference records for every targeted user so the
/// per-user state exists before the first reminder fires.
#[derive(Clone)]
pub struct AlertCatalog {
    store: Arc<MemStore>,
    audience: AudienceResolver,
    clock: Arc<dyn Clock>,
}

impl AlertCatalog {
    pub fn new(store: Arc<MemStore>, audience: AudienceResolver, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            audience,
            clock,
        }
    }

    pub fn create(&self, req: CreateAlertRequest) -> Alert {
        let now = self.clock.now();
        let alert = Alert {
            id: id::next_id(),
            title: req.title,
            message: req.message,
            severity: req.severity,
            channel: req.channel,
            visibility: req.visibility,
            visibility_ids: req.visibility_ids,
            start_time: req.start_time.unwrap_or(now),
            expiry_time: req.expiry_time,
            reminder_enabled: req.reminder_enabled,
            reminder_frequency_minutes: req.reminder_frequency_minutes,
            archived: false,
            created_at: now,
        };
        self.store.insert_alert(alert.clone());
        let registered = self.audience.register_audience(&alert);
        tracing::info!(
            alert_id = %alert.id,
            severity = %alert.severity,
            audience = registered,
            "alert created"
        );
        alert
    }

    /// Apply the non-`None` fields of `req` to an existing alert.
    /// Changing visibility or the target id list re-registers the
    /// audience; users dropped from it keep their existing records.
    pub fn update(&self, alert_id: &str, req: UpdateAlertRequest) -> Result<Alert> {
        let re_register = req.changes_audience();
        let alert = self.store.update_alert(alert_id, |alert| {
            if let Some(title) = req.title {
                alert.title = title;
            }
            if let Some(message) = req.message {
                alert.message = message;
            }
            if let Some(severity) = req.severity {
                alert.severity = severity;
            }
            if let Some(channel) = req.channel {
                alert.channel = channel;
            }
            if let Some(visibility) = req.visibility {
                alert.visibility = visibility;
            }
            if let Some(ids) = req.visibility_ids {
                alert.visibility_ids = Some(ids);
            }
            if let Some(start) = req.start_time {
                alert.start_time = start;
            }
            if let Some(expiry) = req.expiry_time {
                alert.expiry_time = Some(expiry);
            }
            if let Some(enabled) = req.reminder_enabled {
                alert.reminder_enabled = enabled;
            }
            if let Some(freq) = req.reminder_frequency_minutes {
                alert.reminder_frequency_minutes = freq;
            }
            if let Some(archived) = req.archived {
                alert.archived = archived;
            }
        })?;
        if re_register {
            let registered = self.audience.register_audience(&alert);
            tracing::info!(
                alert_id = %alert.id,
                audience = registered,
                "alert audience re-registered"
            );
        }
        Ok(alert)
    }

    pub fn get(&self, alert_id: &str) -> Result<Alert> {
        self.store
            .get_alert(alert_id)
            .ok_or_else(|| bullhorn_store::error::StoreError::not_found("alert", alert_id))
    }

    pub fn list(&self, filter: &AlertFilter) -> Vec<Alert> {
        let now = self.clock.now();
        let mut alerts: Vec<Alert> = self
            .store
            .list_alerts()
            .into_iter()
            .filter(|a| filter.severity.is_none_or(|s| a.severity == s))
            .filter(|a| filter.active.is_none_or(|want| a.is_active(now) == want))
            .filter(|a| filter.visibility.is_none_or(|v| a.visibility == v))
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        alerts
    }

    /// Alerts currently live, newest first. The public read surface.
    pub fn list_active(&self) -> Vec<Alert> {
        self.list(&AlertFilter {
            active: Some(true),
            ..AlertFilter::default()
        })
    }
}
