use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::preference::PreferenceView;

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use bullhorn_common::types::Severity;
///
/// let sev: Severity = "warning".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Critical > Severity::Info);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Delivery channel an alert is configured to use.
///
/// Only the in-app channel is fully in-process; email and SMS hand
/// off to external gateways through the same dispatch interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    InApp,
    Email,
    Sms,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::InApp => write!(f, "in_app"),
            ChannelKind::Email => write!(f, "email"),
            ChannelKind::Sms => write!(f, "sms"),
        }
    }
}

impl std::str::FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_app" => Ok(ChannelKind::InApp),
            "email" => Ok(ChannelKind::Email),
            "sms" => Ok(ChannelKind::Sms),
            _ => Err(format!("unknown channel kind: {s}")),
        }
    }
}

/// Who an alert targets: everyone, a set of teams, or explicit users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Organization,
    Team,
    User,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Organization => write!(f, "organization"),
            Visibility::Team => write!(f, "team"),
            Visibility::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "organization" => Ok(Visibility::Organization),
            "team" => Ok(Visibility::Team),
            "user" => Ok(Visibility::User),
            _ => Err(format!("unknown visibility: {s}")),
        }
    }
}

/// A team in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Team {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// A user in the directory, optionally belonging to a team.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Team membership (optional)
    pub team_id: Option<String>,
}

/// A broadcast alert with visibility scope, severity, and an optional
/// expiry window.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Alert {
    /// Unique identifier
    pub id: String,
    /// Short headline
    pub title: String,
    /// Full alert body
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Configured delivery channel
    pub channel: ChannelKind,
    /// Audience scope
    pub visibility: Visibility,
    /// Target team IDs (team visibility) or user IDs (user visibility)
    pub visibility_ids: Option<Vec<String>>,
    /// Instant the alert becomes active
    pub start_time: DateTime<Utc>,
    /// Instant the alert expires (optional; never expires when unset)
    pub expiry_time: Option<DateTime<Utc>>,
    /// Whether the reminder scheduler re-delivers this alert
    pub reminder_enabled: bool,
    /// Minimum minutes between re-deliveries to the same user
    pub reminder_frequency_minutes: i64,
    /// Archived alerts are terminal and never active
    pub archived: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Whether the alert is live at `at`: not archived, started, and
    /// not yet expired. Expiry is exclusive: an alert is inactive at
    /// exactly its expiry instant.
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        if self.archived {
            return false;
        }
        if at < self.start_time {
            return false;
        }
        match self.expiry_time {
            Some(expiry) => at < expiry,
            None => true,
        }
    }
}

/// One delivery of an alert to a user. Append-only: the ordered
/// history per (alert, user) pair is the sole source of truth for
/// reminder due-ness.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NotificationDelivery {
    /// Unique identifier
    pub id: String,
    /// Delivered alert
    pub alert_id: String,
    /// Recipient
    pub user_id: String,
    /// Delivery instant
    pub delivered_at: DateTime<Utc>,
    /// Channel the delivery went through
    pub channel: ChannelKind,
}

/// Fields for creating a new alert.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateAlertRequest {
    /// Short headline (required)
    pub title: String,
    /// Full alert body (required)
    pub message: String,
    /// Severity level (default: info)
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Delivery channel (default: in_app)
    #[serde(default = "default_channel")]
    pub channel: ChannelKind,
    /// Audience scope (default: organization)
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,
    /// Target team or user IDs (required for team/user visibility)
    #[serde(default)]
    pub visibility_ids: Option<Vec<String>>,
    /// Activation instant (default: now)
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Expiry instant (optional)
    #[serde(default)]
    pub expiry_time: Option<DateTime<Utc>>,
    /// Whether reminders re-deliver this alert (default: true)
    #[serde(default = "default_reminder_enabled")]
    pub reminder_enabled: bool,
    /// Minutes between re-deliveries (default: 120)
    #[serde(default = "default_reminder_frequency_minutes")]
    pub reminder_frequency_minutes: i64,
}

fn default_severity() -> Severity {
    Severity::Info
}

fn default_channel() -> ChannelKind {
    ChannelKind::InApp
}

fn default_visibility() -> Visibility {
    Visibility::Organization
}

fn default_reminder_enabled() -> bool {
    true
}

fn default_reminder_frequency_minutes() -> i64 {
    120
}

/// Partial update for an existing alert. Every field is optional;
/// absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateAlertRequest {
    /// Short headline (optional)
    pub title: Option<String>,
    /// Full alert body (optional)
    pub message: Option<String>,
    /// Severity level (optional)
    pub severity: Option<Severity>,
    /// Delivery channel (optional)
    pub channel: Option<ChannelKind>,
    /// Audience scope (optional; re-registers the audience)
    pub visibility: Option<Visibility>,
    /// Target team or user IDs (optional; re-registers the audience)
    pub visibility_ids: Option<Vec<String>>,
    /// Activation instant (optional)
    pub start_time: Option<DateTime<Utc>>,
    /// Expiry instant (optional)
    pub expiry_time: Option<DateTime<Utc>>,
    /// Whether reminders re-deliver this alert (optional)
    pub reminder_enabled: Option<bool>,
    /// Minutes between re-deliveries (optional)
    pub reminder_frequency_minutes: Option<i64>,
    /// Archive flag (optional; archiving is terminal)
    pub archived: Option<bool>,
}

impl UpdateAlertRequest {
    /// Whether applying this update changes who the alert targets.
    pub fn changes_audience(&self) -> bool {
        self.visibility.is_some() || self.visibility_ids.is_some()
    }
}

/// Summary of one reminder pass.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReminderRunSummary {
    /// Deliveries dispatched during the pass
    pub deliveries_sent: u64,
    /// (alert, user) pairs skipped because the user is snoozed
    pub skipped_snoozed: u64,
    /// Reminder-enabled alerts skipped because they are not active
    pub skipped_inactive: u64,
    /// Active alerts skipped because they resolve to an empty audience
    pub skipped_no_audience: u64,
    /// Instant the pass started
    pub timestamp: DateTime<Utc>,
}

/// Delivered-vs-read rollup.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeliveredVsRead {
    /// Total delivery records
    pub delivered: u64,
    /// Preference records currently in the read state
    pub read: u64,
}

/// Read-only analytics rollup over alerts, deliveries, and
/// preference records.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsSnapshot {
    /// Total alerts, active or not
    pub total_alerts: u64,
    /// Delivery volume vs. read acknowledgments
    pub delivered_vs_read: DeliveredVsRead,
    /// Per-alert count of currently snoozed preference records; every
    /// alert has an entry, zero when nobody is snoozed
    pub snoozed_counts_per_alert: HashMap<String, u64>,
    /// Alert counts per severity (always contains all three buckets)
    pub severity_breakdown: HashMap<String, u64>,
}

/// One entry in a user's alert feed: the alert plus the user's
/// preference state for it.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserAlertEntry {
    /// The active alert
    pub alert: Alert,
    /// The user's read/snooze state for it
    pub preference: PreferenceView,
}
