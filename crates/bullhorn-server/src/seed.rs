use crate::state::AppState;
use bullhorn_common::types::{
    ChannelKind, CreateAlertRequest, Severity, Team, User, Visibility,
};
use chrono::Duration;

/// Load the demo organization and a few representative alerts.
///
/// Replaces whatever is in the store, so re-seeding always produces
/// the same starting point: two teams, three users, one alert per
/// visibility level.
pub fn seed_demo_data(state: &AppState) {
    state.store.clear();

    state.store.insert_team(Team {
        id: "team-engineering".to_string(),
        name: "Engineering".to_string(),
    });
    state.store.insert_team(Team {
        id: "team-marketing".to_string(),
        name: "Marketing".to_string(),
    });

    state.store.insert_user(User {
        id: "user-alice".to_string(),
        name: "Alice".to_string(),
        team_id: Some("team-engineering".to_string()),
    });
    state.store.insert_user(User {
        id: "user-bob".to_string(),
        name: "Bob".to_string(),
        team_id: Some("team-marketing".to_string()),
    });
    state.store.insert_user(User {
        id: "user-carol".to_string(),
        name: "Carol".to_string(),
        team_id: Some("team-engineering".to_string()),
    });

    let now = state.clock.now();

    state.catalog.create(CreateAlertRequest {
        title: "Scheduled maintenance tonight".to_string(),
        message: "All services will be briefly unavailable at 02:00 UTC.".to_string(),
        severity: Severity::Warning,
        channel: ChannelKind::InApp,
        visibility: Visibility::Organization,
        visibility_ids: None,
        start_time: None,
        expiry_time: Some(now + Duration::days(1)),
        reminder_enabled: true,
        reminder_frequency_minutes: 120,
    });

    state.catalog.create(CreateAlertRequest {
        title: "Deploy freeze for release week".to_string(),
        message: "Hold non-critical deploys until Friday.".to_string(),
        severity: Severity::Info,
        channel: ChannelKind::InApp,
        visibility: Visibility::Team,
        visibility_ids: Some(vec!["team-engineering".to_string()]),
        start_time: None,
        expiry_time: None,
        reminder_enabled: true,
        reminder_frequency_minutes: 120,
    });

    state.catalog.create(CreateAlertRequest {
        title: "Your access key expires soon".to_string(),
        message: "Rotate your key before the end of the week.".to_string(),
        severity: Severity::Critical,
        channel: ChannelKind::InApp,
        visibility: Visibility::User,
        visibility_ids: Some(vec!["user-alice".to_string()]),
        start_time: None,
        expiry_time: None,
        reminder_enabled: true,
        reminder_frequency_minutes: 60,
    });

    tracing::info!(
        teams = 2,
        users = 3,
        alerts = state.store.alert_count(),
        "demo data seeded"
    );
}
