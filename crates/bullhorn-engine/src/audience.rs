use bullhorn_common::types::{Alert, User, Visibility};
use bullhorn_store::{Directory, MemStore};
use std::sync::Arc;

/// Resolves which users an alert targets, from the alert's visibility
/// settings and the current directory contents.
///
/// Resolution is computed fresh on every call rather than cached at
/// creation time, so users added to a targeted team start receiving
/// the alert without any re-registration step.
#[derive(Clone)]
pub struct AudienceResolver {
    directory: Arc<dyn Directory>,
    store: Arc<MemStore>,
}

impl AudienceResolver {
    pub fn new(directory: Arc<dyn Directory>, store: Arc<MemStore>) -> Self {
        Self { directory, store }
    }

    /// All users the alert currently targets.
    ///
    /// Team and user visibility with an absent or empty id list
    /// resolve to nobody. User ids that are not in the directory are
    /// dropped silently.
    pub fn resolve(&self, alert: &Alert) -> Vec<User> {
        match alert.visibility {
            Visibility::Organization => self.directory.list_users(),
            Visibility::Team => {
                let ids = match &alert.visibility_ids {
                    Some(ids) if !ids.is_empty() => ids,
                    _ => return Vec::new(),
                };
                self.directory
                    .list_users()
                    .into_iter()
                    .filter(|u| u.team_id.as_deref().is_some_and(|t| ids.iter().any(|i| i == t)))
                    .collect()
            }
            Visibility::User => {
                let ids = match &alert.visibility_ids {
                    Some(ids) if !ids.is_empty() => ids,
                    _ => return Vec::new(),
                };
                ids.iter()
                    .filter_map(|id| self.directory.get_user(id))
                    .collect()
            }
        }
    }

    /// Whether `user` is in the alert's current audience.
    pub fn includes(&self, alert: &Alert, user: &User) -> bool {
        match alert.visibility {
            Visibility::Organization => true,
            Visibility::Team => match (&alert.visibility_ids, &user.team_id) {
                (Some(ids), Some(team)) => ids.iter().any(|i| i == team),
                _ => false,
            },
            Visibility::User => alert
                .visibility_ids
                .as_ref()
                .is_some_and(|ids| ids.iter().any(|i| i == &user.id)),
        }
    }

    /// Ensure every targeted user has a preference record for the
    /// alert. Existing records keep their state; only missing pairs
    /// get a fresh unread record. Called on alert creation and
    /// whenever an update changes the audience.
    pub fn register_audience(&self, alert: &Alert) -> usize {
        let users = self.resolve(alert);
        for user in &users {
            self.store.ensure_preference(&user.id, &alert.id);
        }
        users.len()
    }
}
