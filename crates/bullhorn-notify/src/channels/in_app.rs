use crate::DeliveryChannel;
use anyhow::Result;
use async_trait::async_trait;
use bullhorn_common::types::{Alert, ChannelKind, User};

/// In-app delivery. Nothing leaves the process: the appended delivery
/// record plus the recipient's unread state *are* the notification,
/// surfaced by the user's alert feed. This channel can never fail,
/// which is what makes it a safe fallback for unconfigured kinds.
#[derive(Debug, Default)]
pub struct InAppChannel;

#[async_trait]
impl DeliveryChannel for InAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::InApp
    }

    async fn send(&self, alert: &Alert, user: &User) -> Result<()> {
        tracing::debug!(
            alert_id = %alert.id,
            user_id = %user.id,
            "in-app delivery surfaced to feed"
        );
        Ok(())
    }
}
