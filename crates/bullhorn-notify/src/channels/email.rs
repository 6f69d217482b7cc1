use crate::DeliveryChannel;
use anyhow::Result;
use async_trait::async_trait;
use bullhorn_common::types::{Alert, ChannelKind, User};

/// Email delivery. The actual SMTP relay lives outside this system;
/// this channel only hands the alert across that boundary and logs
/// the handoff.
#[derive(Debug, Default)]
pub struct EmailChannel;

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, alert: &Alert, user: &User) -> Result<()> {
        tracing::info!(
            alert_id = %alert.id,
            user_id = %user.id,
            severity = %alert.severity,
            title = %alert.title,
            "handing alert to email gateway"
        );
        Ok(())
    }
}
