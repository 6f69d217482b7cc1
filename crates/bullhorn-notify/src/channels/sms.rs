use crate::DeliveryChannel;
use anyhow::Result;
use async_trait::async_trait;
use bullhorn_common::types::{Alert, ChannelKind, User};

/// SMS delivery. Like email, the gateway is an external collaborator;
/// only the handoff is in scope here.
#[derive(Debug, Default)]
pub struct SmsChannel;

#[async_trait]
impl DeliveryChannel for SmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    async fn send(&self, alert: &Alert, user: &User) -> Result<()> {
        tracing::info!(
            alert_id = %alert.id,
            user_id = %user.id,
            severity = %alert.severity,
            "handing alert to SMS gateway"
        );
        Ok(())
    }
}
