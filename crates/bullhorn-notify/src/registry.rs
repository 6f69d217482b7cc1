use crate::channels::InAppChannel;
use crate::DeliveryChannel;
use bullhorn_common::types::ChannelKind;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of [`DeliveryChannel`]s keyed by channel kind.
///
/// Selection falls back to a dedicated in-app channel whenever the
/// requested kind has no registered transport. The fallback is held
/// separately from the map, so registration order can never shadow
/// it and selection can never fail.
///
/// # Examples
///
/// ```
/// use bullhorn_notify::registry::ChannelRegistry;
/// use bullhorn_common::types::ChannelKind;
///
/// let registry = ChannelRegistry::default();
/// assert!(registry.has_channel(ChannelKind::InApp));
/// assert!(registry.has_channel(ChannelKind::Email));
/// assert_eq!(registry.select(ChannelKind::Sms).kind(), ChannelKind::Sms);
/// ```
pub struct ChannelRegistry {
    channels: HashMap<ChannelKind, Arc<dyn DeliveryChannel>>,
    fallback: Arc<dyn DeliveryChannel>,
}

impl ChannelRegistry {
    /// An empty registry. Selection still works: everything falls
    /// back to in-app.
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            fallback: Arc::new(InAppChannel),
        }
    }

    pub fn register(&mut self, channel: Arc<dyn DeliveryChannel>) {
        self.channels.insert(channel.kind(), channel);
    }

    /// The transport for `kind`, or the in-app fallback when none is
    /// registered.
    pub fn select(&self, kind: ChannelKind) -> Arc<dyn DeliveryChannel> {
        self.channels
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn has_channel(&self, kind: ChannelKind) -> bool {
        self.channels.contains_key(&kind)
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::channels::InAppChannel));
        registry.register(Arc::new(crate::channels::EmailChannel));
        registry.register(Arc::new(crate::channels::SmsChannel));
        registry
    }
}
