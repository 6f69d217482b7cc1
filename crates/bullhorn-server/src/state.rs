use crate::config::ServerConfig;
use bullhorn_common::clock::Clock;
use bullhorn_engine::{
    AlertCatalog, AudienceResolver, DeliveryDispatcher, MetricsAggregator, PreferenceService,
    ReminderScheduler,
};
use bullhorn_notify::registry::ChannelRegistry;
use bullhorn_store::{Directory, MemStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared handler state: one store, one engine service set, one clock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemStore>,
    pub directory: Arc<dyn Directory>,
    pub catalog: AlertCatalog,
    pub preferences: PreferenceService,
    pub scheduler: ReminderScheduler,
    pub metrics: MetricsAggregator,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<ServerConfig>,
    pub start_time: DateTime<Utc>,
}

/// Wire the engine services around a fresh store.
pub fn build_state(config: ServerConfig, clock: Arc<dyn Clock>) -> AppState {
    let store = Arc::new(MemStore::new());
    let directory: Arc<dyn Directory> = store.clone();

    let audience = AudienceResolver::new(directory.clone(), store.clone());
    let registry = Arc::new(ChannelRegistry::default());
    let dispatcher = DeliveryDispatcher::new(store.clone(), registry, clock.clone());
    let catalog = AlertCatalog::new(store.clone(), audience.clone(), clock.clone());
    let preferences = PreferenceService::new(
        store.clone(),
        directory.clone(),
        audience.clone(),
        clock.clone(),
    );
    let scheduler = ReminderScheduler::new(store.clone(), audience, dispatcher, clock.clone());
    let metrics = MetricsAggregator::new(store.clone(), clock.clone());

    AppState {
        store,
        directory,
        catalog,
        preferences,
        scheduler,
        metrics,
        clock: clock.clone(),
        config: Arc::new(config),
        start_time: clock.now(),
    }
}
