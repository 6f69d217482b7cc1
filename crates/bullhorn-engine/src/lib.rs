//! Core alert engine: catalog management, audience resolution, the
//! per-user read/snooze state, reminder scheduling and analytics.
//!
//! The engine is transport-agnostic. HTTP handlers and the background
//! reminder loop both drive it through the same service structs, each
//! of which borrows the shared [`bullhorn_store::MemStore`] behind an
//! `Arc` and reads time through a [`bullhorn_common::clock::Clock`] so
//! reminder cadence is testable without sleeping.

pub mod audience;
pub mod catalog;
pub mod dispatcher;
pub mod metrics;
pub mod preferences;
pub mod scheduler;


pub use audience::AudienceResolver;
pub use catalog::{AlertCatalog, AlertFilter};
pub use dispatcher::{DeliveryDispatcher, DeliveryOutcome};
pub use metrics::MetricsAggregator;
pub use preferences::PreferenceService;
pub use scheduler::ReminderScheduler;
