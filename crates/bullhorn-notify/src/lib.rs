//! Delivery channel framework with pluggable transport support.
//!
//! An alert is dispatched to a [`DeliveryChannel`] selected by the
//! alert's configured channel kind, falling back to in-app when no
//! transport is registered for that kind. In-app is the only fully
//! in-process channel; email and SMS hand the alert off to external
//! gateways through the same interface.

pub mod channels;
pub mod registry;


use anyhow::Result;
use async_trait::async_trait;
use bullhorn_common::types::{Alert, ChannelKind, User};

/// A transport that carries one alert to one user.
///
/// Implementations only move bytes; recording the delivery and
/// updating the recipient's preference state is the dispatcher's
/// job, so a failed send never leaves a delivery record behind.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// The channel kind this transport serves.
    fn kind(&self) -> ChannelKind;

    /// Carries the alert to the user.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying transport rejects the
    /// send; the caller must not record a delivery in that case.
    async fn send(&self, alert: &Alert, user: &User) -> Result<()>;
}
