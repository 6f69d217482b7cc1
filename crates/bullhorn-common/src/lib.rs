//! Shared domain model for the bullhorn alerting platform.
//!
//! Defines the alert/user/team/delivery types exchanged between the
//! store, the notification engine, and the HTTP layer, plus the
//! [`clock::Clock`] abstraction that keeps reminder scheduling
//! deterministic under test.

pub mod clock;
pub mod id;
pub mod preference;
pub mod types;
