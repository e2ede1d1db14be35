//! Presence-change notification engine.
//!
//! [`Notifier::handle`] takes one status transition and decides whether to post
//! a notification, applying the filters in a fixed order: status actually
//! changed, member is tracked, guild mode admits the new status, cooldown has
//! elapsed, channel still exists. Only a successful send advances the cooldown.

pub mod engine;
pub mod gateway;
pub mod ledger;
pub mod message;
pub mod status;

pub use engine::{NotifyOutcome, Notifier, PresenceChange};
pub use gateway::NotificationGateway;
pub use ledger::PresenceLedger;
pub use status::PresenceStatus;
