pub mod settings;
pub mod subscriptions;
