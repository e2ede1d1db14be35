use std::future::Future;

/// What the engine needs from the chat platform.
pub trait NotificationGateway: Sync {
    /// A live, postable channel.
    type Channel: Send + Sync;

    /// Look up `channel_id` in the guild's current state. `None` when it was
    /// deleted or is no longer reachable.
    fn resolve_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> impl Future<Output = Option<Self::Channel>> + Send;

    fn send_text(
        &self,
        channel: &Self::Channel,
        content: String,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
