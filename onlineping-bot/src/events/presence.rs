use std::time::Instant;

use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use onlineping_core::Data;
use onlineping_notify::{NotificationGateway, NotifyOutcome, PresenceChange, PresenceStatus};

/// Serenity-backed gateway for the notification engine.
pub struct SerenityGateway<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenityGateway<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }
}

impl NotificationGateway for SerenityGateway<'_> {
    type Channel = serenity::ChannelId;

    async fn resolve_channel(&self, guild_id: u64, channel_id: u64) -> Option<serenity::ChannelId> {
        let guild_id = serenity::GuildId::new(guild_id);
        let channel_id = serenity::ChannelId::new(channel_id);

        let cached = self.ctx.cache.guild(guild_id).map(|guild| {
            guild.channels.contains_key(&channel_id)
                || guild.threads.iter().any(|thread| thread.id == channel_id)
        });
        if let Some(found) = cached {
            return found.then_some(channel_id);
        }

        match channel_id.to_channel(self.ctx).await {
            Ok(serenity::Channel::Guild(channel)) if channel.guild_id == guild_id => {
                Some(channel_id)
            }
            Ok(_) => None,
            Err(err) => {
                debug!(?err, channel_id = channel_id.get(), "channel lookup failed");
                None
            }
        }
    }

    async fn send_text(&self, channel: &serenity::ChannelId, content: String) -> anyhow::Result<()> {
        let message = serenity::CreateMessage::new()
            .content(content)
            .allowed_mentions(serenity::CreateAllowedMentions::new().all_users(true));

        channel.send_message(&self.ctx.http, message).await?;
        Ok(())
    }
}

/// Remember every member's status from a guild snapshot so the first update
/// after connecting has a correct "before".
pub fn handle_guild_create_presences(data: &Data, guild: &serenity::Guild) {
    for (user_id, presence) in &guild.presences {
        data.presences
            .seed(guild.id.get(), user_id.get(), presence.status.into());
    }
    debug!(
        guild_id = guild.id.get(),
        seeded = guild.presences.len(),
        "presence ledger seeded"
    );
}

pub fn handle_guild_delete_presences(data: &Data, guild_id: serenity::GuildId) {
    data.presences.forget_guild(guild_id.get());
}

pub fn handle_member_remove_presence(data: &Data, guild_id: serenity::GuildId, user: &serenity::User) {
    data.presences.forget_member(guild_id.get(), user.id.get());
}

/// Feed one presence update through the notification engine. Failures are
/// logged and dropped.
pub async fn handle_presence_update(
    ctx: &serenity::Context,
    data: &Data,
    presence: &serenity::Presence,
) {
    let Some(guild_id) = presence.guild_id else {
        return;
    };

    let member_id = presence.user.id.get();
    let after = PresenceStatus::from(presence.status);
    let before = data.presences.record(guild_id.get(), member_id, after);

    let change = PresenceChange {
        guild_id: guild_id.get(),
        member_id,
        before,
        after,
        at: Instant::now(),
    };

    let gateway = SerenityGateway::new(ctx);
    match data.notifier.handle(&gateway, change).await {
        Ok(NotifyOutcome::Sent { channel_id }) => {
            debug!(guild_id = guild_id.get(), member_id, channel_id, %before, %after, "presence notification delivered");
        }
        Ok(outcome) => {
            debug!(guild_id = guild_id.get(), member_id, ?outcome, "presence change handled");
        }
        Err(source) => {
            error!(?source, guild_id = guild_id.get(), member_id, "failed to evaluate presence change");
        }
    }
}
