use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::onlineping::replies::{guild_only_message, missing_permission_message, say_quietly};
use onlineping_core::{Context, Error};
use onlineping_database::impls::subscriptions::{TrackOutcome, track as track_target};
use onlineping_utils::formatting::{channel_mention, user_mention};
use onlineping_utils::permissions::can_manage_guild;

pub const META: CommandMeta = CommandMeta {
    name: "op track",
    desc: "Get pinged when a member's status changes.",
    category: "onlineping",
    usage: "!op track <member> [#channel]",
};

/// Track MEMBER; ping you on status changes. Optionally set CHANNEL.
#[poise::command(prefix_command, slash_command, category = "Onlineping")]
pub async fn track(
    ctx: Context<'_>,
    #[description = "Member to watch"] member: serenity::Member,
    #[description = "Channel for notifications (defaults to this one)"] channel: Option<
        serenity::GuildChannel,
    >,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !can_manage_guild(ctx.http(), guild_id, ctx.author().id).await? {
        ctx.say(missing_permission_message()).await?;
        return Ok(());
    }

    let channel_id = match &channel {
        Some(channel) if channel.guild_id != guild_id => {
            ctx.say("That channel is not in this server.").await?;
            return Ok(());
        }
        Some(channel) => channel.id,
        None => ctx.channel_id(),
    };

    let target_id = member.user.id.get();
    let outcome = track_target(
        &ctx.data().db,
        guild_id.get(),
        target_id,
        ctx.author().id.get(),
        channel_id.get(),
    )
    .await?;

    let reply = match outcome {
        TrackOutcome::Subscribed => format!(
            "Tracking {}. Pings in {}.",
            user_mention(target_id),
            channel_mention(channel_id.get())
        ),
        TrackOutcome::AlreadySubscribed => format!(
            "You were already tracking {}. Pings now go to {}.",
            user_mention(target_id),
            channel_mention(channel_id.get())
        ),
    };
    say_quietly(ctx, reply).await
}
