use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::onlineping::replies::{guild_only_message, say_quietly};
use onlineping_core::{Context, Error};
use onlineping_database::impls::subscriptions::{UntrackOutcome, untrack as untrack_target};
use onlineping_utils::formatting::user_mention;

pub const META: CommandMeta = CommandMeta {
    name: "op untrack",
    desc: "Stop your pings for a member.",
    category: "onlineping",
    usage: "!op untrack <member>",
};

/// Stop pinging you for MEMBER.
#[poise::command(prefix_command, slash_command, category = "Onlineping")]
pub async fn untrack(
    ctx: Context<'_>,
    #[description = "Member to stop watching"] user: serenity::User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let data = ctx.data();
    let outcome = untrack_target(
        &data.db,
        data.throttle.as_ref(),
        guild_id.get(),
        user.id.get(),
        ctx.author().id.get(),
    )
    .await?;

    let reply = match outcome {
        UntrackOutcome::NotSubscribed => "You weren't being pinged for that member.".to_owned(),
        UntrackOutcome::Unsubscribed { remaining: 0 } => format!(
            "Removed your pings for {}. Nobody is tracking them anymore.",
            user_mention(user.id.get())
        ),
        UntrackOutcome::Unsubscribed { .. } => {
            format!("Removed your pings for {}.", user_mention(user.id.get()))
        }
    };
    say_quietly(ctx, reply).await
}
