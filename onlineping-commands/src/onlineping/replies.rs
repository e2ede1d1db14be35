use poise::serenity_prelude as serenity;

use onlineping_core::{Context, Error};
use onlineping_database::ValidationError;

pub fn guild_only_message() -> &'static str {
    "This command can only be used in a server."
}

pub fn missing_permission_message() -> &'static str {
    "You need the **Manage Server** permission to do that."
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{}`", usage)
}

pub fn overview_message() -> String {
    [
        "**Onlineping**: get pinged when members change status.",
        "`!op track <member> [#channel]` watch a member (Manage Server)",
        "`!op untrack <member>` stop your pings for a member",
        "`!op list` show what is tracked here",
        "`!op mode <online_only|all>` which transitions notify (Manage Server)",
        "`!op cooldown [duration]` view or set the per-member cooldown",
        "`!op pingme <on|off>` choose whether notifications mention you",
    ]
    .join("\n")
}

/// The user-facing reason when `err` is a validation rejection.
pub fn validation_message(err: &Error) -> Option<String> {
    err.downcast_ref::<ValidationError>().map(ToString::to_string)
}

/// Reply without pinging anyone named in `content`.
pub async fn say_quietly(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;
    Ok(())
}
