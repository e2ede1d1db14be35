use crate::CommandMeta;
use crate::onlineping::replies::{
    guild_only_message, missing_permission_message, validation_message,
};
use onlineping_core::{Context, Error};
use onlineping_database::ValidationError;
use onlineping_database::impls::settings::get_cooldown;
use onlineping_database::impls::subscriptions::update_cooldown;
use onlineping_utils::formatting::format_interval;
use onlineping_utils::parse::parse_interval_seconds;
use onlineping_utils::permissions::can_manage_guild;

pub const META: CommandMeta = CommandMeta {
    name: "op cooldown",
    desc: "View or set the minimum time between notifications for one member (0 disables).",
    category: "onlineping",
    usage: "!op cooldown [300|5m|2m30s|0]",
};

/// View or set the per-member notification cooldown.
#[poise::command(prefix_command, slash_command, category = "Onlineping")]
pub async fn cooldown(
    ctx: Context<'_>,
    #[description = "Duration like 300, 5m, or 2m30s; 0 disables"]
    #[rest]
    value: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(raw) = value
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        let current = get_cooldown(&ctx.data().db, guild_id.get()).await?;
        ctx.say(format!("Cooldown is **{}**.", format_interval(current)))
            .await?;
        return Ok(());
    };

    if !can_manage_guild(ctx.http(), guild_id, ctx.author().id).await? {
        ctx.say(missing_permission_message()).await?;
        return Ok(());
    }

    let seconds = match parse_cooldown_input(raw) {
        Ok(seconds) => seconds,
        Err(reason) => {
            ctx.say(reason.to_string()).await?;
            return Ok(());
        }
    };

    match update_cooldown(&ctx.data().db, guild_id.get(), seconds).await {
        Ok(stored) => {
            ctx.say(format!("Cooldown set to **{}**.", format_interval(stored)))
                .await?;
        }
        Err(err) => match validation_message(&err) {
            Some(reason) => {
                ctx.say(reason).await?;
            }
            None => return Err(err),
        },
    }

    Ok(())
}

/// Turn user input into a signed second count for the store to validate.
fn parse_cooldown_input(raw: &str) -> Result<i64, ValidationError> {
    let value = raw.trim();

    if let Some(magnitude) = value.strip_prefix('-') {
        return match parse_interval_seconds(magnitude) {
            Some(_) => Err(ValidationError::NegativeCooldown(value.to_owned())),
            None => Err(ValidationError::InvalidDuration(value.to_owned())),
        };
    }

    parse_interval_seconds(value)
        .and_then(|seconds| i64::try_from(seconds).ok())
        .ok_or_else(|| ValidationError::InvalidDuration(value.to_owned()))
}
