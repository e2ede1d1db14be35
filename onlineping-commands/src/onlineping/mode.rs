use crate::CommandMeta;
use crate::onlineping::replies::{
    guild_only_message, missing_permission_message, validation_message,
};
use onlineping_core::{Context, Error};
use onlineping_database::impls::settings::get_mode;
use onlineping_database::impls::subscriptions::update_mode;
use onlineping_utils::permissions::can_manage_guild;

pub const META: CommandMeta = CommandMeta {
    name: "op mode",
    desc: "View or set which status changes notify: online_only (default) or all.",
    category: "onlineping",
    usage: "!op mode [online_only|all]",
};

/// Set when to ping: online_only (default) or all.
#[poise::command(prefix_command, slash_command, category = "Onlineping")]
pub async fn mode(
    ctx: Context<'_>,
    #[description = "online_only or all"] value: Option<String>,
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
        let current = get_mode(&ctx.data().db, guild_id.get()).await?;
        ctx.say(format!("Onlineping mode is **{}**.", current))
            .await?;
        return Ok(());
    };

    if !can_manage_guild(ctx.http(), guild_id, ctx.author().id).await? {
        ctx.say(missing_permission_message()).await?;
        return Ok(());
    }

    match update_mode(&ctx.data().db, guild_id.get(), raw).await {
        Ok(mode) => {
            ctx.say(format!("Onlineping mode set to **{}**.", mode))
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
