use crate::CommandMeta;
use crate::onlineping::replies::{guild_only_message, usage_message};
use onlineping_core::{Context, Error};
use onlineping_database::impls::settings::get_prefs;
use onlineping_database::impls::subscriptions::set_mention_preference;
use onlineping_database::model::settings::wants_mention;
use onlineping_utils::parse::parse_toggle;

pub const META: CommandMeta = CommandMeta {
    name: "op pingme",
    desc: "Choose whether notifications mention you.",
    category: "onlineping",
    usage: "!op pingme <on|off>",
};

/// Choose whether notifications mention you.
#[poise::command(prefix_command, slash_command, category = "Onlineping")]
pub async fn pingme(
    ctx: Context<'_>,
    #[description = "on or off"] state: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };
    let user_id = ctx.author().id.get();

    let Some(raw_state) = state
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        let prefs = get_prefs(&ctx.data().db, guild_id.get()).await?;
        ctx.say(format!(
            "Notifications currently **{}** you.",
            if wants_mention(&prefs, user_id) {
                "mention"
            } else {
                "do not mention"
            }
        ))
        .await?;
        return Ok(());
    };

    let Some(mention) = parse_toggle(raw_state) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    set_mention_preference(&ctx.data().db, guild_id.get(), user_id, mention).await?;
    ctx.say(if mention {
        "Notifications will **mention** you."
    } else {
        "Notifications will **no longer mention** you."
    })
    .await?;

    Ok(())
}
