pub mod cooldown;
pub mod list;
pub mod mode;
pub mod pingme;
pub(crate) mod replies;
pub mod track;
pub mod untrack;

use cooldown::cooldown;
use list::list;
use mode::mode;
use pingme::pingme;
use track::track;
use untrack::untrack;

use crate::CommandMeta;
use onlineping_core::{Context, Error};
use replies::{guild_only_message, overview_message};

pub const META: CommandMeta = CommandMeta {
    name: "onlineping",
    desc: "Get pinged when tracked members change status. Alias: `op`.",
    category: "onlineping",
    usage: "!onlineping <track|untrack|list|mode|cooldown|pingme>",
};

/// Get pinged when tracked members change status.
#[poise::command(
    prefix_command,
    slash_command,
    aliases("op"),
    category = "Onlineping",
    subcommands("track", "untrack", "list", "mode", "cooldown", "pingme")
)]
pub async fn onlineping(ctx: Context<'_>) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    }

    ctx.say(overview_message()).await?;
    Ok(())
}
