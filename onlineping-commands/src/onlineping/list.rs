use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::onlineping::replies::guild_only_message;
use onlineping_core::{Context, Error};
use onlineping_database::impls::settings::load_guild_config;
use onlineping_database::model::settings::GuildConfig;
use onlineping_utils::embed::build_embed;
use onlineping_utils::formatting::{channel_mention, format_interval, user_mention};

pub const META: CommandMeta = CommandMeta {
    name: "op list",
    desc: "List tracked members, their watchers, and the guild settings.",
    category: "onlineping",
    usage: "!op list",
};

/// Room left in an embed description for the target lines.
const MAX_LISTING_CHARS: usize = 3_800;

/// List tracked members.
#[poise::command(prefix_command, slash_command, category = "Onlineping")]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let config = load_guild_config(&ctx.data().db, guild_id.get()).await?;
    let embed = build_embed(
        "Onlineping",
        render_listing(&config, MAX_LISTING_CHARS),
        Some("🔔 mentioned • 🔕 not mentioned"),
    );

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;
    Ok(())
}

/// Render every target in id order, watchers in subscription order, then the
/// guild settings. Target lines past `budget` characters are summarized.
fn render_listing(config: &GuildConfig, budget: usize) -> String {
    let mut out = String::new();

    if config.targets.is_empty() {
        out.push_str("Nothing tracked.\n");
    }

    let mut shown = 0;
    for (target_id, entry) in &config.targets {
        let watchers = entry
            .pingers
            .iter()
            .map(|watcher| {
                let bell = if config.wants_mention(*watcher) {
                    "🔔"
                } else {
                    "🔕"
                };
                format!("{} {}", user_mention(*watcher), bell)
            })
            .collect::<Vec<_>>()
            .join(", ");

        let line = format!(
            "- {} → {} (ping: {})\n",
            user_mention(*target_id),
            channel_mention(entry.channel),
            watchers
        );
        if out.len() + line.len() > budget {
            break;
        }
        out.push_str(&line);
        shown += 1;
    }

    let hidden = config.targets.len() - shown;
    if hidden > 0 {
        out.push_str(&format!("…and {} more\n", hidden));
    }

    out.push_str(&format!(
        "\n**Mode :** {}\n**Cooldown :** {}",
        config.mode,
        format_interval(config.cooldown_seconds)
    ));

    out
}
