mod events;

use std::env;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use onlineping_core::{Data, Error};
use onlineping_database::{CacheService, Database, MIGRATOR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let guild_id = match env::var("DISCORD_GUILD_ID") {
        Ok(raw) => Some(raw.trim().parse::<u64>()?),
        Err(_) => None,
    };

    let db = connect_database().await?;

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_PRESENCES
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: onlineping_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(onlineping_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let db = db.clone();
            Box::pin(async move {
                info!("Onlineping is ready.");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "Slash commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Slash commands registered globally.");
                    }
                }

                Ok(Data::new(db))
            })
        })
        .build();

    info!("Onlineping is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

/// Build the settings handle: Postgres when `DATABASE_URL` is set, otherwise
/// process memory. Redis sits in front of Postgres when enabled.
async fn connect_database() -> anyhow::Result<Database> {
    let Ok(database_url) = env::var("DATABASE_URL") else {
        warn!("DATABASE_URL is not set; settings are kept in memory and lost on restart.");
        return Ok(Database::in_memory());
    };

    let max_connections = env_u64("DATABASE_MAX_CONNECTIONS", 5);
    let db_pool = PgPoolOptions::new()
        .max_connections(u32::try_from(max_connections).unwrap_or(5))
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let cache = connect_cache().await;
    let db = Database::with_cache(db_pool, cache);

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        if let Some(pool) = db.pool() {
            MIGRATOR.run(pool).await?;
            info!("Database migrations applied.");
        }
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    Ok(db)
}

async fn connect_cache() -> CacheService {
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "onlineping:prod".to_string());

    if !env_bool("REDIS_ENABLED", false) {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(redis_key_prefix);
    }

    let cache = match env::var("REDIS_URL") {
        Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
            Ok(cache) => {
                info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                cache
            }
            Err(err) => {
                warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing without cache.");
                return CacheService::disabled(redis_key_prefix);
            }
        },
        Err(_) => {
            warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing without cache.");
            return CacheService::disabled(redis_key_prefix);
        }
    };

    if let Err(err) = cache.ping().await {
        warn!(
            ?err,
            "Redis cache ping failed; cache operations will continue with fallback behavior."
        );
    } else {
        info!("Redis cache health check passed.");
    }

    cache
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(onlineping_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `!{}`", ctx.command().qualified_name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::PresenceUpdate { new_data } => {
            events::presence::handle_presence_update(ctx, data, new_data).await;
        }
        serenity::FullEvent::GuildCreate { guild, .. } => {
            events::presence::handle_guild_create_presences(data, guild);
        }
        serenity::FullEvent::GuildMemberRemoval { guild_id, user, .. } => {
            events::presence::handle_member_remove_presence(data, *guild_id, user);
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            if !incomplete.unavailable {
                events::presence::handle_guild_delete_presences(data, incomplete.id);
            }
        }
        _ => {}
    }

    Ok(())
}
