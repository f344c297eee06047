mod events;
mod services;

use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use foxy_core::config::env_bool;
use foxy_core::{BotConfig, Data, Error};
use foxy_database::impls::admins::{add_admin, set_admin_level};
use foxy_database::model::admins::MAX_ADMIN_LEVEL;
use foxy_database::{CacheService, Database, MIGRATOR};

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
    let database_url = env::var("DATABASE_URL")?;
    let config = Arc::new(BotConfig::from_env()?);
    info!(
        allowed_guilds = config.allowed_guild_ids.len(),
        reception = config.reception.is_some(),
        "configuration loaded"
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "foxy:prod".to_string());

    let cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                    CacheService::disabled(redis_key_prefix.clone())
                }
            },
            Err(_) => {
                warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
                CacheService::disabled(redis_key_prefix.clone())
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix.clone())
    };

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let db = Database::with_cache(db_pool, cache);

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    add_admin(&db, config.owner_id, "", "").await?;
    set_admin_level(&db, config.owner_id, MAX_ADMIN_LEVEL).await?;
    info!(owner_id = config.owner_id, "owner admin level ensured");

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::DIRECT_MESSAGES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: foxy_commands::commands(),
            command_check: Some(|ctx| Box::pin(events::chat_guard::check_command(ctx))),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        command = %ctx.command().qualified_name,
                        user_id = ctx.author().id.get(),
                        guild_id = ctx.guild_id().map(|id| id.get()),
                        "command invoked"
                    );
                })
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(foxy_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let db = db.clone();
            let config = config.clone();
            Box::pin(async move {
                info!("Foxy has awoken!");

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let data = Data { db, config };

                tokio::spawn(services::db_scheduler::run_db_scheduler(
                    ctx.http.clone(),
                    data.clone(),
                ));
                tokio::spawn(services::silence::run_silence_scheduler(
                    ctx.http.clone(),
                    data.clone(),
                ));

                Ok(data)
            })
        })
        .build();

    info!("Foxy is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = foxy_utils::embed::titled_embed(
                "Помилка",
                "Щось пішло не так під час виконання команди.",
            );

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = foxy_commands::COMMANDS
                .iter()
                .find(|meta| meta.name == ctx.command().name)
                .map_or_else(
                    || format!("!{}", ctx.command().qualified_name),
                    |meta| meta.usage.to_owned(),
                );
            let description = if let Some(input) = input {
                format!("Невірний аргумент: `{}`\nФормат: `{}`", input, usage)
            } else {
                format!("Бракує аргументу.\nФормат: `{}`", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            debug!(command = %ctx.command().qualified_name, "command check refused invocation");
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
        serenity::FullEvent::Message { new_message } => {
            if events::chat_guard::guard_message(ctx, data, new_message).await {
                return Ok(());
            }
            events::collect_members::handle_message_collect(data, new_message).await;
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            events::chat_guard::guard_guild_create(ctx, data, guild, *is_new).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if !data.config.is_allowed_guild(new_member.guild_id.get()) {
                return Ok(());
            }
            events::welcome::handle_main_guild_join(ctx, data, new_member).await;
            events::reception::handle_main_guild_candidate(ctx, data, new_member).await;
            events::reception::handle_reception_join(ctx, data, new_member).await;
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            if events::chat_guard::guard_component(ctx, data, component).await {
                return Ok(());
            }
            events::reception::handle_review_interaction(ctx, data, component).await;
        }
        _ => {}
    }

    Ok(())
}
