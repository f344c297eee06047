//! Keeps the bot inside the configured guilds.
//!
//! Runs before every command (as the framework command check) and as the first
//! step of the event handler.

use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use foxy_core::{Context, Data, Error, GuardVerdict};

pub const WRONG_CHAT_TEXT: &str = "Я не пристосована до цього чату.\n\
     Звернися до мого володаря @AlexRoshe і він розробить тобі подружку за адекватну ціну.\n\
     А я тільки належу до клану JokerRecon";

/// Command check: refuse commands from guilds the bot does not serve.
///
/// Prefix invocations are answered by the message guard, which sees the same message.
pub async fn check_command(ctx: Context<'_>) -> Result<bool, Error> {
    let guild_id = ctx.guild_id();
    if ctx.data().config.guard(guild_id.map(|id| id.get())) == GuardVerdict::Pass {
        return Ok(true);
    }

    let Some(guild_id) = guild_id else {
        return Ok(true);
    };

    if let poise::Context::Application(_) = ctx {
        if let Err(source) = ctx.say(WRONG_CHAT_TEXT).await {
            warn!(?source, guild_id = guild_id.get(), "failed to answer in foreign guild");
        }
        leave_guild(ctx.http(), guild_id).await;
    }

    Ok(false)
}

/// Returns `true` when the message came from a foreign guild and was handled here.
pub async fn guard_message(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> bool {
    let Some(guild_id) = message.guild_id else {
        return false;
    };

    if data.config.guard(Some(guild_id.get())) == GuardVerdict::Pass {
        return false;
    }

    if !message.author.bot
        && let Err(source) = message.reply(&ctx.http, WRONG_CHAT_TEXT).await
    {
        warn!(?source, guild_id = guild_id.get(), "failed to answer in foreign guild");
    }

    leave_guild(&ctx.http, guild_id).await;
    true
}

/// Returns `true` when the interaction came from a foreign guild and was handled here.
pub async fn guard_component(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> bool {
    let Some(guild_id) = interaction.guild_id else {
        return false;
    };

    if data.config.guard(Some(guild_id.get())) == GuardVerdict::Pass {
        return false;
    }

    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new().content(WRONG_CHAT_TEXT),
    );
    if let Err(source) = interaction.create_response(&ctx.http, response).await {
        warn!(?source, guild_id = guild_id.get(), "failed to answer in foreign guild");
    }

    leave_guild(&ctx.http, guild_id).await;
    true
}

/// Leave guilds that are not served. Fresh joins get the wrong-chat notice first.
pub async fn guard_guild_create(
    ctx: &serenity::Context,
    data: &Data,
    guild: &serenity::Guild,
    is_new: Option<bool>,
) {
    if data.config.is_allowed_guild(guild.id.get()) {
        return;
    }

    if is_new == Some(true)
        && let Some(channel_id) = guild.system_channel_id
        && let Err(source) = channel_id.say(&ctx.http, WRONG_CHAT_TEXT).await
    {
        warn!(?source, guild_id = guild.id.get(), "failed to post wrong-chat notice");
    }

    leave_guild(&ctx.http, guild.id).await;
}

async fn leave_guild(http: &serenity::Http, guild_id: serenity::GuildId) {
    match guild_id.leave(http).await {
        Ok(()) => info!(guild_id = guild_id.get(), "left foreign guild"),
        Err(source) => warn!(?source, guild_id = guild_id.get(), "failed to leave foreign guild"),
    }
}
