use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::impls::chat_settings::{SILENCE_ENABLED_KEY, set_chat_setting};
use foxy_database::model::admins::MAX_ADMIN_LEVEL;

use crate::access::{ensure_private, require_level, sync_owner_profile};
use crate::{CommandMeta, CommandScope};

pub const ENABLE_META: CommandMeta = CommandMeta {
    name: "silence_enable",
    desc: "Увімкнути щоденну хвилину мовчання",
    category: "admin",
    usage: "!silence_enable",
    min_level: 4,
    scope: CommandScope::Private,
};

pub const DISABLE_META: CommandMeta = CommandMeta {
    name: "silence_disable",
    desc: "Вимкнути щоденну хвилину мовчання",
    category: "admin",
    usage: "!silence_disable",
    min_level: 4,
    scope: CommandScope::Private,
};

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn silence_enable(ctx: Context<'_>) -> Result<(), Error> {
    toggle_silence(ctx, true).await
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn silence_disable(ctx: Context<'_>) -> Result<(), Error> {
    toggle_silence(ctx, false).await
}

async fn toggle_silence(ctx: Context<'_>, enabled: bool) -> Result<(), Error> {
    if !ensure_private(ctx).await? {
        return Ok(());
    }

    sync_owner_profile(ctx).await?;

    if !require_level(ctx, MAX_ADMIN_LEVEL).await? {
        return Ok(());
    }

    let value = if enabled { "1" } else { "0" };
    set_chat_setting(
        &ctx.data().db,
        ctx.data().config.main_guild_id,
        SILENCE_ENABLED_KEY,
        value,
    )
    .await?;

    info!(enabled, changed_by = ctx.author().id.get(), "daily silence toggled");

    let reply = if enabled {
        "Хвилину мовчання УВІМКНЕНО."
    } else {
        "Хвилину мовчання ВИМКНЕНО."
    };
    ctx.say(reply).await?;
    Ok(())
}
