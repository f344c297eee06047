use poise::serenity_prelude as serenity;
use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::impls::admins::get_admin_level;
use foxy_database::impls::warnings::{NewWarning, create_warning};
use foxy_utils::formatting::user_mention;
use foxy_utils::time::now_unix_secs;

use crate::access::{MISSING_TARGET_TEXT, ensure_guild, require_level, resolve_target};
use crate::moderation::punishment::enforce_warning_ban;
use crate::moderation::report::warning_announcement;
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Видати попередження учаснику",
    category: "moderation",
    usage: "!warn <користувач | відповідь> <причина>",
    min_level: 3,
    scope: CommandScope::Group,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Учасник, якого попереджаємо"] user: Option<serenity::User>,
    #[description = "Причина попередження"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ensure_guild(ctx).await? else {
        return Ok(());
    };

    if !require_level(ctx, META.min_level).await? {
        return Ok(());
    }

    let Some(target) = resolve_target(ctx, user) else {
        ctx.say(MISSING_TARGET_TEXT).await?;
        return Ok(());
    };

    let Some(reason) = reason
        .map(|reason| reason.trim().to_owned())
        .filter(|reason| !reason.is_empty())
    else {
        ctx.say("Вкажи причину попередження.").await?;
        return Ok(());
    };

    let db = &ctx.data().db;
    let issued_by = ctx.author().id.get();
    let issued_by_level = get_admin_level(db, issued_by).await?;

    let (warning, active_count) = create_warning(
        db,
        NewWarning {
            guild_id: guild_id.get(),
            user_id: target.id.get(),
            reason: &reason,
            issued_by,
            issued_by_level,
            issued_at: now_unix_secs(),
        },
    )
    .await?;

    info!(
        guild_id = guild_id.get(),
        target_id = target.id.get(),
        moderator_id = issued_by,
        active_count,
        warning_id = warning.id,
        "warning issued"
    );

    enforce_warning_ban(ctx.http(), guild_id, target.id, active_count).await;

    ctx.say(warning_announcement(
        &user_mention(target.id.get()),
        &user_mention(issued_by),
        &warning.reason,
        warning.expires_at,
    ))
    .await?;

    Ok(())
}
