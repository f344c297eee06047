use poise::serenity_prelude as serenity;
use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::impls::warnings::revoke_latest_warning;
use foxy_utils::formatting::user_mention;
use foxy_utils::time::now_unix_secs;

use crate::access::{MISSING_TARGET_TEXT, ensure_guild, require_level, resolve_target};
use crate::moderation::punishment::enforce_warning_ban;
use crate::moderation::report::{NOTHING_TO_REVOKE_TEXT, revocation_announcement};
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "unwarn",
    desc: "Зняти останнє активне попередження",
    category: "moderation",
    usage: "!unwarn <користувач | відповідь>",
    min_level: 3,
    scope: CommandScope::Group,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn unwarn(
    ctx: Context<'_>,
    #[description = "Учасник, з якого знімаємо попередження"] user: Option<serenity::User>,
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

    let (revoked, active_count) = revoke_latest_warning(
        &ctx.data().db,
        target.id.get(),
        ctx.author().id.get(),
        now_unix_secs(),
    )
    .await?;

    let Some(revoked) = revoked else {
        ctx.say(NOTHING_TO_REVOKE_TEXT).await?;
        return Ok(());
    };

    info!(
        guild_id = guild_id.get(),
        target_id = target.id.get(),
        moderator_id = ctx.author().id.get(),
        warning_id = revoked.id,
        active_count,
        "warning revoked"
    );

    enforce_warning_ban(ctx.http(), guild_id, target.id, active_count).await;

    ctx.say(revocation_announcement(&user_mention(target.id.get())))
        .await?;

    Ok(())
}
