//! Gates shared by command handlers: invocation context and admin levels.

use poise::serenity_prelude as serenity;

use foxy_core::{Context, Error};
use foxy_database::impls::admins::{add_admin, get_admin_level};
use foxy_utils::formatting::normalize_username;

pub const INSUFFICIENT_LEVEL_TEXT: &str = "Недостатній рівень.";
pub const PRIVATE_ONLY_TEXT: &str = "Ходи в приватні, пошалим там.";
pub const GUILD_ONLY_TEXT: &str = "Ця команда працює тільки в групових чатах.";
pub const MISSING_TARGET_TEXT: &str = "Вкажи користувача або відповідай на його повідомлення.";

/// Check the caller's admin level, answering with the standard refusal when it is too low.
pub async fn require_level(ctx: Context<'_>, min_level: i32) -> Result<bool, Error> {
    let level = get_admin_level(&ctx.data().db, ctx.author().id.get()).await?;
    if level < min_level {
        ctx.say(INSUFFICIENT_LEVEL_TEXT).await?;
        return Ok(false);
    }

    Ok(true)
}

pub async fn ensure_private(ctx: Context<'_>) -> Result<bool, Error> {
    if ctx.guild_id().is_none() {
        return Ok(true);
    }

    ctx.say(PRIVATE_ONLY_TEXT).await?;
    Ok(false)
}

pub async fn ensure_guild(ctx: Context<'_>) -> Result<Option<serenity::GuildId>, Error> {
    match ctx.guild_id() {
        Some(guild_id) => Ok(Some(guild_id)),
        None => {
            ctx.say(GUILD_ONLY_TEXT).await?;
            Ok(None)
        }
    }
}

/// Keep the owner's stored admin profile in step with their current account.
pub async fn sync_owner_profile(ctx: Context<'_>) -> Result<(), Error> {
    let author = ctx.author();
    if author.id.get() != ctx.data().config.owner_id {
        return Ok(());
    }

    add_admin(
        &ctx.data().db,
        author.id.get(),
        &user_display_name(author),
        &normalize_username(&author.name),
    )
    .await
}

pub fn user_display_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// Author of the message the invocation replied to, for prefix commands.
pub fn replied_author(ctx: Context<'_>) -> Option<serenity::User> {
    match ctx {
        poise::Context::Prefix(prefix) => prefix
            .msg
            .referenced_message
            .as_ref()
            .map(|message| message.author.clone()),
        poise::Context::Application(_) => None,
    }
}

/// Target of a moderation command: the replied-to author wins over an explicit user.
pub fn resolve_target(
    ctx: Context<'_>,
    explicit: Option<serenity::User>,
) -> Option<serenity::User> {
    replied_author(ctx).or(explicit)
}

/// Remove the invoking message of a prefix command; acknowledge slash invocations privately.
pub async fn finish_silently(ctx: Context<'_>, ack: &str) -> Result<(), Error> {
    match ctx {
        poise::Context::Prefix(prefix) => {
            if let Err(source) = prefix.msg.delete(ctx.http()).await {
                tracing::debug!(?source, "failed to delete invoking message");
            }
        }
        poise::Context::Application(_) => {
            ctx.send(poise::CreateReply::default().ephemeral(true).content(ack))
                .await?;
        }
    }

    Ok(())
}

/// Answer slash invocations privately; prefix invocations stay unanswered.
pub async fn acknowledge_slash(ctx: Context<'_>, text: &str) -> Result<(), Error> {
    if let poise::Context::Application(_) = ctx {
        ctx.send(poise::CreateReply::default().ephemeral(true).content(text))
            .await?;
    }

    Ok(())
}
