use std::time::Duration;

use poise::serenity_prelude as serenity;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use foxy_core::{Context, Error};
use foxy_database::impls::members::list_call_members;
use foxy_utils::formatting::user_mention;
use foxy_utils::permissions::has_user_permission;

use crate::access::{ensure_guild, finish_silently};
use crate::{CommandMeta, CommandScope};

pub const CALL_META: CommandMeta = CommandMeta {
    name: "call",
    desc: "Покликати всіх активних учасників",
    category: "utility",
    usage: "!call",
    min_level: 0,
    scope: CommandScope::Group,
};

pub const SCALL_META: CommandMeta = CommandMeta {
    name: "scall",
    desc: "Тихий заклик, що зникає через 5 хвилин",
    category: "utility",
    usage: "!scall",
    min_level: 0,
    scope: CommandScope::Group,
};

const EMOJI_POOL: &[&str] = &[
    "🦊", "⚡️", "🔥", "🎯", "💀", "🧨", "🔪", "🛡️", "🎮", "👑", "🚨", "🔔", "💣", "🏴‍☠️", "🕶️",
];
const MENTIONS_PER_MESSAGE: usize = 5;
const CALL_MEMBER_LIMIT: i64 = 500;
const SCALL_LIFETIME: Duration = Duration::from_secs(300);

const EMPTY_ROSTER_TEXT: &str =
    "Нема кого кликати. Нехай люди напишуть хоч одне повідомлення в чаті 🙂";

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn call(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ensure_guild(ctx).await? else {
        return Ok(());
    };

    send_call(ctx, guild_id).await?;
    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn scall(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ensure_guild(ctx).await? else {
        return Ok(());
    };

    let bot_id = ctx.serenity_context().cache.current_user().id;
    if !has_user_permission(
        ctx.http(),
        guild_id,
        bot_id,
        serenity::Permissions::MANAGE_MESSAGES,
    )
    .await?
    {
        ctx.say("Для /scall мені треба право адміна з дозволом: Manage Messages.")
            .await?;
        return Ok(());
    }

    let sent = send_call(ctx, guild_id).await?;
    if sent.is_empty() {
        return Ok(());
    }

    let http = ctx.serenity_context().http.clone();
    let channel_id = ctx.channel_id();
    tokio::spawn(async move {
        tokio::time::sleep(SCALL_LIFETIME).await;
        for message_id in sent {
            if let Err(source) = channel_id.delete_message(&http, message_id).await {
                debug!(?source, message_id = message_id.get(), "failed to delete scall message");
            }
        }
    });

    Ok(())
}

/// Post the roster in batches and return the ids of the sent messages.
async fn send_call(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
) -> Result<Vec<serenity::MessageId>, Error> {
    let members = list_call_members(&ctx.data().db, guild_id.get(), CALL_MEMBER_LIMIT).await?;
    if members.is_empty() {
        ctx.say(EMPTY_ROSTER_TEXT).await?;
        return Ok(Vec::new());
    }

    let mentions = {
        let mut rng = rand::thread_rng();
        members
            .iter()
            .map(|member| {
                let emoji = EMOJI_POOL.choose(&mut rng).copied().unwrap_or("🦊");
                format!("{}{}", emoji, user_mention(member.user_id))
            })
            .collect::<Vec<_>>()
    };

    let reply_to = match ctx {
        poise::Context::Prefix(prefix) => prefix
            .msg
            .referenced_message
            .as_deref()
            .map(|message| (message.channel_id, message.id)),
        poise::Context::Application(_) => None,
    };

    let mut sent = Vec::new();
    for batch in call_batches(&mentions) {
        let mut builder = serenity::CreateMessage::new().content(batch);
        if let Some(reference) = reply_to {
            builder = builder.reference_message(reference);
        }
        let message = ctx.channel_id().send_message(ctx.http(), builder).await?;
        sent.push(message.id);
    }

    info!(
        guild_id = guild_id.get(),
        members = members.len(),
        batches = sent.len(),
        "call roster posted"
    );

    finish_silently(ctx, "Заклик надіслано.").await?;

    Ok(sent)
}

fn call_batches(mentions: &[String]) -> Vec<String> {
    mentions
        .chunks(MENTIONS_PER_MESSAGE)
        .map(|chunk| chunk.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::call_batches;

    #[test]
    fn batches_hold_five_mentions() {
        let mentions: Vec<String> = (1..=12).map(|id| format!("<@{id}>")).collect();
        let batches = call_batches(&mentions);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0], "<@1> <@2> <@3> <@4> <@5>");
        assert_eq!(batches[2], "<@11> <@12>");
    }

    #[test]
    fn empty_roster_has_no_batches() {
        assert!(call_batches(&[]).is_empty());
    }
}
