//! Daily minute of silence at 09:00 Kyiv time.

use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use foxy_core::Data;
use foxy_database::impls::chat_settings::{
    SILENCE_ENABLED_KEY, SILENCE_LAST_DATE_KEY, get_chat_setting, set_chat_setting,
};
use foxy_utils::time::{iso_day, kyiv_now, seconds_until_next_local};

const START_HOUR: u32 = 9;
const SILENCE_DURATION: Duration = Duration::from_secs(60);
const CLEANUP_DELAY: Duration = Duration::from_secs(15 * 60);

const START_TEXT: &str = "🕯️ Загальнонаціональна хвилина мовчання.\n\
     Зупинись на 60 секунд. Вшануй пам’ять наших воїнів і цивільних, які загинули через війну.\n\
     Схили голову. Подякуй. Пам’ятай.";
const END_TEXT: &str = "Дякую! Слава Україні!";

pub async fn run_silence_scheduler(http: Arc<serenity::Http>, data: Data) {
    loop {
        let wait = seconds_until_next_local(&kyiv_now(), START_HOUR, 0);
        info!(wait_secs = wait, "next minute of silence scheduled");
        tokio::time::sleep(Duration::from_secs(wait)).await;

        if let Err(source) = run_once(&http, &data).await {
            error!(?source, "minute of silence failed");
        }
    }
}

async fn run_once(http: &Arc<serenity::Http>, data: &Data) -> anyhow::Result<()> {
    let scope_id = data.config.main_guild_id;

    let enabled = get_chat_setting(&data.db, scope_id, SILENCE_ENABLED_KEY)
        .await?
        .is_none_or(|value| value == "1");
    if !enabled {
        info!("minute of silence disabled; skipping");
        return Ok(());
    }

    let today = iso_day(&kyiv_now());
    let last = get_chat_setting(&data.db, scope_id, SILENCE_LAST_DATE_KEY).await?;
    if last.as_deref() == Some(today.as_str()) {
        return Ok(());
    }
    set_chat_setting(&data.db, scope_id, SILENCE_LAST_DATE_KEY, &today).await?;

    let channels: Vec<serenity::ChannelId> = data
        .config
        .silence_channel_ids()
        .into_iter()
        .map(serenity::ChannelId::new)
        .collect();

    let mut silenced = Vec::new();
    for channel_id in channels {
        match begin_silence(http, channel_id).await {
            Ok(state) => silenced.push(state),
            Err(source) => warn!(?source, channel_id = channel_id.get(), "failed to start silence"),
        }
    }

    tokio::time::sleep(SILENCE_DURATION).await;

    for state in silenced {
        if let Err(source) = end_silence(http, &state).await {
            warn!(?source, channel_id = state.channel_id.get(), "failed to end silence");
        }
    }

    info!(day = %today, "minute of silence finished");
    Ok(())
}

struct SilencedChannel {
    channel_id: serenity::ChannelId,
    everyone: serenity::RoleId,
    previous: Option<serenity::PermissionOverwrite>,
    locked: bool,
}

async fn begin_silence(
    http: &Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
) -> anyhow::Result<SilencedChannel> {
    let channel = channel_id
        .to_channel(http)
        .await?
        .guild()
        .ok_or_else(|| anyhow::anyhow!("silence channel is not a guild channel"))?;

    let everyone = serenity::RoleId::new(channel.guild_id.get());
    let previous = channel
        .permission_overwrites
        .iter()
        .find(|overwrite| overwrite.kind == serenity::PermissionOverwriteType::Role(everyone))
        .cloned();

    let start = channel_id.say(http, START_TEXT).await?;
    schedule_delete(http.clone(), channel_id, start.id);

    let (allow, deny) = previous
        .as_ref()
        .map_or((serenity::Permissions::empty(), serenity::Permissions::empty()), |overwrite| {
            (overwrite.allow, overwrite.deny)
        });

    let locked = match channel_id
        .create_permission(
            http,
            serenity::PermissionOverwrite {
                allow: allow - serenity::Permissions::SEND_MESSAGES,
                deny: deny | serenity::Permissions::SEND_MESSAGES,
                kind: serenity::PermissionOverwriteType::Role(everyone),
            },
        )
        .await
    {
        Ok(()) => true,
        Err(source) => {
            warn!(?source, channel_id = channel_id.get(), "failed to lock channel");
            false
        }
    };

    Ok(SilencedChannel {
        channel_id,
        everyone,
        previous,
        locked,
    })
}

async fn end_silence(http: &Arc<serenity::Http>, state: &SilencedChannel) -> anyhow::Result<()> {
    if state.locked {
        match &state.previous {
            Some(previous) => {
                state
                    .channel_id
                    .create_permission(http, previous.clone())
                    .await?
            }
            None => {
                state
                    .channel_id
                    .delete_permission(
                        http,
                        serenity::PermissionOverwriteType::Role(state.everyone),
                    )
                    .await?
            }
        }
    }

    let end = state.channel_id.say(http, END_TEXT).await?;
    schedule_delete(http.clone(), state.channel_id, end.id);
    Ok(())
}

fn schedule_delete(
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
) {
    tokio::spawn(async move {
        tokio::time::sleep(CLEANUP_DELAY).await;
        if let Err(source) = channel_id.delete_message(&http, message_id).await {
            warn!(?source, channel_id = channel_id.get(), "failed to delete silence message");
        }
    });
}
