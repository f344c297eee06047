use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use foxy_core::{Context, Error};
use foxy_database::impls::admins::get_admin_level;
use foxy_utils::formatting::user_mention;

use crate::access::ensure_private;
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "send",
    desc: "Оголошення в основний канал і канал Родини",
    category: "admin",
    usage: "!send <текст>",
    min_level: 3,
    scope: CommandScope::Private,
};

const NO_RIGHTS_TEXT: &str =
    "Недостатньо прав. Команда доступна адміністраторам з рівнем доступу 3+.";

/// Result of delivering an announcement to both clan channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BroadcastOutcome {
    Delivered,
    Partial {
        failed_channel: &'static str,
        error: String,
    },
    Failed {
        error: String,
    },
}

impl BroadcastOutcome {
    pub fn user_status(&self) -> String {
        match self {
            Self::Delivered => "Оголошення надіслано в обидва чати.".to_owned(),
            Self::Partial {
                failed_channel,
                error,
            } => format!(
                "Оголошення частково надіслано. Помилка для {}: {}",
                failed_channel, error
            ),
            Self::Failed { error } => format!("Не вдалося надіслати оголошення: {}", error),
        }
    }

    pub fn log_status(&self) -> &'static str {
        match self {
            Self::Delivered => "успіх",
            Self::Partial { .. } => "частково",
            Self::Failed { .. } => "невдача",
        }
    }
}

pub fn broadcast_outcome(
    main_error: Option<String>,
    family_error: Option<String>,
) -> BroadcastOutcome {
    match (main_error, family_error) {
        (None, None) => BroadcastOutcome::Delivered,
        (Some(error), Some(_)) => BroadcastOutcome::Failed { error },
        (Some(error), None) => BroadcastOutcome::Partial {
            failed_channel: "MAIN_CHANNEL_ID",
            error,
        },
        (None, Some(error)) => BroadcastOutcome::Partial {
            failed_channel: "FAMILY_CHANNEL_ID",
            error,
        },
    }
}

#[poise::command(prefix_command, slash_command, category = "Admin")]
pub async fn send(
    ctx: Context<'_>,
    #[description = "Текст оголошення"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    if !ensure_private(ctx).await? {
        return Ok(());
    }

    let author_id = ctx.author().id.get();
    if get_admin_level(&ctx.data().db, author_id).await? < META.min_level {
        ctx.say(NO_RIGHTS_TEXT).await?;
        return Ok(());
    }

    let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
        ctx.say("Порожнє оголошення. Додай текст після !send.").await?;
        return Ok(());
    };

    let config = &ctx.data().config;
    let main_error = deliver(ctx, config.main_channel_id, &text).await;
    let family_error = deliver(ctx, config.family_channel_id, &text).await;
    let outcome = broadcast_outcome(main_error, family_error);

    info!(author_id, status = outcome.log_status(), "broadcast finished");
    ctx.say(outcome.user_status()).await?;

    serenity::ChannelId::new(config.admin_log_channel_id)
        .send_message(
            ctx.http(),
            serenity::CreateMessage::new()
                .content(format!(
                    "Адміністратор {} зробив оголошення для чатів сімейства JokerRecon\nСтатус: {}",
                    user_mention(author_id),
                    outcome.log_status()
                ))
                .allowed_mentions(serenity::CreateAllowedMentions::new()),
        )
        .await?;

    Ok(())
}

/// Send the announcement to one channel, returning the error text on failure.
async fn deliver(ctx: Context<'_>, channel_id: u64, text: &str) -> Option<String> {
    match serenity::ChannelId::new(channel_id)
        .say(ctx.http(), text)
        .await
    {
        Ok(_) => None,
        Err(source) => {
            warn!(?source, channel_id, "broadcast delivery failed");
            Some(source.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BroadcastOutcome, broadcast_outcome};

    #[test]
    fn both_delivered() {
        let outcome = broadcast_outcome(None, None);
        assert_eq!(outcome, BroadcastOutcome::Delivered);
        assert_eq!(outcome.log_status(), "успіх");
        assert_eq!(outcome.user_status(), "Оголошення надіслано в обидва чати.");
    }

    #[test]
    fn partial_failure_names_the_channel() {
        let outcome = broadcast_outcome(None, Some("Missing Access".to_owned()));
        assert_eq!(outcome.log_status(), "частково");
        assert_eq!(
            outcome.user_status(),
            "Оголошення частково надіслано. Помилка для FAMILY_CHANNEL_ID: Missing Access"
        );

        let outcome = broadcast_outcome(Some("boom".to_owned()), None);
        assert!(outcome.user_status().contains("MAIN_CHANNEL_ID: boom"));
    }

    #[test]
    fn total_failure_reports_main_error() {
        let outcome = broadcast_outcome(Some("a".to_owned()), Some("b".to_owned()));
        assert_eq!(outcome.log_status(), "невдача");
        assert_eq!(outcome.user_status(), "Не вдалося надіслати оголошення: a");
    }
}
