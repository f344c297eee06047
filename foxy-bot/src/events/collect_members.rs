use poise::serenity_prelude as serenity;
use tracing::error;

use foxy_core::Data;
use foxy_database::impls::members::upsert_call_member;
use foxy_utils::parse::is_command_text;

/// Remember guild members who speak so `/call` can reach them.
pub async fn handle_message_collect(data: &Data, message: &serenity::Message) {
    let Some(guild_id) = message.guild_id else {
        return;
    };

    if !should_collect(
        message.author.bot,
        message.webhook_id.is_some(),
        Some(guild_id),
        &message.content,
    ) {
        return;
    }

    let display_name = message
        .member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .or_else(|| message.author.global_name.clone());

    if let Err(source) = upsert_call_member(
        &data.db,
        guild_id.get(),
        message.author.id.get(),
        &message.author.name,
        display_name.as_deref(),
    )
    .await
    {
        error!(?source, user_id = message.author.id.get(), "failed to record call member");
    }
}

/// Only human guild chatter is collected; command messages are left to the framework.
fn should_collect(
    author_is_bot: bool,
    from_webhook: bool,
    guild_id: Option<serenity::GuildId>,
    content: &str,
) -> bool {
    !author_is_bot && !from_webhook && guild_id.is_some() && !is_command_text(content)
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::should_collect;

    fn guild() -> Option<serenity::GuildId> {
        Some(serenity::GuildId::new(10))
    }

    #[test]
    fn plain_guild_chatter_is_collected() {
        assert!(should_collect(false, false, guild(), "привіт усім"));
        assert!(should_collect(false, false, guild(), "дивись /warn тут не команда"));
    }

    #[test]
    fn command_messages_are_left_to_the_framework() {
        assert!(!should_collect(false, false, guild(), "!warn <@2> спам"));
        assert!(!should_collect(false, false, guild(), "/mywarns"));
        assert!(!should_collect(false, false, guild(), "  !ping"));
    }

    #[test]
    fn bots_webhooks_and_direct_messages_are_skipped() {
        assert!(!should_collect(true, false, guild(), "hello"));
        assert!(!should_collect(false, true, guild(), "hello"));
        assert!(!should_collect(false, false, None, "hello"));
    }
}
