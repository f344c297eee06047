use poise::serenity_prelude as serenity;
use tracing::{error, info};

use foxy_commands::admin::welcome::welcome_message;
use foxy_core::Data;
use foxy_database::impls::members::ensure_clan_member;

/// Greet a newcomer of the main guild and remember their first join.
pub async fn handle_main_guild_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) {
    let config = &data.config;
    if member.guild_id.get() != config.main_guild_id || member.user.bot {
        return;
    }

    let user_id = member.user.id.get();
    match ensure_clan_member(&data.db, user_id).await {
        Ok(true) => info!(user_id, "first clan join recorded"),
        Ok(false) => {}
        Err(source) => error!(?source, user_id, "failed to record clan member"),
    }

    let message =
        match welcome_message(&data.db, config.main_guild_id, user_id, &config.rules_url).await {
            Ok(message) => message,
            Err(source) => {
                error!(?source, user_id, "failed to build welcome message");
                return;
            }
        };

    if let Err(source) = serenity::ChannelId::new(config.main_channel_id)
        .send_message(&ctx.http, message)
        .await
    {
        error!(?source, user_id, "failed to post welcome message");
    }
}
