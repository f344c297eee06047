use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Active warnings at which a member is banned.
pub const BAN_THRESHOLD: i64 = 3;

pub fn should_ban(active_count: i64) -> bool {
    active_count >= BAN_THRESHOLD
}

/// Ban or unban the member so the guild state follows the active warning count.
///
/// Platform refusals are logged and ignored; unbanning a member who was never
/// banned is expected to fail.
pub async fn enforce_warning_ban(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    active_count: i64,
) {
    if should_ban(active_count) {
        match guild_id
            .ban_with_reason(http, user_id, 0, "Три активні попередження")
            .await
        {
            Ok(()) => info!(
                guild_id = guild_id.get(),
                user_id = user_id.get(),
                active_count,
                "member banned for active warnings"
            ),
            Err(source) => debug!(?source, user_id = user_id.get(), "warning ban rejected"),
        }
        return;
    }

    if let Err(source) = guild_id.unban(http, user_id).await {
        debug!(?source, user_id = user_id.get(), "warning unban skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::should_ban;

    #[test]
    fn three_active_warnings_ban() {
        assert!(!should_ban(0));
        assert!(!should_ban(2));
        assert!(should_ban(3));
        assert!(should_ban(7));
    }
}
