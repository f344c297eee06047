use poise::serenity_prelude as serenity;
use tracing::info;

use foxy_core::{Context, Error};
use foxy_database::impls::warnings::{list_active_warnings, list_warning_history};
use foxy_utils::formatting::user_mention;
use foxy_utils::time::now_unix_secs;

use crate::access::{MISSING_TARGET_TEXT, ensure_guild, require_level, resolve_target};
use crate::moderation::report::winfo_report;
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "winfo",
    desc: "Надіслати звіт про попередження в адмін-чат",
    category: "moderation",
    usage: "!winfo <користувач | відповідь>",
    min_level: 1,
    scope: CommandScope::Group,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn winfo(
    ctx: Context<'_>,
    #[description = "Учасник, про якого потрібен звіт"] user: Option<serenity::User>,
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

    let db = &ctx.data().db;
    let now = now_unix_secs();
    let active = list_active_warnings(db, target.id.get(), now).await?;
    let history = list_warning_history(db, target.id.get()).await?;

    let report = winfo_report(&user_mention(target.id.get()), &active, &history, now);
    serenity::ChannelId::new(ctx.data().config.admin_log_channel_id)
        .send_message(ctx.http(), admin_log_entry(report))
        .await?;

    info!(
        guild_id = guild_id.get(),
        target_id = target.id.get(),
        requested_by = ctx.author().id.get(),
        active = active.len(),
        history = history.len(),
        "warning report sent to admin log"
    );

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .content("Звіт надіслано в адмін-чат."),
    )
    .await?;

    Ok(())
}

/// The single admin-log message carrying a report; mentions inside it never ping.
fn admin_log_entry(report: String) -> serenity::CreateMessage {
    serenity::CreateMessage::new()
        .content(report)
        .allowed_mentions(serenity::CreateAllowedMentions::new())
}

#[cfg(test)]
mod tests {
    use foxy_database::model::warnings::WarningRecord;

    use crate::moderation::report::{MESSAGE_LIMIT, winfo_report};

    // 2026-10-18 12:00 UTC
    const NOW: u64 = 1_792_324_800;

    fn warning(id: i64, expires_at: u64) -> WarningRecord {
        WarningRecord {
            id,
            guild_id: 1,
            user_id: 2,
            reason: "флуд у голосовому каналі ".repeat(8),
            issued_at: NOW - 3_600,
            expires_at,
            issued_by: 3,
            issued_by_level: 3,
            is_revoked: false,
            revoked_at: None,
            revoked_by: None,
        }
    }

    #[test]
    fn long_history_still_fits_one_admin_log_message() {
        let active: Vec<WarningRecord> = (0..3).map(|id| warning(id, NOW + 86_400)).collect();
        let history: Vec<WarningRecord> = (0..300).map(|id| warning(id, NOW - 1)).collect();

        let report = winfo_report("<@2>", &active, &history, NOW);

        assert!(report.chars().count() <= MESSAGE_LIMIT);
        assert!(report.starts_with("Попередження для <@2>:\nАктивні попередження: 3"));
        assert!(report.ends_with('…'));
    }
}
