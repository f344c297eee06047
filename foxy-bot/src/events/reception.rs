//! Candidate reception: joins of the reception and main guilds, and review buttons.

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use foxy_commands::invite::review::{
    ADMIN_LOG_NEW_CANDIDATE_TEXT, ADMINS_ONLY_TEXT, INVITE_LIFETIME_SECS, INVITE_WELCOME_TEXT,
    MIN_REVIEW_LEVEL, NOT_A_CANDIDATE_TEXT, REVIEW_DELAY_SECS, ReviewAction, WAIT_DELAY_SECS,
    WAIT_DONE_TEXT, parse_review_action, reschedule_review,
};
use foxy_core::{Data, ReceptionConfig};
use foxy_database::impls::admins::get_admin_level;
use foxy_database::impls::candidates::{
    claim_candidate_decision, get_candidate, get_candidate_in_any_guild,
    postpone_candidate_review, update_candidate_status, upsert_candidate_on_join,
};
use foxy_database::impls::tasks::cancel_pending_tasks;
use foxy_database::model::candidates::CandidateStatus;
use foxy_database::model::tasks::TASK_INVITE_REVIEW_DUE;
use foxy_utils::formatting::{channel_url, user_mention};
use foxy_utils::permissions::is_missing_permissions;
use foxy_utils::time::now_unix_secs;

/// Register a newcomer of the reception guild as a candidate and alert the admins.
pub async fn handle_reception_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) {
    let Some(reception) = data.config.reception else {
        return;
    };
    if member.guild_id.get() != reception.guild_id || member.user.bot {
        return;
    }

    if let Err(source) = register_candidate(ctx, data, reception, member.user.id).await {
        error!(?source, user_id = member.user.id.get(), "failed to register candidate");
    }
}

async fn register_candidate(
    ctx: &serenity::Context,
    data: &Data,
    reception: ReceptionConfig,
    user_id: serenity::UserId,
) -> anyhow::Result<()> {
    let now = now_unix_secs();
    let review_due_at = now + REVIEW_DELAY_SECS;

    upsert_candidate_on_join(&data.db, user_id.get(), reception.guild_id, now, review_due_at)
        .await?;
    reschedule_review(&data.db, reception.guild_id, user_id.get(), review_due_at).await?;
    info!(user_id = user_id.get(), review_due_at, "candidate registered");

    serenity::ChannelId::new(reception.channel_id)
        .say(
            &ctx.http,
            format!("{}, {}", user_mention(user_id.get()), INVITE_WELCOME_TEXT),
        )
        .await?;

    serenity::ChannelId::new(data.config.admin_log_channel_id)
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content(ADMIN_LOG_NEW_CANDIDATE_TEXT)
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new_link(channel_url(
                        reception.guild_id,
                        reception.channel_id,
                    ))
                    .label("Відкрити Приймальню"),
                ])]),
        )
        .await?;

    Ok(())
}

/// Close the reception record of a candidate who reached the main guild.
pub async fn handle_main_guild_candidate(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) {
    if member.guild_id.get() != data.config.main_guild_id || member.user.bot {
        return;
    }

    let user_id = member.user.id;
    let candidate = match get_candidate_in_any_guild(&data.db, user_id.get()).await {
        Ok(Some(candidate)) if candidate.status.awaits_main_join() => candidate,
        Ok(_) => return,
        Err(source) => {
            error!(?source, user_id = user_id.get(), "failed to look up candidate");
            return;
        }
    };

    let reception_guild_id = candidate.reception_guild_id;
    if let Err(source) = update_candidate_status(
        &data.db,
        user_id.get(),
        reception_guild_id,
        CandidateStatus::Accepted,
        None,
        None,
    )
    .await
    {
        error!(?source, user_id = user_id.get(), "failed to mark candidate accepted");
        return;
    }

    if let Err(source) =
        cancel_pending_tasks(&data.db, TASK_INVITE_REVIEW_DUE, reception_guild_id, user_id.get())
            .await
    {
        error!(?source, user_id = user_id.get(), "failed to cancel review tasks");
    }

    info!(user_id = user_id.get(), "candidate joined the main guild");

    if let Err(source) = serenity::GuildId::new(reception_guild_id)
        .kick_with_reason(&ctx.http, user_id, "Прийнятий до клану")
        .await
    {
        warn!(?source, user_id = user_id.get(), "failed to remove member from reception");
    }
}

/// Handle a press on one of the candidate review buttons.
pub async fn handle_review_interaction(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) {
    let Some((action, candidate_id)) = parse_review_action(&interaction.data.custom_id) else {
        return;
    };

    if let Err(source) = review_candidate(ctx, data, interaction, action, candidate_id).await {
        error!(?source, candidate_id, ?action, "candidate review failed");
    }
}

async fn review_candidate(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
    action: ReviewAction,
    candidate_id: u64,
) -> anyhow::Result<()> {
    let Some(reception) = data.config.reception else {
        interaction.defer(&ctx.http).await?;
        return Ok(());
    };

    if interaction.channel_id.get() != reception.channel_id {
        interaction.defer(&ctx.http).await?;
        return Ok(());
    }

    let admin_id = interaction.user.id.get();
    if get_admin_level(&data.db, admin_id).await? < MIN_REVIEW_LEVEL {
        respond_privately(ctx, interaction, ADMINS_ONLY_TEXT).await?;
        return Ok(());
    }

    let candidate = get_candidate(&data.db, candidate_id, reception.guild_id).await?;
    if !candidate.is_some_and(|candidate| candidate.status == CandidateStatus::Candidate) {
        respond_privately(ctx, interaction, NOT_A_CANDIDATE_TEXT).await?;
        return Ok(());
    }

    info!(candidate_id, admin_id, ?action, "candidate review decision");

    match action {
        ReviewAction::Accept => accept(ctx, data, interaction, reception, candidate_id).await,
        ReviewAction::Wait => wait(ctx, data, interaction, reception, candidate_id).await,
        ReviewAction::Reject => reject(ctx, data, interaction, reception, candidate_id).await,
    }
}

async fn accept(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
    reception: ReceptionConfig,
    candidate_id: u64,
) -> anyhow::Result<()> {
    let config = &data.config;
    let admin_id = interaction.user.id.get();

    if !claim_candidate_decision(
        &data.db,
        candidate_id,
        reception.guild_id,
        CandidateStatus::Invited,
        admin_id,
    )
    .await?
    {
        respond_privately(ctx, interaction, NOT_A_CANDIDATE_TEXT).await?;
        return Ok(());
    }

    let invite = match serenity::ChannelId::new(config.main_channel_id)
        .create_invite(
            &ctx.http,
            serenity::CreateInvite::new()
                .max_age(INVITE_LIFETIME_SECS)
                .max_uses(1)
                .unique(true),
        )
        .await
    {
        Ok(invite) => invite,
        Err(source) => {
            warn!(
                ?source,
                missing_permissions = is_missing_permissions(&source),
                "failed to create main guild invite"
            );
            reopen_candidate(data, reception, candidate_id).await?;
            respond_publicly(
                ctx,
                interaction,
                "Не маю права створити запрошення в основний канал. Допоможіть!",
            )
            .await?;
            return Ok(());
        }
    };
    let invite_url = invite.url();

    update_candidate_status(
        &data.db,
        candidate_id,
        reception.guild_id,
        CandidateStatus::Invited,
        Some(admin_id),
        Some(&invite_url),
    )
    .await?;

    let admin_mention = user_mention(admin_id);
    update_buttons_message(
        ctx,
        interaction,
        &format!(
            "Кандидат офіційно стає учасником клану! Адміністратор {} прийняв кандидата. Посилання готове!",
            admin_mention
        ),
    )
    .await?;

    interaction
        .channel_id
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content(format!(
                    "{}, ось твоє посилання на наш офіційний сервер.",
                    user_mention(candidate_id)
                ))
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new_link(&invite_url).label("Посилання на сервер"),
                ])]),
        )
        .await?;

    post_admin_log(
        ctx,
        config.admin_log_channel_id,
        format!(
            "Адміністратор {} прийняв в клан {}",
            admin_mention,
            user_mention(candidate_id)
        ),
    )
    .await;

    Ok(())
}

async fn wait(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
    reception: ReceptionConfig,
    candidate_id: u64,
) -> anyhow::Result<()> {
    let review_due_at = now_unix_secs() + WAIT_DELAY_SECS;

    postpone_candidate_review(&data.db, candidate_id, reception.guild_id, review_due_at).await?;
    reschedule_review(&data.db, reception.guild_id, candidate_id, review_due_at).await?;

    update_buttons_message(ctx, interaction, WAIT_DONE_TEXT).await
}

async fn reject(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
    reception: ReceptionConfig,
    candidate_id: u64,
) -> anyhow::Result<()> {
    let admin_id = interaction.user.id.get();

    if !claim_candidate_decision(
        &data.db,
        candidate_id,
        reception.guild_id,
        CandidateStatus::Kicked,
        admin_id,
    )
    .await?
    {
        respond_privately(ctx, interaction, NOT_A_CANDIDATE_TEXT).await?;
        return Ok(());
    }

    if let Err(source) = serenity::GuildId::new(reception.guild_id)
        .ban_with_reason(
            &ctx.http,
            serenity::UserId::new(candidate_id),
            0,
            "Відмова кандидату",
        )
        .await
    {
        warn!(
            ?source,
            missing_permissions = is_missing_permissions(&source),
            candidate_id,
            "failed to ban rejected candidate"
        );
        reopen_candidate(data, reception, candidate_id).await?;
        respond_publicly(
            ctx,
            interaction,
            "Не можу банити людей. Виправіть додатковими дозволами",
        )
        .await?;
        return Ok(());
    }

    cancel_pending_tasks(&data.db, TASK_INVITE_REVIEW_DUE, reception.guild_id, candidate_id)
        .await?;

    post_admin_log(
        ctx,
        data.config.admin_log_channel_id,
        format!(
            "Адміністратор {} відмовив кандидату та вигнав користувача {}",
            user_mention(admin_id),
            candidate_id
        ),
    )
    .await;

    interaction.defer(&ctx.http).await?;
    if let Err(source) = interaction.message.delete(&ctx.http).await {
        warn!(?source, "failed to delete review buttons; clearing them instead");
        interaction
            .edit_response(
                &ctx.http,
                serenity::EditInteractionResponse::new().components(Vec::new()),
            )
            .await?;
    }

    Ok(())
}

/// Undo a claimed decision whose platform action failed, so the buttons work again.
async fn reopen_candidate(
    data: &Data,
    reception: ReceptionConfig,
    candidate_id: u64,
) -> anyhow::Result<()> {
    update_candidate_status(
        &data.db,
        candidate_id,
        reception.guild_id,
        CandidateStatus::Candidate,
        None,
        None,
    )
    .await
}

async fn update_buttons_message(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    text: &str,
) -> anyhow::Result<()> {
    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(text)
                    .components(Vec::new())
                    .allowed_mentions(serenity::CreateAllowedMentions::new()),
            ),
        )
        .await?;

    Ok(())
}

async fn respond_privately(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    text: &str,
) -> anyhow::Result<()> {
    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(text)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

async fn respond_publicly(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    text: &str,
) -> anyhow::Result<()> {
    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new().content(text),
            ),
        )
        .await?;

    Ok(())
}

async fn post_admin_log(ctx: &serenity::Context, channel_id: u64, text: String) {
    if let Err(source) = serenity::ChannelId::new(channel_id)
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content(text)
                .allowed_mentions(serenity::CreateAllowedMentions::new()),
        )
        .await
    {
        error!(?source, "failed to post to admin log");
    }
}
