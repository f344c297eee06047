use poise::serenity_prelude as serenity;

use foxy_core::{Context, Error};
use foxy_database::impls::admins::get_admin_level;
use foxy_database::impls::candidates::get_candidate;
use foxy_database::impls::tasks::cancel_pending_tasks;
use foxy_database::model::candidates::CandidateStatus;
use foxy_database::model::tasks::TASK_INVITE_REVIEW_DUE;

use crate::access::{acknowledge_slash, resolve_target};
use crate::invite::review::{
    ADMINS_ONLY_TEXT, MIN_REVIEW_LEVEL, NOT_A_CANDIDATE_TEXT, show_candidate_buttons,
};
use crate::{CommandMeta, CommandScope};

pub const META: CommandMeta = CommandMeta {
    name: "candidate",
    desc: "Показати кнопки рішення для кандидата (Приймальня)",
    category: "invite",
    usage: "!candidate <користувач | відповідь>",
    min_level: 2,
    scope: CommandScope::Group,
};

#[poise::command(prefix_command, slash_command, category = "Invite")]
pub async fn candidate(
    ctx: Context<'_>,
    #[description = "Кандидат"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(reception) = ctx
        .data()
        .config
        .reception
        .filter(|reception| ctx.channel_id().get() == reception.channel_id)
    else {
        acknowledge_slash(ctx, "Команда працює лише в каналі Приймальні.").await?;
        return Ok(());
    };

    let db = &ctx.data().db;
    if get_admin_level(db, ctx.author().id.get()).await? < MIN_REVIEW_LEVEL {
        ctx.say(ADMINS_ONLY_TEXT).await?;
        return Ok(());
    }

    let Some(target) = resolve_target(ctx, user) else {
        ctx.say("Надішліть команду у відповідь на повідомлення кандидата або вкажіть його")
            .await?;
        return Ok(());
    };

    let Some(candidate) = get_candidate(db, target.id.get(), reception.guild_id).await? else {
        ctx.say("Використайте цю команду на кандидата, а не простого перехожого")
            .await?;
        return Ok(());
    };

    if candidate.status != CandidateStatus::Candidate {
        ctx.say(NOT_A_CANDIDATE_TEXT).await?;
        return Ok(());
    }

    show_candidate_buttons(
        ctx.http(),
        db,
        ctx.channel_id(),
        reception.guild_id,
        target.id.get(),
    )
    .await?;
    cancel_pending_tasks(db, TASK_INVITE_REVIEW_DUE, reception.guild_id, target.id.get()).await?;

    if let poise::Context::Application(_) = ctx {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content("Кнопки рішення показано."),
        )
        .await?;
    }

    Ok(())
}
