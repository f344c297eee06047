//! Polls `scheduled_tasks` and runs the ones that are due.

use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use foxy_commands::invite::review::{LEFT_RECEPTION_TEXT, show_candidate_buttons};
use foxy_core::Data;
use foxy_database::impls::candidates::get_candidate;
use foxy_database::impls::tasks::{
    fetch_due_tasks, mark_task_done, mark_task_failed, mark_task_running,
};
use foxy_database::model::candidates::CandidateStatus;
use foxy_database::model::tasks::{ScheduledTask, TASK_INVITE_REVIEW_DUE};
use foxy_utils::permissions::is_unknown_member;
use foxy_utils::time::now_unix_secs;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const BATCH_LIMIT: i64 = 30;

pub async fn run_db_scheduler(http: Arc<serenity::Http>, data: Data) {
    info!(interval_secs = POLL_INTERVAL.as_secs(), "task scheduler started");

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let tasks = match fetch_due_tasks(&data.db, now_unix_secs(), BATCH_LIMIT).await {
            Ok(tasks) => tasks,
            Err(source) => {
                error!(?source, "failed to fetch due tasks");
                continue;
            }
        };

        for task in tasks {
            match mark_task_running(&data.db, task.id).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(task_id = task.id, "task already claimed");
                    continue;
                }
                Err(source) => {
                    error!(?source, task_id = task.id, "failed to claim task");
                    continue;
                }
            }

            let outcome = run_task(&http, &data, &task).await;
            let stored = match &outcome {
                Ok(()) => mark_task_done(&data.db, task.id).await,
                Err(source) => {
                    warn!(?source, task_id = task.id, task_type = %task.task_type, "task failed");
                    mark_task_failed(&data.db, task.id, &format!("{source:#}")).await
                }
            };

            if let Err(source) = stored {
                error!(?source, task_id = task.id, "failed to store task result");
            }
        }
    }
}

async fn run_task(
    http: &serenity::Http,
    data: &Data,
    task: &ScheduledTask,
) -> anyhow::Result<()> {
    match task.task_type.as_str() {
        TASK_INVITE_REVIEW_DUE => run_invite_review(http, data, task).await,
        other => {
            warn!(task_id = task.id, task_type = other, "unknown task type");
            Ok(())
        }
    }
}

async fn run_invite_review(
    http: &serenity::Http,
    data: &Data,
    task: &ScheduledTask,
) -> anyhow::Result<()> {
    let Some(reception) = data.config.reception else {
        return Ok(());
    };
    let (Some(guild_id), Some(user_id)) = (task.guild_id, task.user_id) else {
        anyhow::bail!("review task without guild or user");
    };
    if guild_id != reception.guild_id {
        return Ok(());
    }

    let candidate = get_candidate(&data.db, user_id, guild_id).await?;
    if !candidate.is_some_and(|candidate| candidate.status == CandidateStatus::Candidate) {
        debug!(user_id, "review task for a settled candidate");
        return Ok(());
    }

    let channel_id = serenity::ChannelId::new(reception.channel_id);
    match serenity::GuildId::new(guild_id)
        .member(http, serenity::UserId::new(user_id))
        .await
    {
        Ok(_) => {
            show_candidate_buttons(http, &data.db, channel_id, guild_id, user_id).await?;
        }
        Err(source) if is_unknown_member(&source) => {
            info!(user_id, "candidate left the reception before review");
            channel_id.say(http, LEFT_RECEPTION_TEXT).await?;
        }
        Err(source) => return Err(source.into()),
    }

    Ok(())
}
