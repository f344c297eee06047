use anyhow::Context as _;

use super::now_unix_secs;
use crate::database::Database;
use crate::model::tasks::ScheduledTask;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    task_type: String,
    run_at: i64,
    guild_id: Option<i64>,
    user_id: Option<i64>,
}

impl TryFrom<TaskRow> for ScheduledTask {
    type Error = anyhow::Error;

    fn try_from(row: TaskRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: row.id,
            task_type: row.task_type,
            run_at: u64::try_from(row.run_at).context("run_at row out of u64 range")?,
            guild_id: row
                .guild_id
                .map(u64::try_from)
                .transpose()
                .context("guild_id row out of u64 range")?,
            user_id: row
                .user_id
                .map(u64::try_from)
                .transpose()
                .context("user_id row out of u64 range")?,
        })
    }
}

pub async fn schedule_task(
    db: &Database,
    task_type: &str,
    run_at: u64,
    guild_id: Option<u64>,
    user_id: Option<u64>,
) -> anyhow::Result<i64> {
    let run_at_i64 = i64::try_from(run_at).context("run_at out of i64 range")?;
    let guild_id_i64 = guild_id
        .map(i64::try_from)
        .transpose()
        .context("guild_id out of i64 range")?;
    let user_id_i64 = user_id
        .map(i64::try_from)
        .transpose()
        .context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO scheduled_tasks (task_type, run_at, guild_id, user_id, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, 'pending', $5, $5)
         RETURNING id",
    )
    .bind(task_type)
    .bind(run_at_i64)
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(now_i64)
    .fetch_one(db.pool())
    .await?;

    Ok(id)
}

/// Drop pending tasks of one type for a user in a guild. Returns how many were removed.
pub async fn cancel_pending_tasks(
    db: &Database,
    task_type: &str,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let result = sqlx::query(
        "DELETE FROM scheduled_tasks
         WHERE task_type = $1 AND guild_id = $2 AND user_id = $3 AND status = 'pending'",
    )
    .bind(task_type)
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected())
}

/// Pending tasks due at `now`, oldest first.
pub async fn fetch_due_tasks(
    db: &Database,
    now: u64,
    limit: i64,
) -> anyhow::Result<Vec<ScheduledTask>> {
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    let rows: Vec<TaskRow> = sqlx::query_as(
        "SELECT id, task_type, run_at, guild_id, user_id
         FROM scheduled_tasks
         WHERE status = 'pending' AND run_at <= $1
         ORDER BY run_at ASC, id ASC
         LIMIT $2",
    )
    .bind(now_i64)
    .bind(limit)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(ScheduledTask::try_from).collect()
}

/// Claim a pending task. Returns `false` when another poller claimed it first.
pub async fn mark_task_running(db: &Database, task_id: i64) -> anyhow::Result<bool> {
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let claimed: Option<i64> = sqlx::query_scalar(
        "UPDATE scheduled_tasks SET status = 'running', updated_at = $2
         WHERE id = $1 AND status = 'pending'
         RETURNING id",
    )
    .bind(task_id)
    .bind(now_i64)
    .fetch_optional(db.pool())
    .await?;

    Ok(claimed.is_some())
}

pub async fn mark_task_done(db: &Database, task_id: i64) -> anyhow::Result<()> {
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "UPDATE scheduled_tasks SET status = 'done', last_error = NULL, updated_at = $2
         WHERE id = $1",
    )
    .bind(task_id)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn mark_task_failed(db: &Database, task_id: i64, error: &str) -> anyhow::Result<()> {
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "UPDATE scheduled_tasks SET status = 'failed', last_error = $2, updated_at = $3
         WHERE id = $1",
    )
    .bind(task_id)
    .bind(error)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}
