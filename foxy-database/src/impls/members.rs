use anyhow::Context as _;

use super::now_unix_secs;
use crate::database::Database;
use crate::model::members::CallMember;

#[derive(sqlx::FromRow)]
struct CallMemberRow {
    user_id: i64,
    display_name: Option<String>,
    last_seen: i64,
}

/// Remember a guild member who recently spoke, re-enabling them if needed.
pub async fn upsert_call_member(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    username: &str,
    display_name: Option<&str>,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "INSERT INTO call_members (guild_id, user_id, username, display_name, is_enabled, last_seen)
         VALUES ($1, $2, $3, $4, TRUE, $5)
         ON CONFLICT (guild_id, user_id) DO UPDATE SET
            username = EXCLUDED.username,
            display_name = EXCLUDED.display_name,
            is_enabled = TRUE,
            last_seen = EXCLUDED.last_seen",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(username)
    .bind(display_name)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Enabled call members of a guild, most recently seen first.
pub async fn list_call_members(
    db: &Database,
    guild_id: u64,
    limit: i64,
) -> anyhow::Result<Vec<CallMember>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let rows: Vec<CallMemberRow> = sqlx::query_as(
        "SELECT user_id, display_name, last_seen
         FROM call_members
         WHERE guild_id = $1 AND is_enabled = TRUE
         ORDER BY last_seen DESC
         LIMIT $2",
    )
    .bind(guild_id_i64)
    .bind(limit)
    .fetch_all(db.pool())
    .await?;

    let mut members = Vec::with_capacity(rows.len());
    for row in rows {
        members.push(CallMember {
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            display_name: row.display_name,
            last_seen: u64::try_from(row.last_seen).context("last_seen row out of u64 range")?,
        });
    }

    Ok(members)
}

/// Record the first time a user joined the clan. Returns `true` on the first join.
pub async fn ensure_clan_member(db: &Database, user_id: u64) -> anyhow::Result<bool> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let result = sqlx::query(
        "INSERT INTO clan_members (user_id, first_joined_at)
         VALUES ($1, $2)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id_i64)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}
