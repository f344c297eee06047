use anyhow::Context as _;

use super::now_unix_secs;
use crate::cache::{CONFIG_CACHE_TTL, admin_level_key, invalidate_admin_level};
use crate::database::Database;
use crate::model::admins::AdminEntry;

#[derive(sqlx::FromRow)]
struct AdminRow {
    user_id: i64,
    display_name: String,
    username: String,
    level: i32,
}

/// Insert the user as a level 1 admin, or refresh the profile of an existing one.
///
/// An existing admin keeps their level.
pub async fn add_admin(
    db: &Database,
    user_id: u64,
    display_name: &str,
    username: &str,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "INSERT INTO admins (user_id, display_name, username, level, created_at, updated_at)
         VALUES ($1, $2, $3, 1, $4, $4)
         ON CONFLICT (user_id) DO UPDATE SET
            display_name = EXCLUDED.display_name,
            username = EXCLUDED.username,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(user_id_i64)
    .bind(display_name)
    .bind(username)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    invalidate_admin_level(db.cache(), user_id).await;

    Ok(())
}

/// Returns `false` when the user is not an admin.
pub async fn set_admin_level(db: &Database, user_id: u64, level: i32) -> anyhow::Result<bool> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let result = sqlx::query("UPDATE admins SET level = $2, updated_at = $3 WHERE user_id = $1")
        .bind(user_id_i64)
        .bind(level)
        .bind(now_i64)
        .execute(db.pool())
        .await?;

    invalidate_admin_level(db.cache(), user_id).await;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_admin(db: &Database, user_id: u64) -> anyhow::Result<bool> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let result = sqlx::query("DELETE FROM admins WHERE user_id = $1")
        .bind(user_id_i64)
        .execute(db.pool())
        .await?;

    invalidate_admin_level(db.cache(), user_id).await;

    Ok(result.rows_affected() > 0)
}

/// Admin tier of the user, `0` for non-admins.
pub async fn get_admin_level(db: &Database, user_id: u64) -> anyhow::Result<i32> {
    let cache_key = admin_level_key(db.cache(), user_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

            let level: Option<i32> =
                sqlx::query_scalar("SELECT level FROM admins WHERE user_id = $1")
                    .bind(user_id_i64)
                    .fetch_optional(db.pool())
                    .await?;

            Ok(level.unwrap_or(0))
        })
        .await
}

/// All admins, highest level first.
pub async fn list_admins(db: &Database) -> anyhow::Result<Vec<AdminEntry>> {
    let rows: Vec<AdminRow> = sqlx::query_as(
        "SELECT user_id, display_name, username, level
         FROM admins
         ORDER BY level DESC, user_id ASC",
    )
    .fetch_all(db.pool())
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(AdminEntry {
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            display_name: row.display_name,
            username: row.username,
            level: row.level,
        });
    }

    Ok(entries)
}

/// Refresh the stored name of an existing admin. Returns `false` for non-admins.
pub async fn update_admin_profile(
    db: &Database,
    user_id: u64,
    display_name: &str,
    username: &str,
) -> anyhow::Result<bool> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let result = sqlx::query(
        "UPDATE admins SET display_name = $2, username = $3, updated_at = $4 WHERE user_id = $1",
    )
    .bind(user_id_i64)
    .bind(display_name)
    .bind(username)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}
