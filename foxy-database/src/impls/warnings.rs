use anyhow::Context as _;

use crate::{database::Database, model::warnings::WarningRecord};

/// Warnings stop counting thirty days after they were issued.
pub const WARN_EXPIRY_DAYS: u64 = 30;

const WARNING_COLUMNS: &str = "id, guild_id, user_id, reason, issued_at, expires_at, issued_by, \
     issued_by_level, is_revoked, revoked_at, revoked_by";

#[derive(sqlx::FromRow)]
struct WarningRow {
    id: i64,
    guild_id: i64,
    user_id: i64,
    reason: String,
    issued_at: i64,
    expires_at: i64,
    issued_by: i64,
    issued_by_level: i32,
    is_revoked: bool,
    revoked_at: Option<i64>,
    revoked_by: Option<i64>,
}

impl TryFrom<WarningRow> for WarningRecord {
    type Error = anyhow::Error;

    fn try_from(row: WarningRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: row.id,
            guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            reason: row.reason,
            issued_at: u64::try_from(row.issued_at).context("issued_at row out of u64 range")?,
            expires_at: u64::try_from(row.expires_at)
                .context("expires_at row out of u64 range")?,
            issued_by: u64::try_from(row.issued_by).context("issued_by row out of u64 range")?,
            issued_by_level: row.issued_by_level,
            is_revoked: row.is_revoked,
            revoked_at: row
                .revoked_at
                .map(u64::try_from)
                .transpose()
                .context("revoked_at row out of u64 range")?,
            revoked_by: row
                .revoked_by
                .map(u64::try_from)
                .transpose()
                .context("revoked_by row out of u64 range")?,
        })
    }
}

pub struct NewWarning<'a> {
    pub guild_id: u64,
    pub user_id: u64,
    pub reason: &'a str,
    pub issued_by: u64,
    pub issued_by_level: i32,
    pub issued_at: u64,
}

/// Expiry timestamp for a warning issued at `issued_at`.
pub fn expiry_for(issued_at: u64) -> u64 {
    issued_at.saturating_add(WARN_EXPIRY_DAYS * 86_400)
}

/// Record a warning and return it together with the user's active warning count.
///
/// Insert and count share one transaction, serialised per user, so the count
/// always includes the new warning.
pub async fn create_warning(
    db: &Database,
    new_warning: NewWarning<'_>,
) -> anyhow::Result<(WarningRecord, i64)> {
    let guild_id_i64 = i64::try_from(new_warning.guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(new_warning.user_id).context("user_id out of i64 range")?;
    let issued_by_i64 =
        i64::try_from(new_warning.issued_by).context("issued_by out of i64 range")?;
    let issued_at_i64 =
        i64::try_from(new_warning.issued_at).context("issued_at out of i64 range")?;
    let expires_at_i64 = i64::try_from(expiry_for(new_warning.issued_at))
        .context("expires_at out of i64 range")?;

    let mut tx = db.pool().begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(user_id_i64)
        .execute(&mut *tx)
        .await?;

    let row: WarningRow = sqlx::query_as(&format!(
        "INSERT INTO warnings (
            guild_id, user_id, reason, issued_at, expires_at, issued_by, issued_by_level,
            is_revoked, revoked_at, revoked_by
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NULL, NULL)
        RETURNING {WARNING_COLUMNS}"
    ))
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(new_warning.reason)
    .bind(issued_at_i64)
    .bind(expires_at_i64)
    .bind(issued_by_i64)
    .bind(new_warning.issued_by_level)
    .fetch_one(&mut *tx)
    .await?;

    let active_count = count_active_with(&mut *tx, user_id_i64, issued_at_i64).await?;

    tx.commit().await?;

    Ok((WarningRecord::try_from(row)?, active_count))
}

/// Count warnings that are neither revoked nor expired at `now`.
pub async fn count_active_warnings(db: &Database, user_id: u64, now: u64) -> anyhow::Result<i64> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    count_active_with(db.pool(), user_id_i64, now_i64).await
}

async fn count_active_with<'e, E>(executor: E, user_id: i64, now: i64) -> anyhow::Result<i64>
where
    E: sqlx::PgExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM warnings
         WHERE user_id = $1 AND is_revoked = FALSE AND expires_at > $2",
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Active warnings, newest first.
pub async fn list_active_warnings(
    db: &Database,
    user_id: u64,
    now: u64,
) -> anyhow::Result<Vec<WarningRecord>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    let rows: Vec<WarningRow> = sqlx::query_as(&format!(
        "SELECT {WARNING_COLUMNS}
         FROM warnings
         WHERE user_id = $1 AND is_revoked = FALSE AND expires_at > $2
         ORDER BY issued_at DESC, id DESC"
    ))
    .bind(user_id_i64)
    .bind(now_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(WarningRecord::try_from).collect()
}

/// Every warning ever issued to the user, newest first.
pub async fn list_warning_history(
    db: &Database,
    user_id: u64,
) -> anyhow::Result<Vec<WarningRecord>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let rows: Vec<WarningRow> = sqlx::query_as(&format!(
        "SELECT {WARNING_COLUMNS}
         FROM warnings
         WHERE user_id = $1
         ORDER BY issued_at DESC, id DESC"
    ))
    .bind(user_id_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(WarningRecord::try_from).collect()
}

/// Revoke the newest active warning and return it with the remaining active count.
///
/// Warnings are marked revoked rather than deleted so the history stays intact.
pub async fn revoke_latest_warning(
    db: &Database,
    user_id: u64,
    revoked_by: u64,
    now: u64,
) -> anyhow::Result<(Option<WarningRecord>, i64)> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let revoked_by_i64 = i64::try_from(revoked_by).context("revoked_by out of i64 range")?;
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    let mut tx = db.pool().begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(user_id_i64)
        .execute(&mut *tx)
        .await?;

    let revoked: Option<WarningRow> = sqlx::query_as(&format!(
        "UPDATE warnings
         SET is_revoked = TRUE, revoked_at = $3, revoked_by = $2
         WHERE id = (
            SELECT id FROM warnings
            WHERE user_id = $1 AND is_revoked = FALSE AND expires_at > $3
            ORDER BY issued_at DESC, id DESC
            LIMIT 1
         )
         RETURNING {WARNING_COLUMNS}"
    ))
    .bind(user_id_i64)
    .bind(revoked_by_i64)
    .bind(now_i64)
    .fetch_optional(&mut *tx)
    .await?;

    let active_count = count_active_with(&mut *tx, user_id_i64, now_i64).await?;

    tx.commit().await?;

    Ok((revoked.map(WarningRecord::try_from).transpose()?, active_count))
}

#[cfg(test)]
mod tests {
    use super::{WARN_EXPIRY_DAYS, expiry_for};

    #[test]
    fn warnings_expire_after_thirty_days() {
        assert_eq!(WARN_EXPIRY_DAYS, 30);
        assert_eq!(expiry_for(1_000), 1_000 + 30 * 86_400);
        assert_eq!(expiry_for(u64::MAX), u64::MAX);
    }
}
