use anyhow::{Context as _, anyhow};

use super::now_unix_secs;
use crate::database::Database;
use crate::model::candidates::{Candidate, CandidateStatus};

const CANDIDATE_COLUMNS: &str =
    "user_id, reception_guild_id, status, joined_at, review_due_at, buttons_message_id, invite_link";

#[derive(sqlx::FromRow)]
struct CandidateRow {
    user_id: i64,
    reception_guild_id: i64,
    status: String,
    joined_at: i64,
    review_due_at: i64,
    buttons_message_id: Option<i64>,
    invite_link: Option<String>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = anyhow::Error;

    fn try_from(row: CandidateRow) -> anyhow::Result<Self> {
        Ok(Self {
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            reception_guild_id: u64::try_from(row.reception_guild_id)
                .context("reception_guild_id row out of u64 range")?,
            status: CandidateStatus::parse(&row.status)
                .ok_or_else(|| anyhow!("unknown candidate status `{}`", row.status))?,
            joined_at: u64::try_from(row.joined_at).context("joined_at row out of u64 range")?,
            review_due_at: u64::try_from(row.review_due_at)
                .context("review_due_at row out of u64 range")?,
            buttons_message_id: row
                .buttons_message_id
                .map(u64::try_from)
                .transpose()
                .context("buttons_message_id row out of u64 range")?,
            invite_link: row.invite_link,
        })
    }
}

/// Register a (re)joining reception member as a fresh candidate.
///
/// Rejoining resets the status, review time and any previous decision.
pub async fn upsert_candidate_on_join(
    db: &Database,
    user_id: u64,
    reception_guild_id: u64,
    joined_at: u64,
    review_due_at: u64,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let guild_id_i64 =
        i64::try_from(reception_guild_id).context("reception_guild_id out of i64 range")?;
    let joined_at_i64 = i64::try_from(joined_at).context("joined_at out of i64 range")?;
    let review_due_at_i64 =
        i64::try_from(review_due_at).context("review_due_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO candidates (
            user_id, reception_guild_id, status, joined_at, review_due_at,
            buttons_message_id, reviewed_by, reviewed_at, invite_link, updated_at
        ) VALUES ($1, $2, $3, $4, $5, NULL, NULL, NULL, NULL, $4)
        ON CONFLICT (user_id, reception_guild_id) DO UPDATE SET
            status = EXCLUDED.status,
            joined_at = EXCLUDED.joined_at,
            review_due_at = EXCLUDED.review_due_at,
            buttons_message_id = NULL,
            reviewed_by = NULL,
            reviewed_at = NULL,
            invite_link = NULL,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(user_id_i64)
    .bind(guild_id_i64)
    .bind(CandidateStatus::Candidate.as_str())
    .bind(joined_at_i64)
    .bind(review_due_at_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn get_candidate(
    db: &Database,
    user_id: u64,
    reception_guild_id: u64,
) -> anyhow::Result<Option<Candidate>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let guild_id_i64 =
        i64::try_from(reception_guild_id).context("reception_guild_id out of i64 range")?;

    let row: Option<CandidateRow> = sqlx::query_as(&format!(
        "SELECT {CANDIDATE_COLUMNS}
         FROM candidates
         WHERE user_id = $1 AND reception_guild_id = $2"
    ))
    .bind(user_id_i64)
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?;

    row.map(Candidate::try_from).transpose()
}

/// Most recently updated candidate record of the user across reception guilds.
pub async fn get_candidate_in_any_guild(
    db: &Database,
    user_id: u64,
) -> anyhow::Result<Option<Candidate>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let row: Option<CandidateRow> = sqlx::query_as(&format!(
        "SELECT {CANDIDATE_COLUMNS}
         FROM candidates
         WHERE user_id = $1
         ORDER BY updated_at DESC
         LIMIT 1"
    ))
    .bind(user_id_i64)
    .fetch_optional(db.pool())
    .await?;

    row.map(Candidate::try_from).transpose()
}

/// Move the candidate to `status`, recording who decided and the invite when given.
pub async fn update_candidate_status(
    db: &Database,
    user_id: u64,
    reception_guild_id: u64,
    status: CandidateStatus,
    reviewed_by: Option<u64>,
    invite_link: Option<&str>,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let guild_id_i64 =
        i64::try_from(reception_guild_id).context("reception_guild_id out of i64 range")?;
    let reviewed_by_i64 = reviewed_by
        .map(i64::try_from)
        .transpose()
        .context("reviewed_by out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "UPDATE candidates SET
            status = $3,
            reviewed_by = COALESCE($4, reviewed_by),
            reviewed_at = CASE WHEN $4 IS NULL THEN reviewed_at ELSE $6 END,
            invite_link = COALESCE($5, invite_link),
            updated_at = $6
         WHERE user_id = $1 AND reception_guild_id = $2",
    )
    .bind(user_id_i64)
    .bind(guild_id_i64)
    .bind(status.as_str())
    .bind(reviewed_by_i64)
    .bind(invite_link)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

const CLAIM_DECISION_SQL: &str = "UPDATE candidates SET
        status = $3,
        reviewed_by = $4,
        reviewed_at = $5,
        updated_at = $5
     WHERE user_id = $1 AND reception_guild_id = $2 AND status = 'candidate'
     RETURNING user_id";

/// Move a pending candidate to `decision`. Returns `false` when someone already decided.
pub async fn claim_candidate_decision(
    db: &Database,
    user_id: u64,
    reception_guild_id: u64,
    decision: CandidateStatus,
    reviewed_by: u64,
) -> anyhow::Result<bool> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let guild_id_i64 =
        i64::try_from(reception_guild_id).context("reception_guild_id out of i64 range")?;
    let reviewed_by_i64 = i64::try_from(reviewed_by).context("reviewed_by out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let claimed: Option<i64> = sqlx::query_scalar(CLAIM_DECISION_SQL)
        .bind(user_id_i64)
        .bind(guild_id_i64)
        .bind(decision.as_str())
        .bind(reviewed_by_i64)
        .bind(now_i64)
        .fetch_optional(db.pool())
        .await?;

    Ok(claimed.is_some())
}

pub async fn postpone_candidate_review(
    db: &Database,
    user_id: u64,
    reception_guild_id: u64,
    review_due_at: u64,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let guild_id_i64 =
        i64::try_from(reception_guild_id).context("reception_guild_id out of i64 range")?;
    let review_due_at_i64 =
        i64::try_from(review_due_at).context("review_due_at out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "UPDATE candidates SET review_due_at = $3, buttons_message_id = NULL, updated_at = $4
         WHERE user_id = $1 AND reception_guild_id = $2",
    )
    .bind(user_id_i64)
    .bind(guild_id_i64)
    .bind(review_due_at_i64)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn set_candidate_buttons_message(
    db: &Database,
    user_id: u64,
    reception_guild_id: u64,
    message_id: u64,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let guild_id_i64 =
        i64::try_from(reception_guild_id).context("reception_guild_id out of i64 range")?;
    let message_id_i64 = i64::try_from(message_id).context("message_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "UPDATE candidates SET buttons_message_id = $3, updated_at = $4
         WHERE user_id = $1 AND reception_guild_id = $2",
    )
    .bind(user_id_i64)
    .bind(guild_id_i64)
    .bind(message_id_i64)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CLAIM_DECISION_SQL;
    use crate::model::candidates::CandidateStatus;

    #[test]
    fn decisions_only_claim_pending_candidates() {
        let guard = format!("status = '{}'", CandidateStatus::Candidate.as_str());
        assert!(CLAIM_DECISION_SQL.contains(&guard));
        assert!(CLAIM_DECISION_SQL.contains("RETURNING"));
    }
}
