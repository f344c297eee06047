use anyhow::Context as _;

use crate::database::Database;

/// Stored prediction of the user for `day`, if one was already drawn.
pub async fn get_daily_prediction(
    db: &Database,
    user_id: u64,
    day: &str,
) -> anyhow::Result<Option<String>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let prediction: Option<String> = sqlx::query_scalar(
        "SELECT prediction FROM daily_predictions WHERE user_id = $1 AND day = $2",
    )
    .bind(user_id_i64)
    .bind(day)
    .fetch_optional(db.pool())
    .await?;

    Ok(prediction)
}

/// Replace the user's prediction; only the latest day is kept.
pub async fn store_daily_prediction(
    db: &Database,
    user_id: u64,
    day: &str,
    prediction: &str,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO daily_predictions (user_id, day, prediction)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id) DO UPDATE SET
            day = EXCLUDED.day,
            prediction = EXCLUDED.prediction",
    )
    .bind(user_id_i64)
    .bind(day)
    .bind(prediction)
    .execute(db.pool())
    .await?;

    Ok(())
}
