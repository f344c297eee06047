use anyhow::Context as _;

use super::now_unix_secs;
use crate::cache::{CONFIG_CACHE_TTL, chat_setting_key, invalidate_chat_setting};
use crate::database::Database;

pub const SILENCE_ENABLED_KEY: &str = "silence_enabled";
pub const SILENCE_LAST_DATE_KEY: &str = "silence_last_date";
pub const WELCOME_TEMPLATE_KEY: &str = "welcome_template";

pub async fn get_chat_setting(
    db: &Database,
    scope_id: u64,
    key: &str,
) -> anyhow::Result<Option<String>> {
    let cache_key = chat_setting_key(db.cache(), scope_id, key);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let scope_id_i64 = i64::try_from(scope_id).context("scope_id out of i64 range")?;

            let value: Option<String> = sqlx::query_scalar(
                "SELECT value FROM chat_settings WHERE scope_id = $1 AND key = $2",
            )
            .bind(scope_id_i64)
            .bind(key)
            .fetch_optional(db.pool())
            .await?;

            Ok(value)
        })
        .await
}

pub async fn set_chat_setting(
    db: &Database,
    scope_id: u64,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    let scope_id_i64 = i64::try_from(scope_id).context("scope_id out of i64 range")?;
    let now_i64 = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    sqlx::query(
        "INSERT INTO chat_settings (scope_id, key, value, updated_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (scope_id, key) DO UPDATE SET
            value = EXCLUDED.value,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(scope_id_i64)
    .bind(key)
    .bind(value)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    invalidate_chat_setting(db.cache(), scope_id, key).await;

    Ok(())
}
