mod noop_store;
mod redis_store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use noop_store::NoopCacheStore;
use redis_store::RedisCacheStore;

/// Lifetime of cached settings and admin levels.
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled(NoopCacheStore),
    Redis(RedisCacheStore),
}

#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled(NoopCacheStore),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.ping().await,
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let value = match &self.backend {
            CacheBackend::Disabled(store) => store.get(key).await,
            CacheBackend::Redis(store) => store.get(key).await,
        }?;

        match value {
            Some(bytes) => {
                let parsed = serde_json::from_slice(&bytes).map_err(|e| {
                    anyhow::anyhow!("failed to deserialize cache value for `{key}`: {e}")
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let ttl_seconds = ttl.as_secs().max(1);
        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("failed to serialize cache value for `{key}`: {e}"))?;

        match &self.backend {
            CacheBackend::Disabled(store) => store.set(key, payload, ttl_seconds).await,
            CacheBackend::Redis(store) => store.set(key, payload, ttl_seconds).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.del(key).await,
            CacheBackend::Redis(store) => store.del(key).await,
        }
    }

    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to database"
            ),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(
                ?e,
                cache_key = key,
                "cache set failed; returning database value"
            );
        }

        Ok(loaded)
    }
}

pub fn chat_setting_key(cache: &CacheService, scope_id: u64, setting: &str) -> String {
    cache.key(format!("chat_setting:{}:{}", scope_id, setting))
}

pub fn admin_level_key(cache: &CacheService, user_id: u64) -> String {
    cache.key(format!("admin_level:{}", user_id))
}

/// Drop a cached chat setting. Failures are logged; entries expire on their own.
pub async fn invalidate_chat_setting(cache: &CacheService, scope_id: u64, setting: &str) {
    invalidate(cache, &chat_setting_key(cache, scope_id, setting)).await;
}

pub async fn invalidate_admin_level(cache: &CacheService, user_id: u64) {
    invalidate(cache, &admin_level_key(cache, user_id)).await;
}

async fn invalidate(cache: &CacheService, key: &str) {
    if let Err(e) = cache.del(key).await {
        warn!(
            ?e,
            cache_key = key,
            "cache invalidation failed; stale entry expires with its ttl"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CacheService, admin_level_key, chat_setting_key, invalidate_admin_level,
        invalidate_chat_setting,
    };

    #[test]
    fn keys_carry_prefix() {
        let cache = CacheService::disabled("foxy:test");
        assert_eq!(
            chat_setting_key(&cache, 7, "welcome_template"),
            "foxy:test:chat_setting:7:welcome_template"
        );
        assert_eq!(admin_level_key(&cache, 9), "foxy:test:admin_level:9");
        assert!(!cache.is_redis_enabled());
    }

    #[tokio::test]
    async fn disabled_cache_always_loads() {
        let cache = CacheService::disabled("foxy:test");
        let value: Option<String> = cache
            .get_or_load_json("k", super::CONFIG_CACHE_TTL, || async {
                Ok(Some("loaded".to_owned()))
            })
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("loaded"));
    }

    #[tokio::test]
    async fn unreachable_redis_does_not_fail_invalidation() {
        let cache = CacheService::redis("redis://127.0.0.1:1", "foxy:test").unwrap();

        let level: i32 = cache
            .get_or_load_json(&admin_level_key(&cache, 4), super::CONFIG_CACHE_TTL, || async {
                Ok(4)
            })
            .await
            .unwrap();
        assert_eq!(level, 4);

        invalidate_admin_level(&cache, 4).await;
        invalidate_chat_setting(&cache, 7, "silence_enabled").await;
    }
}
