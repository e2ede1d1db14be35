#[cfg(test)]
mod memory_store;
mod noop_store;
mod redis_store;
pub mod throttle;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::model::settings::SettingField;
#[cfg(test)]
use memory_store::MemoryCacheStore;
use noop_store::NoopCacheStore;
use redis_store::RedisCacheStore;

/// How long a cached settings field may be served before it is reloaded.
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(600);

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled(NoopCacheStore),
    Redis(RedisCacheStore),
    #[cfg(test)]
    Memory(MemoryCacheStore),
}

/// Read-through cache in front of the settings store.
///
/// Every invalidation bumps a per-key write generation. A fill that loaded
/// from the store while a write landed sees the generation move and drops
/// what it just cached, so a slow reader cannot pin a pre-write value.
#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
    generations: Arc<DashMap<String, u64>>,
}

impl CacheService {
    fn with_backend(prefix: impl Into<String>, backend: CacheBackend) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend,
            generations: Arc::new(DashMap::new()),
        }
    }

    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self::with_backend(prefix, CacheBackend::Disabled(NoopCacheStore))
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::with_backend(
            prefix,
            CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        ))
    }

    #[cfg(test)]
    pub(crate) fn in_memory(prefix: impl Into<String>) -> Self {
        Self::with_backend(prefix, CacheBackend::Memory(MemoryCacheStore::default()))
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(_) => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
            #[cfg(test)]
            CacheBackend::Memory(_) => Ok(()),
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let value = match &self.backend {
            CacheBackend::Disabled(store) => store.get(key).await,
            CacheBackend::Redis(store) => store.get(key).await,
            #[cfg(test)]
            CacheBackend::Memory(store) => store.get(key).await,
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
            #[cfg(test)]
            CacheBackend::Memory(store) => store.set(key, payload, ttl_seconds).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.del(key).await,
            CacheBackend::Redis(store) => store.del(key).await,
            #[cfg(test)]
            CacheBackend::Memory(store) => store.del(key).await,
        }
    }

    fn generation(&self, key: &str) -> u64 {
        self.generations.get(key).map(|entry| *entry).unwrap_or(0)
    }

    /// Mark `key` as written and drop its cached value.
    pub async fn invalidate(&self, key: &str) -> anyhow::Result<()> {
        *self.generations.entry(key.to_owned()).or_insert(0) += 1;
        self.del(key).await
    }

    /// Serve `key` from the cache, or run `loader` and populate the cache with its result.
    /// Cache failures are logged and never fail the call.
    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(?e, cache_key = key, "cache get failed; falling back to store"),
        }

        let generation = self.generation(key);
        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(?e, cache_key = key, "cache set failed; returning store value");
        }

        if self.generation(key) != generation {
            debug!(cache_key = key, "write raced cache fill; dropping filled value");
            if let Err(e) = self.del(key).await {
                warn!(?e, cache_key = key, "cache cleanup after raced fill failed");
            }
        }

        Ok(loaded)
    }
}

pub fn setting_key(cache: &CacheService, guild_id: u64, field: SettingField) -> String {
    cache.key(format!("guild:{}:setting:{}", guild_id, field.as_str()))
}

/// Drop a cached field after a write. Failures are logged; the TTL bounds staleness.
pub async fn invalidate_setting(cache: &CacheService, guild_id: u64, field: SettingField) {
    let key = setting_key(cache, guild_id, field);
    if let Err(e) = cache.invalidate(&key).await {
        warn!(?e, cache_key = %key, "cache invalidation failed");
    }
}
