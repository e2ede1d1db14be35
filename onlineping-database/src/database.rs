use sqlx::{PgPool, migrate::Migrator};
use tokio::sync::OwnedMutexGuard;

use crate::cache::CacheService;
use crate::locks::GuildLocks;
use crate::storage::StorageBackend;

/// Compile-time discovered SQLx migrations for the `onlineping-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared settings handle passed across crates.
#[derive(Clone, Debug)]
pub struct Database {
    storage: StorageBackend,
    cache: CacheService,
    locks: GuildLocks,
}

impl Database {
    /// Create a Postgres-backed handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self::with_cache(pool, CacheService::disabled("onlineping:prod"))
    }

    /// Create a Postgres-backed handle from an existing pool and cache service.
    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self {
            storage: StorageBackend::postgres(pool),
            cache,
            locks: GuildLocks::default(),
        }
    }

    /// Create a non-durable handle that keeps settings in process memory.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::memory(),
            cache: CacheService::disabled("onlineping:memory"),
            locks: GuildLocks::default(),
        }
    }

    /// In-memory handle with a process-local cache in front, for exercising
    /// read-through behavior.
    #[cfg(test)]
    pub(crate) fn in_memory_cached() -> Self {
        Self {
            storage: StorageBackend::memory(),
            cache: CacheService::in_memory("onlineping:memory"),
            locks: GuildLocks::default(),
        }
    }

    /// The Postgres pool, if this handle is Postgres-backed.
    pub fn pool(&self) -> Option<&PgPool> {
        self.storage.pool()
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub(crate) fn storage(&self) -> &StorageBackend {
        &self.storage
    }

    /// Serialize read-modify-write sequences on one guild's settings.
    pub async fn lock_guild(&self, guild_id: u64) -> OwnedMutexGuard<()> {
        self.locks.lock(guild_id).await
    }
}
