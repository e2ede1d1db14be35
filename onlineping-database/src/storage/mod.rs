mod memory_store;
mod postgres_store;

use sqlx::PgPool;

use crate::model::settings::SettingField;
use memory_store::MemoryStore;
use postgres_store::PostgresStore;

/// Durable home of per-guild settings. Values are opaque JSON strings; the
/// typed layer in `impls::settings` owns encoding and defaults.
#[derive(Clone, Debug)]
pub(crate) enum StorageBackend {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

impl StorageBackend {
    pub(crate) fn postgres(pool: PgPool) -> Self {
        StorageBackend::Postgres(PostgresStore::new(pool))
    }

    pub(crate) fn memory() -> Self {
        StorageBackend::Memory(MemoryStore::default())
    }

    pub(crate) fn pool(&self) -> Option<&PgPool> {
        match self {
            StorageBackend::Postgres(store) => Some(store.pool()),
            StorageBackend::Memory(_) => None,
        }
    }

    pub(crate) async fn get(
        &self,
        guild_id: u64,
        field: SettingField,
    ) -> anyhow::Result<Option<String>> {
        match self {
            StorageBackend::Postgres(store) => store.get(guild_id, field).await,
            StorageBackend::Memory(store) => store.get(guild_id, field).await,
        }
    }

    pub(crate) async fn set(
        &self,
        guild_id: u64,
        field: SettingField,
        value: String,
    ) -> anyhow::Result<()> {
        match self {
            StorageBackend::Postgres(store) => store.set(guild_id, field, value).await,
            StorageBackend::Memory(store) => store.set(guild_id, field, value).await,
        }
    }
}
