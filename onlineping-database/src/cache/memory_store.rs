use std::sync::Arc;

use dashmap::DashMap;

/// In-process cache backend for tests. TTLs are ignored.
#[derive(Clone, Debug, Default)]
pub struct MemoryCacheStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryCacheStore {
    pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    pub async fn set(&self, key: &str, value: Vec<u8>, _ttl_seconds: u64) -> anyhow::Result<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
