use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::settings::SettingField;

/// Process-local settings store. Lost on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<(u64, SettingField), String>>>,
}

impl MemoryStore {
    pub async fn get(&self, guild_id: u64, field: SettingField) -> anyhow::Result<Option<String>> {
        Ok(self.values.read().await.get(&(guild_id, field)).cloned())
    }

    pub async fn set(&self, guild_id: u64, field: SettingField, value: String) -> anyhow::Result<()> {
        self.values.write().await.insert((guild_id, field), value);
        Ok(())
    }
}
