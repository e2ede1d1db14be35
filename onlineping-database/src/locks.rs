use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per guild. Holders may read, modify, and write back that
/// guild's settings without losing a concurrent update.
#[derive(Clone, Debug, Default)]
pub struct GuildLocks {
    locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
}

impl GuildLocks {
    pub async fn lock(&self, guild_id: u64) -> OwnedMutexGuard<()> {
        let mutex = self.locks.entry(guild_id).or_default().clone();
        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::GuildLocks;

    #[tokio::test]
    async fn same_guild_is_exclusive() {
        let locks = GuildLocks::default();
        let guard = locks.lock(1).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(1).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_guilds_do_not_block() {
        let locks = GuildLocks::default();
        let _first = locks.lock(1).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(second.is_ok());
    }
}
