//! Whole-value accessors for the four per-guild settings fields.
//!
//! None of these take the guild lock. Callers that read, modify, and write
//! back must hold `Database::lock_guild` for the whole sequence.

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::{CONFIG_CACHE_TTL, invalidate_setting, setting_key};
use crate::database::Database;
use crate::error::ValidationError;
use crate::model::settings::{
    DEFAULT_COOLDOWN_SECONDS, GuildConfig, NotifyMode, Prefs, SettingField, Targets,
};

async fn load_field<T>(db: &Database, guild_id: u64, field: SettingField, default: T) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let cache_key = setting_key(db.cache(), guild_id, field);
    let raw: Option<String> = db
        .cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            db.storage().get(guild_id, field).await
        })
        .await?;

    let Some(raw) = raw else {
        return Ok(default);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(
                ?err,
                guild_id,
                field = field.as_str(),
                "stored setting is unreadable; using default"
            );
            Ok(default)
        }
    }
}

async fn store_field<T>(db: &Database, guild_id: u64, field: SettingField, value: &T) -> anyhow::Result<()>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value)
        .with_context(|| format!("failed to encode `{}` setting", field.as_str()))?;

    db.storage().set(guild_id, field, raw).await?;
    invalidate_setting(db.cache(), guild_id, field).await;

    Ok(())
}

pub async fn get_targets(db: &Database, guild_id: u64) -> anyhow::Result<Targets> {
    load_field(db, guild_id, SettingField::Targets, Targets::new()).await
}

/// Write the full target map. Entries without watchers are dropped before writing.
pub async fn set_targets(db: &Database, guild_id: u64, targets: &Targets) -> anyhow::Result<()> {
    if targets.values().any(|entry| entry.is_empty()) {
        debug!(guild_id, "pruning targets without watchers");
        let pruned: Targets = targets
            .iter()
            .filter(|(_, entry)| !entry.is_empty())
            .map(|(target_id, entry)| (*target_id, entry.clone()))
            .collect();
        return store_field(db, guild_id, SettingField::Targets, &pruned).await;
    }

    store_field(db, guild_id, SettingField::Targets, targets).await
}

pub async fn get_mode(db: &Database, guild_id: u64) -> anyhow::Result<NotifyMode> {
    load_field(db, guild_id, SettingField::Mode, NotifyMode::default()).await
}

pub async fn set_mode(db: &Database, guild_id: u64, mode: NotifyMode) -> anyhow::Result<()> {
    store_field(db, guild_id, SettingField::Mode, &mode).await
}

pub async fn get_prefs(db: &Database, guild_id: u64) -> anyhow::Result<Prefs> {
    load_field(db, guild_id, SettingField::Prefs, Prefs::new()).await
}

pub async fn set_prefs(db: &Database, guild_id: u64, prefs: &Prefs) -> anyhow::Result<()> {
    store_field(db, guild_id, SettingField::Prefs, prefs).await
}

pub async fn get_cooldown(db: &Database, guild_id: u64) -> anyhow::Result<u64> {
    load_field(db, guild_id, SettingField::Cooldown, DEFAULT_COOLDOWN_SECONDS).await
}

/// Store the cooldown in seconds; `0` disables it. Negative values are rejected
/// with [`ValidationError::NegativeCooldown`].
pub async fn set_cooldown(db: &Database, guild_id: u64, seconds: i64) -> anyhow::Result<()> {
    let Ok(seconds) = u64::try_from(seconds) else {
        return Err(ValidationError::NegativeCooldown(seconds.to_string()).into());
    };

    store_field(db, guild_id, SettingField::Cooldown, &seconds).await
}

/// Consistent snapshot of every field, taken under the guild lock.
pub async fn load_guild_config(db: &Database, guild_id: u64) -> anyhow::Result<GuildConfig> {
    let _guard = db.lock_guild(guild_id).await;

    Ok(GuildConfig {
        targets: get_targets(db, guild_id).await?,
        mode: get_mode(db, guild_id).await?,
        prefs: get_prefs(db, guild_id).await?,
        cooldown_seconds: get_cooldown(db, guild_id).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::{MentionPref, TargetEntry};

    #[tokio::test]
    async fn fresh_guild_reads_defaults() {
        let db = Database::in_memory();
        let config = load_guild_config(&db, 1).await.unwrap();
        assert_eq!(config, GuildConfig::default());
        assert_eq!(config.cooldown_seconds, 300);
        assert_eq!(config.mode, NotifyMode::OnlineOnly);
    }

    #[tokio::test]
    async fn fields_are_scoped_per_guild() {
        let db = Database::in_memory();
        set_mode(&db, 1, NotifyMode::All).await.unwrap();
        set_cooldown(&db, 1, 0).await.unwrap();

        assert_eq!(get_mode(&db, 1).await.unwrap(), NotifyMode::All);
        assert_eq!(get_cooldown(&db, 1).await.unwrap(), 0);
        assert_eq!(get_mode(&db, 2).await.unwrap(), NotifyMode::OnlineOnly);
        assert_eq!(get_cooldown(&db, 2).await.unwrap(), 300);
    }

    #[tokio::test]
    async fn negative_cooldown_is_rejected_without_writing() {
        let db = Database::in_memory();
        set_cooldown(&db, 1, 45).await.unwrap();

        let err = set_cooldown(&db, 1, -5).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NegativeCooldown("-5".to_owned()))
        );
        assert_eq!(get_cooldown(&db, 1).await.unwrap(), 45);
    }

    #[tokio::test]
    async fn empty_target_entries_are_never_stored() {
        let db = Database::in_memory();
        let mut targets = Targets::new();
        let mut kept = TargetEntry::new(10);
        kept.add_pinger(5);
        targets.insert(1, kept.clone());
        targets.insert(2, TargetEntry::new(10));

        set_targets(&db, 7, &targets).await.unwrap();

        let stored = get_targets(&db, 7).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(&1), Some(&kept));
    }

    #[tokio::test]
    async fn cached_reads_follow_writes() {
        let db = Database::in_memory_cached();
        assert_eq!(get_cooldown(&db, 1).await.unwrap(), 300);

        set_cooldown(&db, 1, 0).await.unwrap();
        assert_eq!(get_cooldown(&db, 1).await.unwrap(), 0);
        assert_eq!(load_guild_config(&db, 1).await.unwrap().cooldown_seconds, 0);
    }

    #[tokio::test]
    async fn prefs_round_trip() {
        let db = Database::in_memory();
        let mut prefs = Prefs::new();
        prefs.insert(9, MentionPref { mention: false });
        set_prefs(&db, 3, &prefs).await.unwrap();
        assert_eq!(get_prefs(&db, 3).await.unwrap(), prefs);
    }
}
