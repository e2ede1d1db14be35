use anyhow::Context as _;
use sqlx::PgPool;

use crate::model::settings::SettingField;

#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn get(&self, guild_id: u64, field: SettingField) -> anyhow::Result<Option<String>> {
        let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM guild_settings WHERE guild_id = $1 AND field = $2")
                .bind(guild_id_i64)
                .bind(field.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    pub async fn set(&self, guild_id: u64, field: SettingField, value: String) -> anyhow::Result<()> {
        let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

        sqlx::query(
            "INSERT INTO guild_settings (guild_id, field, value, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (guild_id, field)
             DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .bind(guild_id_i64)
        .bind(field.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
