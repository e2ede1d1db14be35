//! Mutating operations behind the `onlineping` commands. Each one holds the
//! guild lock across its read-modify-write.

use tracing::info;

use crate::cache::throttle::{ThrottleCache, ThrottleKey};
use crate::database::Database;
use crate::impls::settings::{
    get_cooldown, get_prefs, get_targets, set_cooldown, set_mode, set_prefs, set_targets,
};
use crate::model::settings::{MentionPref, NotifyMode, TargetEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The requester was added to the watcher list.
    Subscribed,
    /// The requester was already watching; only the channel was refreshed.
    AlreadySubscribed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UntrackOutcome {
    /// The requester was not watching this target. Nothing changed.
    NotSubscribed,
    /// The requester was removed; `remaining` watchers are left. At zero the
    /// target entry itself is gone.
    Unsubscribed { remaining: usize },
}

/// Subscribe `requester_id` to `target_id`, posting to `channel_id`.
///
/// The entry's channel is overwritten on every call.
pub async fn track(
    db: &Database,
    guild_id: u64,
    target_id: u64,
    requester_id: u64,
    channel_id: u64,
) -> anyhow::Result<TrackOutcome> {
    let _guard = db.lock_guild(guild_id).await;

    let mut targets = get_targets(db, guild_id).await?;
    let entry = targets
        .entry(target_id)
        .or_insert_with(|| TargetEntry::new(channel_id));
    let added = entry.add_pinger(requester_id);
    entry.channel = channel_id;

    set_targets(db, guild_id, &targets).await?;

    info!(guild_id, target_id, requester_id, channel_id, added, "target tracked");

    Ok(if added {
        TrackOutcome::Subscribed
    } else {
        TrackOutcome::AlreadySubscribed
    })
}

/// Remove `requester_id` from `target_id`'s watchers. Dropping the last
/// watcher deletes the entry and its throttle record.
pub async fn untrack(
    db: &Database,
    throttle: &dyn ThrottleCache,
    guild_id: u64,
    target_id: u64,
    requester_id: u64,
) -> anyhow::Result<UntrackOutcome> {
    let _guard = db.lock_guild(guild_id).await;

    let mut targets = get_targets(db, guild_id).await?;
    let Some(entry) = targets.get_mut(&target_id) else {
        return Ok(UntrackOutcome::NotSubscribed);
    };

    if !entry.remove_pinger(requester_id) {
        return Ok(UntrackOutcome::NotSubscribed);
    }

    let remaining = entry.pingers.len();
    if remaining == 0 {
        targets.remove(&target_id);
        throttle.clear(ThrottleKey::new(guild_id, target_id));
    }

    set_targets(db, guild_id, &targets).await?;

    info!(guild_id, target_id, requester_id, remaining, "target untracked");

    Ok(UntrackOutcome::Unsubscribed { remaining })
}

/// Parse and store the guild's notification mode.
pub async fn update_mode(db: &Database, guild_id: u64, raw: &str) -> anyhow::Result<NotifyMode> {
    let mode: NotifyMode = raw.parse()?;

    let _guard = db.lock_guild(guild_id).await;
    set_mode(db, guild_id, mode).await?;

    info!(guild_id, mode = mode.as_str(), "notification mode updated");
    Ok(mode)
}

/// Store the guild's cooldown and return the value now in effect.
pub async fn update_cooldown(db: &Database, guild_id: u64, seconds: i64) -> anyhow::Result<u64> {
    let _guard = db.lock_guild(guild_id).await;
    set_cooldown(db, guild_id, seconds).await?;

    let stored = get_cooldown(db, guild_id).await?;
    info!(guild_id, cooldown_seconds = stored, "cooldown updated");
    Ok(stored)
}

/// Upsert whether `user_id` wants to be mentioned in notifications.
pub async fn set_mention_preference(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    mention: bool,
) -> anyhow::Result<()> {
    let _guard = db.lock_guild(guild_id).await;

    let mut prefs = get_prefs(db, guild_id).await?;
    prefs.insert(user_id, MentionPref { mention });
    set_prefs(db, guild_id, &prefs).await?;

    info!(guild_id, user_id, mention, "mention preference updated");
    Ok(())
}
