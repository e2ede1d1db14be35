use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Cooldown applied to guilds that never configured one.
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 300;

/// Which status transitions produce notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// Only transitions into `online`.
    #[default]
    OnlineOnly,
    /// Every status change.
    All,
}

impl NotifyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            NotifyMode::OnlineOnly => "online_only",
            NotifyMode::All => "all",
        }
    }
}

impl fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifyMode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("online_only") {
            Ok(NotifyMode::OnlineOnly)
        } else if value.eq_ignore_ascii_case("all") {
            Ok(NotifyMode::All)
        } else {
            Err(ValidationError::InvalidMode(value.to_owned()))
        }
    }
}

/// One tracked member: where to post, and who asked to be told.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
    pub channel: u64,
    /// Watcher ids in the order they subscribed. Never contains duplicates.
    pub pingers: Vec<u64>,
}

impl TargetEntry {
    pub fn new(channel: u64) -> Self {
        Self {
            channel,
            pingers: Vec::new(),
        }
    }

    pub fn has_pinger(&self, user_id: u64) -> bool {
        self.pingers.contains(&user_id)
    }

    /// Returns `false` when the watcher was already subscribed.
    pub fn add_pinger(&mut self, user_id: u64) -> bool {
        if self.has_pinger(user_id) {
            return false;
        }
        self.pingers.push(user_id);
        true
    }

    /// Returns `false` when the watcher was not subscribed.
    pub fn remove_pinger(&mut self, user_id: u64) -> bool {
        let before = self.pingers.len();
        self.pingers.retain(|id| *id != user_id);
        self.pingers.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.pingers.is_empty()
    }
}

/// Tracked members keyed by user id.
pub type Targets = BTreeMap<u64, TargetEntry>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionPref {
    pub mention: bool,
}

impl Default for MentionPref {
    fn default() -> Self {
        Self { mention: true }
    }
}

/// Per-watcher mention preferences keyed by user id. Absent means "mention".
pub type Prefs = BTreeMap<u64, MentionPref>;

/// Everything stored for one guild.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuildConfig {
    pub targets: Targets,
    pub mode: NotifyMode,
    pub prefs: Prefs,
    pub cooldown_seconds: u64,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            targets: Targets::new(),
            mode: NotifyMode::default(),
            prefs: Prefs::new(),
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
        }
    }
}

impl GuildConfig {
    pub fn wants_mention(&self, user_id: u64) -> bool {
        wants_mention(&self.prefs, user_id)
    }

    /// `None` when the cooldown is disabled.
    pub fn cooldown(&self) -> Option<Duration> {
        (self.cooldown_seconds > 0).then(|| Duration::from_secs(self.cooldown_seconds))
    }
}

pub fn wants_mention(prefs: &Prefs, user_id: u64) -> bool {
    prefs.get(&user_id).copied().unwrap_or_default().mention
}

/// The named per-guild fields held by the key-value store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingField {
    Targets,
    Mode,
    Prefs,
    Cooldown,
}

impl SettingField {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingField::Targets => "targets",
            SettingField::Mode => "mode",
            SettingField::Prefs => "prefs",
            SettingField::Cooldown => "cooldown",
        }
    }
}
