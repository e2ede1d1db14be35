use std::fmt;

use serenity::model::user::OnlineStatus;

/// Status vocabulary used in notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
    Idle,
    Dnd,
    /// Shown to other members as offline, but labelled separately here.
    Invisible,
}

impl PresenceStatus {
    pub const ALL: [PresenceStatus; 5] = [
        PresenceStatus::Online,
        PresenceStatus::Offline,
        PresenceStatus::Idle,
        PresenceStatus::Dnd,
        PresenceStatus::Invisible,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Offline => "offline",
            PresenceStatus::Idle => "idle",
            PresenceStatus::Dnd => "dnd",
            PresenceStatus::Invisible => "invisible",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            PresenceStatus::Online => "🟢",
            PresenceStatus::Offline | PresenceStatus::Invisible => "⚫",
            PresenceStatus::Idle => "🌙",
            PresenceStatus::Dnd => "⛔",
        }
    }

    pub fn is_online(self) -> bool {
        self == PresenceStatus::Online
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<OnlineStatus> for PresenceStatus {
    fn from(status: OnlineStatus) -> Self {
        match status {
            OnlineStatus::Online => PresenceStatus::Online,
            OnlineStatus::Idle => PresenceStatus::Idle,
            OnlineStatus::DoNotDisturb => PresenceStatus::Dnd,
            OnlineStatus::Invisible => PresenceStatus::Invisible,
            OnlineStatus::Offline => PresenceStatus::Offline,
            _ => PresenceStatus::Offline,
        }
    }
}
