use std::sync::Arc;

use dashmap::DashMap;

use crate::status::PresenceStatus;

/// Last status seen for each (guild, member).
///
/// The gateway only reports the new status of a presence update, so the
/// previous one is remembered here. Members the ledger has never seen are
/// treated as offline, matching the platform's habit of omitting offline
/// members from initial presence lists.
#[derive(Clone, Debug, Default)]
pub struct PresenceLedger {
    statuses: Arc<DashMap<(u64, u64), PresenceStatus>>,
}

impl PresenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a status without producing a transition (guild snapshot on connect).
    pub fn seed(&self, guild_id: u64, member_id: u64, status: PresenceStatus) {
        self.statuses.insert((guild_id, member_id), status);
    }

    /// Store `status` and return what was stored before.
    pub fn record(&self, guild_id: u64, member_id: u64, status: PresenceStatus) -> PresenceStatus {
        self.statuses
            .insert((guild_id, member_id), status)
            .unwrap_or_default()
    }

    /// Drop a member who left the guild.
    pub fn forget_member(&self, guild_id: u64, member_id: u64) {
        self.statuses.remove(&(guild_id, member_id));
    }

    /// Drop every entry for a guild the bot left.
    pub fn forget_guild(&self, guild_id: u64) {
        self.statuses.retain(|(guild, _), _| *guild != guild_id);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_members_start_offline() {
        let ledger = PresenceLedger::new();
        assert_eq!(ledger.record(1, 2, PresenceStatus::Online), PresenceStatus::Offline);
        assert_eq!(ledger.record(1, 2, PresenceStatus::Idle), PresenceStatus::Online);
    }

    #[test]
    fn seeding_sets_the_previous_status() {
        let ledger = PresenceLedger::new();
        ledger.seed(1, 2, PresenceStatus::Dnd);
        assert_eq!(ledger.record(1, 2, PresenceStatus::Online), PresenceStatus::Dnd);
    }

    #[test]
    fn departed_member_is_forgotten() {
        let ledger = PresenceLedger::new();
        ledger.seed(1, 2, PresenceStatus::Online);
        ledger.seed(1, 3, PresenceStatus::Idle);

        ledger.forget_member(1, 2);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.record(1, 2, PresenceStatus::Online), PresenceStatus::Offline);
    }

    #[test]
    fn forgetting_a_guild_keeps_others() {
        let ledger = PresenceLedger::new();
        ledger.seed(1, 2, PresenceStatus::Online);
        ledger.seed(3, 2, PresenceStatus::Online);
        ledger.forget_guild(1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.record(3, 2, PresenceStatus::Idle), PresenceStatus::Online);
    }
}
