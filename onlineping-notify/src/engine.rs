use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use onlineping_database::Database;
use onlineping_database::cache::throttle::{ThrottleCache, ThrottleKey};
use onlineping_database::impls::settings::{get_targets, load_guild_config};
use onlineping_database::model::settings::NotifyMode;

use crate::gateway::NotificationGateway;
use crate::message::compose_notification;
use crate::status::PresenceStatus;

/// One status transition of a guild member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresenceChange {
    pub guild_id: u64,
    pub member_id: u64,
    pub before: PresenceStatus,
    pub after: PresenceStatus,
    pub at: Instant,
}

/// What the engine did with a presence change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    Unchanged,
    NotTracked,
    FilteredByMode,
    CoolingDown,
    ChannelMissing { channel_id: u64 },
    DeliveryFailed { channel_id: u64 },
    Sent { channel_id: u64 },
}

#[derive(Clone, Debug)]
pub struct Notifier {
    db: Database,
    throttle: Arc<dyn ThrottleCache>,
}

impl Notifier {
    pub fn new(db: Database, throttle: Arc<dyn ThrottleCache>) -> Self {
        Self { db, throttle }
    }

    pub fn throttle(&self) -> &Arc<dyn ThrottleCache> {
        &self.throttle
    }

    /// Run one presence change through the filters and post at most one message.
    ///
    /// Errors only come from reading settings; delivery problems are reported
    /// through the outcome and never retried.
    pub async fn handle<G>(&self, gateway: &G, change: PresenceChange) -> anyhow::Result<NotifyOutcome>
    where
        G: NotificationGateway,
    {
        let PresenceChange {
            guild_id,
            member_id,
            before,
            after,
            at,
        } = change;

        if before == after {
            return Ok(NotifyOutcome::Unchanged);
        }

        // Most presence traffic is for untracked members; settle that with a
        // single unlocked read before taking the guild lock.
        if !get_targets(&self.db, guild_id).await?.contains_key(&member_id) {
            return Ok(NotifyOutcome::NotTracked);
        }

        let config = load_guild_config(&self.db, guild_id).await?;

        let Some(entry) = config.targets.get(&member_id) else {
            return Ok(NotifyOutcome::NotTracked);
        };

        if config.mode == NotifyMode::OnlineOnly && !after.is_online() {
            debug!(guild_id, member_id, status = %after, "transition filtered by mode");
            return Ok(NotifyOutcome::FilteredByMode);
        }

        let key = ThrottleKey::new(guild_id, member_id);
        let reservation = match config.cooldown() {
            Some(cooldown) => match self.throttle.try_reserve(key, at, cooldown) {
                Some(reservation) => Some(reservation),
                None => {
                    debug!(guild_id, member_id, "transition suppressed by cooldown");
                    return Ok(NotifyOutcome::CoolingDown);
                }
            },
            None => None,
        };

        let channel_id = entry.channel;
        let Some(channel) = gateway.resolve_channel(guild_id, channel_id).await else {
            if let Some(reservation) = reservation {
                self.throttle.release(reservation);
            }
            warn!(guild_id, member_id, channel_id, "notification channel is gone; dropping");
            return Ok(NotifyOutcome::ChannelMissing { channel_id });
        };

        let content = compose_notification(member_id, before, after, &entry.pingers, &config.prefs);

        match gateway.send_text(&channel, content).await {
            Ok(()) => {
                if let Some(reservation) = reservation {
                    self.throttle.commit(reservation, at);
                }
                debug!(guild_id, member_id, channel_id, "notification sent");
                Ok(NotifyOutcome::Sent { channel_id })
            }
            Err(err) => {
                if let Some(reservation) = reservation {
                    self.throttle.release(reservation);
                }
                warn!(?err, guild_id, member_id, channel_id, "failed to send notification");
                Ok(NotifyOutcome::DeliveryFailed { channel_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use onlineping_database::MemoryThrottle;
    use onlineping_database::impls::settings::{set_cooldown, set_mode};
    use onlineping_database::impls::subscriptions::{set_mention_preference, track, untrack};

    use super::*;

    const GUILD: u64 = 10;
    const TARGET: u64 = 20;
    const WATCHER: u64 = 30;
    const ALERTS: u64 = 40;

    #[derive(Default)]
    struct FakeGateway {
        channels: HashSet<u64>,
        sent: Mutex<Vec<(u64, String)>>,
        fail_sends: AtomicBool,
        send_delay: Option<Duration>,
    }

    impl FakeGateway {
        fn with_channel(channel_id: u64) -> Self {
            Self {
                channels: HashSet::from([channel_id]),
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<(u64, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl NotificationGateway for FakeGateway {
        type Channel = u64;

        async fn resolve_channel(&self, _guild_id: u64, channel_id: u64) -> Option<u64> {
            self.channels.contains(&channel_id).then_some(channel_id)
        }

        async fn send_text(&self, channel: &u64, content: String) -> anyhow::Result<()> {
            if let Some(delay) = self.send_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_sends.load(Ordering::SeqCst) {
                anyhow::bail!("missing access");
            }
            self.sent.lock().unwrap().push((*channel, content));
            Ok(())
        }
    }

    struct Harness {
        db: Database,
        throttle: Arc<MemoryThrottle>,
        notifier: Notifier,
        start: Instant,
    }

    impl Harness {
        async fn new(mode: NotifyMode, cooldown: i64) -> Self {
            let db = Database::in_memory();
            track(&db, GUILD, TARGET, WATCHER, ALERTS).await.unwrap();
            set_mode(&db, GUILD, mode).await.unwrap();
            set_cooldown(&db, GUILD, cooldown).await.unwrap();

            let throttle = Arc::new(MemoryThrottle::new());
            let notifier = Notifier::new(db.clone(), throttle.clone());
            Self {
                db,
                throttle,
                notifier,
                start: Instant::now(),
            }
        }

        fn change(&self, before: PresenceStatus, after: PresenceStatus, secs: u64) -> PresenceChange {
            PresenceChange {
                guild_id: GUILD,
                member_id: TARGET,
                before,
                after,
                at: self.start + Duration::from_secs(secs),
            }
        }
    }

    use PresenceStatus::{Dnd, Idle, Offline, Online};

    #[tokio::test]
    async fn online_only_scenario() {
        let h = Harness::new(NotifyMode::OnlineOnly, 0).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        let first = h.notifier.handle(&gateway, h.change(Offline, Online, 0)).await.unwrap();
        assert_eq!(first, NotifyOutcome::Sent { channel_id: ALERTS });

        let second = h.notifier.handle(&gateway, h.change(Online, Idle, 0)).await.unwrap();
        assert_eq!(second, NotifyOutcome::FilteredByMode);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        let (channel, text) = &sent[0];
        assert_eq!(*channel, ALERTS);
        assert!(text.contains("<@20>"));
        assert!(text.contains("offline → online"));
        assert!(text.ends_with("<@30>"));
    }

    #[tokio::test]
    async fn disabled_cooldown_writes_no_throttle_state() {
        let h = Harness::new(NotifyMode::OnlineOnly, 0).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        for _ in 0..2 {
            let outcome = h.notifier.handle(&gateway, h.change(Offline, Online, 0)).await.unwrap();
            assert_eq!(outcome, NotifyOutcome::Sent { channel_id: ALERTS });
        }
        assert!(h.throttle.is_empty());
    }

    #[tokio::test]
    async fn all_mode_with_cooldown_scenario() {
        let h = Harness::new(NotifyMode::All, 60).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        let at_0 = h.notifier.handle(&gateway, h.change(Online, Idle, 0)).await.unwrap();
        let at_30 = h.notifier.handle(&gateway, h.change(Idle, Dnd, 30)).await.unwrap();
        let at_61 = h.notifier.handle(&gateway, h.change(Dnd, Online, 61)).await.unwrap();

        assert_eq!(at_0, NotifyOutcome::Sent { channel_id: ALERTS });
        assert_eq!(at_30, NotifyOutcome::CoolingDown);
        assert_eq!(at_61, NotifyOutcome::Sent { channel_id: ALERTS });
        assert_eq!(gateway.sent().len(), 2);
        assert_eq!(
            h.throttle.last_notified(ThrottleKey::new(GUILD, TARGET)),
            Some(h.start + Duration::from_secs(61))
        );
    }

    #[tokio::test]
    async fn cooldown_boundary_is_inclusive_of_elapsed_window() {
        let h = Harness::new(NotifyMode::All, 60).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        h.notifier.handle(&gateway, h.change(Online, Idle, 0)).await.unwrap();
        let exactly = h.notifier.handle(&gateway, h.change(Idle, Online, 60)).await.unwrap();
        assert_eq!(exactly, NotifyOutcome::Sent { channel_id: ALERTS });
    }

    #[tokio::test]
    async fn same_status_is_ignored() {
        let h = Harness::new(NotifyMode::All, 0).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        let outcome = h.notifier.handle(&gateway, h.change(Online, Online, 0)).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::Unchanged);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn untracked_member_is_ignored() {
        let h = Harness::new(NotifyMode::All, 0).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        let mut change = h.change(Offline, Online, 0);
        change.member_id = 999;
        let outcome = h.notifier.handle(&gateway, change).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::NotTracked);
    }

    #[tokio::test]
    async fn untracked_member_does_not_wait_on_guild_lock() {
        let h = Harness::new(NotifyMode::All, 0).await;
        let gateway = FakeGateway::with_channel(ALERTS);
        let _held = h.db.lock_guild(GUILD).await;

        let mut change = h.change(Offline, Online, 0);
        change.member_id = 999;
        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            h.notifier.handle(&gateway, change),
        )
        .await
        .expect("untracked event blocked on the guild lock")
        .unwrap();
        assert_eq!(outcome, NotifyOutcome::NotTracked);
    }

    #[tokio::test]
    async fn mode_filter_covers_every_transition() {
        let statuses = PresenceStatus::ALL;

        for mode in [NotifyMode::OnlineOnly, NotifyMode::All] {
            let h = Harness::new(mode, 0).await;
            let gateway = FakeGateway::with_channel(ALERTS);
            let mut expected_sent = 0;

            for &before in &statuses {
                for &after in &statuses {
                    let outcome = h.notifier.handle(&gateway, h.change(before, after, 0)).await.unwrap();
                    let expected = if before == after {
                        NotifyOutcome::Unchanged
                    } else if mode == NotifyMode::OnlineOnly && after != Online {
                        NotifyOutcome::FilteredByMode
                    } else {
                        expected_sent += 1;
                        NotifyOutcome::Sent { channel_id: ALERTS }
                    };
                    assert_eq!(outcome, expected, "{mode:?}: {before} -> {after}");
                }
            }

            assert_eq!(gateway.sent().len(), expected_sent, "{mode:?}");
        }
    }

    #[tokio::test]
    async fn missing_channel_drops_without_touching_cooldown() {
        let h = Harness::new(NotifyMode::All, 60).await;
        let gateway = FakeGateway::default();

        let outcome = h.notifier.handle(&gateway, h.change(Offline, Online, 0)).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::ChannelMissing { channel_id: ALERTS });
        assert!(h.throttle.is_empty());
    }

    #[tokio::test]
    async fn failed_send_does_not_start_cooldown() {
        let h = Harness::new(NotifyMode::All, 60).await;
        let gateway = FakeGateway::with_channel(ALERTS);
        gateway.fail_sends.store(true, Ordering::SeqCst);

        let failed = h.notifier.handle(&gateway, h.change(Offline, Online, 0)).await.unwrap();
        assert_eq!(failed, NotifyOutcome::DeliveryFailed { channel_id: ALERTS });
        assert_eq!(h.throttle.last_notified(ThrottleKey::new(GUILD, TARGET)), None);

        gateway.fail_sends.store(false, Ordering::SeqCst);
        let retried = h.notifier.handle(&gateway, h.change(Online, Idle, 1)).await.unwrap();
        assert_eq!(retried, NotifyOutcome::Sent { channel_id: ALERTS });
    }

    #[tokio::test]
    async fn opted_out_watcher_is_never_mentioned() {
        let h = Harness::new(NotifyMode::All, 0).await;
        set_mention_preference(&h.db, GUILD, WATCHER, false).await.unwrap();
        let gateway = FakeGateway::with_channel(ALERTS);

        h.notifier.handle(&gateway, h.change(Offline, Online, 0)).await.unwrap();
        h.notifier.handle(&gateway, h.change(Online, Dnd, 1)).await.unwrap();

        for (_, text) in gateway.sent() {
            assert!(!text.contains("<@30>"));
            assert!(text.ends_with("**."));
        }
    }

    #[tokio::test]
    async fn concurrent_events_inside_one_window_send_once() {
        let h = Harness::new(NotifyMode::All, 60).await;
        let gateway = FakeGateway {
            send_delay: Some(Duration::from_millis(20)),
            ..FakeGateway::with_channel(ALERTS)
        };

        let (first, second) = tokio::join!(
            h.notifier.handle(&gateway, h.change(Offline, Online, 0)),
            h.notifier.handle(&gateway, h.change(Online, Idle, 1)),
        );
        let outcomes = [first.unwrap(), second.unwrap()];

        let sent = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, NotifyOutcome::Sent { .. }))
            .count();
        assert_eq!(sent, 1);
        assert!(outcomes.contains(&NotifyOutcome::CoolingDown));
        assert_eq!(gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn retracking_after_full_untrack_starts_fresh() {
        let h = Harness::new(NotifyMode::All, 60).await;
        let gateway = FakeGateway::with_channel(ALERTS);

        h.notifier.handle(&gateway, h.change(Offline, Online, 0)).await.unwrap();
        untrack(&h.db, h.throttle.as_ref(), GUILD, TARGET, WATCHER).await.unwrap();
        track(&h.db, GUILD, TARGET, WATCHER, ALERTS).await.unwrap();

        let outcome = h.notifier.handle(&gateway, h.change(Online, Idle, 5)).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::Sent { channel_id: ALERTS });
    }
}
