//! Per-(guild, target) notification throttle.
//!
//! A notification goes through three steps against the throttle: `try_reserve`
//! before sending, then `commit` once the send succeeded or `release` if it
//! did not. While a reservation is outstanding every other attempt for the same
//! key is refused, so two events racing inside one cooldown window cannot both
//! get through. Each reservation carries a ticket; `commit` and `release` only
//! act on the slot if it still holds that ticket.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    pub guild_id: u64,
    pub target_id: u64,
}

impl ThrottleKey {
    pub fn new(guild_id: u64, target_id: u64) -> Self {
        Self {
            guild_id,
            target_id,
        }
    }
}

/// A granted hold on one key, handed back to `commit` or `release`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Reservation {
    pub key: ThrottleKey,
    ticket: u64,
}

pub trait ThrottleCache: Send + Sync + Debug {
    /// Atomically check the cooldown for `key` and, if it has elapsed, hold the
    /// key until `commit` or `release`. Returns `None` when the caller must
    /// suppress the notification.
    fn try_reserve(&self, key: ThrottleKey, now: Instant, cooldown: Duration) -> Option<Reservation>;

    /// Record a delivered notification. Does nothing if the key was cleared or
    /// handed to a newer reservation in the meantime.
    fn commit(&self, reservation: Reservation, sent_at: Instant);

    /// Give up a reservation without recording a send.
    fn release(&self, reservation: Reservation);

    /// Forget everything about `key`.
    fn clear(&self, key: ThrottleKey);

    fn last_notified(&self, key: ThrottleKey) -> Option<Instant>;
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    last_sent: Option<Instant>,
    in_flight: Option<u64>,
}

/// In-process throttle. Entries vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryThrottle {
    slots: DashMap<ThrottleKey, Slot>,
    next_ticket: AtomicU64,
}

impl MemoryThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn issue(&self, key: ThrottleKey) -> Reservation {
        Reservation {
            key,
            ticket: self.next_ticket.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl ThrottleCache for MemoryThrottle {
    fn try_reserve(&self, key: ThrottleKey, now: Instant, cooldown: Duration) -> Option<Reservation> {
        match self.slots.entry(key) {
            Entry::Vacant(vacant) => {
                let reservation = self.issue(key);
                vacant.insert(Slot {
                    last_sent: None,
                    in_flight: Some(reservation.ticket),
                });
                Some(reservation)
            }
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.in_flight.is_some() {
                    return None;
                }
                if let Some(last_sent) = slot.last_sent
                    && now.saturating_duration_since(last_sent) < cooldown
                {
                    return None;
                }
                let reservation = self.issue(key);
                slot.in_flight = Some(reservation.ticket);
                Some(reservation)
            }
        }
    }

    fn commit(&self, reservation: Reservation, sent_at: Instant) {
        if let Some(mut slot) = self.slots.get_mut(&reservation.key)
            && slot.in_flight == Some(reservation.ticket)
        {
            slot.last_sent = Some(sent_at);
            slot.in_flight = None;
        }
    }

    fn release(&self, reservation: Reservation) {
        self.slots.remove_if_mut(&reservation.key, |_, slot| {
            if slot.in_flight != Some(reservation.ticket) {
                return false;
            }
            slot.in_flight = None;
            slot.last_sent.is_none()
        });
    }

    fn clear(&self, key: ThrottleKey) {
        self.slots.remove(&key);
    }

    fn last_notified(&self, key: ThrottleKey) -> Option<Instant> {
        self.slots.get(&key).and_then(|slot| slot.last_sent)
    }
}
