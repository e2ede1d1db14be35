use std::sync::Arc;

use onlineping_database::{Database, MemoryThrottle, ThrottleCache};
use onlineping_notify::{Notifier, PresenceLedger};

pub type Error = anyhow::Error;

/// State shared by every command and event handler.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub throttle: Arc<dyn ThrottleCache>,
    pub notifier: Notifier,
    pub presences: PresenceLedger,
}

impl Data {
    /// Wire the shared state around `db` with a fresh in-process throttle.
    pub fn new(db: Database) -> Self {
        let throttle: Arc<dyn ThrottleCache> = Arc::new(MemoryThrottle::new());
        Self {
            notifier: Notifier::new(db.clone(), throttle.clone()),
            db,
            throttle,
            presences: PresenceLedger::new(),
        }
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
