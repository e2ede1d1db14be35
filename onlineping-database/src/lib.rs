pub mod cache;
pub mod database;
pub mod error;
pub mod impls;
pub mod locks;
pub mod model;
pub mod storage;

pub use cache::CacheService;
pub use cache::throttle::{MemoryThrottle, Reservation, ThrottleCache, ThrottleKey};
pub use database::{Database, MIGRATOR};
pub use error::ValidationError;
