//! Read-through cache support.
//!
//! One [`TtlCache`] keyed by [`CacheKey`], with the TTL chosen per
//! [`Category`], plus an [`InFlight`] map that merges concurrent misses.

mod clock;
mod inflight;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use inflight::InFlight;
pub use key::{CacheKey, Category, normalize_query};
#[allow(clippy::module_name_repetitions)]
pub use store::{CacheConfig, CacheStats, TtlCache, spawn_sweeper};
