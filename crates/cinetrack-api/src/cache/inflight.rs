//! `InFlight` - coalesces concurrent fetches for the same cache key.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use super::key::CacheKey;
use crate::error::Result;

/// Shared slot resolved by whichever caller runs the fetch.
type Slot<V> = Arc<OnceCell<Result<V>>>;

/// Map of pending fetches keyed like the cache.
///
/// The first caller for a key runs its fetch; callers arriving while it is
/// pending await the same slot and receive a clone of its result, error
/// included. The slot is dropped once resolved, so later calls start over.
#[derive(Debug)]
pub struct InFlight<V> {
    pending: DashMap<CacheKey, Slot<V>>,
}

impl<V: Clone> InFlight<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// Runs `fetch` unless a fetch for `key` is already pending, in which
    /// case its result is awaited instead.
    ///
    /// # Errors
    ///
    /// Returns the error produced by whichever fetch resolved the slot.
    pub async fn run<F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot: Slot<V> = Arc::clone(
            self.pending
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        if slot.initialized() {
            tracing::debug!(key = %key, "in-flight result already available");
        }

        let guard = SlotGuard {
            pending: &self.pending,
            key,
            slot,
        };

        let result = guard
            .slot
            .get_or_init(|| {
                tracing::debug!(key = %key, "fetch started");
                fetch()
            })
            .await
            .clone();
        drop(guard);
        result
    }

    /// Number of keys with a pending fetch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<V: Clone> Default for InFlight<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops the map entry when its caller finishes or is cancelled.
///
/// The entry stays while another caller still holds the slot and it is
/// unresolved; that caller takes over the fetch.
struct SlotGuard<'a, V> {
    /// Map the slot was taken from.
    pending: &'a DashMap<CacheKey, Slot<V>>,
    /// Key of the slot.
    key: &'a CacheKey,
    /// This caller's handle.
    slot: Slot<V>,
}

impl<V> Drop for SlotGuard<'_, V> {
    fn drop(&mut self) {
        let slot = &self.slot;
        let removed = self.pending.remove_if(self.key, |_, current| {
            // map entry + this guard
            Arc::ptr_eq(current, slot) && (slot.initialized() || Arc::strong_count(slot) <= 2)
        });
        if removed.is_some() && !slot.initialized() {
            tracing::debug!(key = %self.key, "abandoned fetch slot released");
        }
    }
}
