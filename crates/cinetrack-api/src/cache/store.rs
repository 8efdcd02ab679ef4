//! `TtlCache` - per-category TTL cache with LRU eviction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;

use super::clock::Clock;
use super::key::{CacheKey, Category};

/// TTL applied to categories without an explicit entry.
const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// TTL for cast lists and person credits.
const CREDITS_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of entries.
const DEFAULT_CAPACITY: usize = 1000;

/// Shortest interval accepted by [`spawn_sweeper`].
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Cache sizing and per-category TTL table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct CacheConfig {
    /// TTL for categories missing from `ttls`.
    pub default_ttl: Duration,
    /// Per-category TTL overrides.
    pub ttls: HashMap<Category, Duration>,
    /// Maximum number of entries; `0` disables the bound.
    pub capacity: usize,
}

impl CacheConfig {
    /// Registers a TTL for one category.
    #[must_use]
    pub fn with_ttl(mut self, category: Category, ttl: Duration) -> Self {
        self.ttls.insert(category, ttl);
        self
    }

    /// Sets the TTL used by categories without an override.
    #[must_use]
    pub const fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the entry bound.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// TTL for a category.
    #[must_use]
    pub fn ttl_for(&self, category: Category) -> Duration {
        self.ttls
            .get(&category)
            .copied()
            .unwrap_or(self.default_ttl)
    }
}

impl Default for CacheConfig {
    /// 15 minutes for everything, 5 minutes for credits, 1000 entries.
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            ttls: HashMap::from([(Category::Credits, CREDITS_TTL)]),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Diagnostics snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct CacheStats {
    /// Entries currently stored, expired ones included.
    pub entries: usize,
    /// Keys of non-expired entries, sorted.
    pub live_keys: Vec<String>,
    /// Lookups that returned a value.
    pub hits: u64,
    /// Lookups that found nothing or an expired entry.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

/// Stored value with its timestamps.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
    last_access: Instant,
}

/// Key/value cache where each entry expires after its category's TTL.
///
/// Expired entries read as misses and are dropped lazily, by
/// [`TtlCache::sweep_expired`], or when capacity forces an eviction.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TtlCache<V> {
    entries: DashMap<CacheKey, Entry<V>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn is_fresh(&self, key: &CacheKey, stored_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(stored_at) < self.config.ttl_for(key.category())
    }

    /// Returns the value for `key` if present and not expired.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();

        if let Some(mut entry) = self.entries.get_mut(key) {
            if self.is_fresh(key, entry.stored_at, now) {
                entry.last_access = now;
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "cache hit");
                return Some(entry.value.clone());
            }
            drop(entry);
            self.entries
                .remove_if(key, |k, e| !self.is_fresh(k, e.stored_at, now));
            tracing::debug!(key = %key, "cache entry expired");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, "cache miss");
        None
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, value: V) {
        let now = self.clock.now();

        let at_capacity = self.config.capacity > 0 && self.entries.len() >= self.config.capacity;
        if at_capacity && !self.entries.contains_key(&key) {
            self.evict_one(now);
        }

        tracing::debug!(key = %key, "cache store");
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: now,
                last_access: now,
            },
        );
    }

    /// Frees one slot: expired entries first, otherwise the least recently used.
    fn evict_one(&self, now: Instant) {
        if self.sweep_expired_at(now) > 0 {
            return;
        }

        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().last_access)
            .map(|entry| entry.key().clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "cache eviction (least recently used)");
        }
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(self.clock.now())
    }

    fn sweep_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| self.is_fresh(key, entry.stored_at, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed = removed, "expired cache entries swept");
        }
        removed
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let removed = self.entries.len();
        self.entries.clear();
        tracing::info!(removed = removed, "cache cleared");
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics snapshot.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut live_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| self.is_fresh(entry.key(), entry.value().stored_at, now))
            .map(|entry| entry.key().to_string())
            .collect();
        live_keys.sort_unstable();

        CacheStats {
            entries: self.entries.len(),
            live_keys,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Runs [`TtlCache::sweep_expired`] every `interval` until the cache is dropped.
///
/// Must be called from within a tokio runtime.
pub fn spawn_sweeper<V>(cache: &Arc<TtlCache<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let weak: Weak<TtlCache<V>> = Arc::downgrade(cache);
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(cache) = weak.upgrade() else {
                tracing::debug!("cache dropped, sweeper stopping");
                break;
            };
            cache.sweep_expired();
        }
    })
}
