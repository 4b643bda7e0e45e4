//! Catalog caching with TTL support.

use chrono::Duration;
use easner_common::{constants, Clock, SharedClock, SystemClock, Timestamp};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::rate::ExchangeRate;

/// A point-in-time copy of the active rate catalog.
///
/// Quotes computed from a snapshot are only as fresh as `fetched_at`.
#[derive(Debug, Clone)]
pub struct RateCatalog {
    rates: Vec<ExchangeRate>,
    fetched_at: Timestamp,
}

impl RateCatalog {
    /// Build a snapshot, keeping only active rows.
    pub fn new(rates: Vec<ExchangeRate>, fetched_at: Timestamp) -> Self {
        Self {
            rates: rates.into_iter().filter(|r| r.is_active()).collect(),
            fetched_at,
        }
    }

    pub fn rates(&self) -> &[ExchangeRate] {
        &self.rates
    }

    pub fn fetched_at(&self) -> Timestamp {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Configuration for the catalog cache.
#[derive(Debug, Clone)]
pub struct CatalogCacheConfig {
    /// How long a snapshot stays servable.
    pub ttl: Duration,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            ttl: constants::catalog_ttl(),
        }
    }
}

/// Holds the most recent catalog snapshot for its owner.
///
/// The cache never fetches; on a miss the owner loads the catalog and
/// calls [`CatalogCache::insert_if_current`].
pub struct CatalogCache {
    entry: RwLock<Option<Arc<RateCatalog>>>,
    clock: SharedClock,
    config: CatalogCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    generation: AtomicU64,
}

impl CatalogCache {
    /// Create a cache on the system clock with default configuration.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), CatalogCacheConfig::default())
    }

    /// Create a cache with an explicit clock and configuration.
    pub fn with_clock(clock: SharedClock, config: CatalogCacheConfig) -> Self {
        Self {
            entry: RwLock::new(None),
            clock,
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    /// Get the snapshot if it is younger than the TTL.
    pub fn get(&self) -> Option<Arc<RateCatalog>> {
        let now = self.clock.now();

        {
            let entry = self.entry.read();
            if let Some(catalog) = entry.as_ref() {
                if self.is_fresh(catalog, now) {
                    debug!(rates = catalog.len(), "Catalog cache hit");
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(catalog.clone());
                }
            } else {
                debug!("Catalog cache miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        }

        // Re-check under the write lock; another caller may have refreshed it.
        let mut entry = self.entry.write();
        if let Some(catalog) = entry.as_ref() {
            if self.is_fresh(catalog, now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(catalog.clone());
            }
            debug!(fetched_at = %catalog.fetched_at(), "Catalog cache entry expired");
            *entry = None;
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a freshly fetched catalog, stamped with the current time.
    ///
    /// `generation` is the value read before the fetch started. If the cache
    /// was invalidated since, the snapshot is returned but not cached.
    pub fn insert_if_current(&self, rates: Vec<ExchangeRate>, generation: u64) -> Arc<RateCatalog> {
        let catalog = Arc::new(RateCatalog::new(rates, self.clock.now()));
        let mut entry = self.entry.write();
        if self.generation.load(Ordering::Acquire) == generation {
            *entry = Some(catalog.clone());
        } else {
            debug!(generation, "Catalog invalidated during fetch, not caching");
        }
        catalog
    }

    /// Counter bumped on every invalidation. Read it before fetching.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Drop the snapshot so the next read refetches.
    pub fn invalidate(&self) {
        let mut entry = self.entry.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        if entry.take().is_some() {
            debug!("Catalog cache invalidated");
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entry = self.entry.read();
        CacheStats {
            cached_rates: entry.as_ref().map(|c| c.len()).unwrap_or(0),
            fetched_at: entry.as_ref().map(|c| c.fetched_at()),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn is_fresh(&self, catalog: &RateCatalog, now: Timestamp) -> bool {
        now.signed_duration_since(catalog.fetched_at()) < self.config.ttl
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub cached_rates: usize,
    pub fetched_at: Option<Timestamp>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}
