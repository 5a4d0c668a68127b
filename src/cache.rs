//! Per-session read cache for query results.
//!
//! Entries are grouped by logical resource. A committed write marks every
//! entry of its resource stale instead of dropping it, so the next read
//! refetches while the last snapshot is still there to show.

use crate::types::{DeploymentMeta, Filter};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

/// Logical resource holding deployment metadata listings.
pub const METAS: &str = "metas";

/// Cache key: a logical resource plus the filter set that scoped the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: &'static str,
    pub filters: Vec<Filter>,
}

impl CacheKey {
    pub fn metas(filters: &[Filter]) -> Self {
        Self {
            resource: METAS,
            filters: filters.to_vec(),
        }
    }
}

/// Last fetched full result set for a key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub items: Vec<DeploymentMeta>,
    pub stale: bool,
    pub fetched_at: SystemTime,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, CacheEntry>,
    generations: HashMap<&'static str, u64>,
}

/// Query result cache shared by the executor and the query client.
#[derive(Debug, Default)]
pub struct MetaCache {
    inner: RwLock<Inner>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached items for `key`, only if present and not stale.
    pub fn fresh(&self, key: &CacheKey) -> Option<Vec<DeploymentMeta>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.items.clone())
    }

    /// Snapshot of the entry for `key`, stale or not.
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(key).cloned()
    }

    /// Store a freshly fetched result set, replacing any previous entry.
    pub fn store(&self, key: CacheKey, items: Vec<DeploymentMeta>) {
        let generation = self.generation(key.resource);
        self.store_at(key, items, generation);
    }

    /// Store a result set fetched while the resource was at `generation`.
    ///
    /// If an invalidation landed since, the items may predate that write, so
    /// the entry goes in already stale. Returns whether it was stored fresh.
    pub fn store_at(&self, key: CacheKey, items: Vec<DeploymentMeta>, generation: u64) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let current = inner.generations.get(key.resource).copied().unwrap_or(0);
        let fresh = current == generation;
        if !fresh {
            tracing::debug!(
                resource = key.resource,
                fetched_at = generation,
                current,
                "write landed during fetch, storing stale"
            );
        }
        inner.entries.insert(
            key,
            CacheEntry {
                items,
                stale: !fresh,
                fetched_at: SystemTime::now(),
            },
        );
        fresh
    }

    /// Mark every entry of `resource` stale. Returns how many entries were hit.
    ///
    /// Counts as one invalidation of the resource even when nothing is cached,
    /// so a read in flight across the write stores its result stale (see
    /// [`MetaCache::store_at`]).
    pub fn invalidate(&self, resource: &'static str) -> usize {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *inner.generations.entry(resource).or_insert(0) += 1;

        let mut hit = 0;
        for (key, entry) in inner.entries.iter_mut() {
            if key.resource == resource {
                entry.stale = true;
                hit += 1;
            }
        }
        tracing::debug!(resource, entries = hit, "cache invalidated");
        hit
    }

    /// How many times `resource` has been invalidated.
    pub fn generation(&self, resource: &str) -> u64 {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.generations.get(resource).copied().unwrap_or(0)
    }

    /// Drop every entry. Used on sign-out.
    ///
    /// Generations keep counting so a read started before the clear cannot
    /// land as fresh after a later write.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.entries.clear();
    }
}
