//! Bounded LRU cache of compiled expansion plans.

use crate::plan::ExpansionPlan;
use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Capacity used when a configuration asks for zero entries.
pub const DEFAULT_PLAN_CACHE_CAPACITY: usize = 1024;

/// Cache key: the document type plus a SHA-256 digest of the raw request.
///
/// The digest is taken before normalization, so `"a,b"` and `"a, b"` are
/// cached separately even though they compile to the same plan.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    doc_type: String,
    digest: [u8; 32],
}

impl PlanKey {
    pub fn new(doc_type: &str, raw_request: &str) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            digest: Sha256::digest(raw_request.as_bytes()).into(),
        }
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

impl fmt::Debug for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlanKey({self})")
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.doc_type, &self.digest_hex()[..12])
    }
}

/// Hit/miss counters for a [`PlanCache`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit ratio as a percentage.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Thread-safe LRU of compiled plans.
///
/// Created alongside the planner at service startup and never cleared
/// implicitly. Every lookup mutates recency, so readers share one mutex and
/// run one at a time; the critical section is a hash probe plus an `Arc`
/// clone. Compilation happens outside the lock, and
/// [`insert_if_absent`](Self::insert_if_absent) makes concurrent
/// compilations of the same key converge on one entry.
pub struct PlanCache {
    entries: Mutex<LruCache<PlanKey, Arc<ExpansionPlan>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PlanCache {
    /// Creates a cache holding at most `capacity` plans.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_PLAN_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up a plan, marking it most recently used.
    pub fn get(&self, key: &PlanKey) -> Option<Arc<ExpansionPlan>> {
        let found = self.entries.lock().get(key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores `plan` unless another caller already stored one for `key`,
    /// and returns whichever plan is now cached.
    pub fn insert_if_absent(&self, key: PlanKey, plan: Arc<ExpansionPlan>) -> Arc<ExpansionPlan> {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&key) {
            return Arc::clone(existing);
        }
        entries.put(key, Arc::clone(&plan));
        plan
    }

    /// Checks for a key without touching recency or statistics.
    pub fn contains(&self, key: &PlanKey) -> bool {
        self.entries.lock().contains(key)
    }

    /// Drops every cached plan. Statistics are kept.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new(DEFAULT_PLAN_CACHE_CAPACITY)
    }
}

impl fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}
