//! Per-node cache of probed path limits.
//!
//! Probing can cost a round-trip to the agent, so the first answer for a node
//! identity is kept. Entries leave the cache in two ways: the execution layer
//! calls [`LimitCache::invalidate`] / [`LimitCache::invalidate_node`] when a
//! node disconnects or reconnects, and the LRU bound drops identities nobody
//! asks about anymore. The cache never keeps anything about a node alive.

use crate::types::{NodeIdentity, PathLimit};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Thread-safe, bounded map from node identity to its path limit.
///
/// Two decisions racing on a fresh node may both probe and both store; probe
/// results for one identity are constant, so whichever write lands last is
/// as good as the first.
pub struct LimitCache {
    entries: Mutex<LruCache<NodeIdentity, PathLimit>>,
}

impl LimitCache {
    /// Create a cache holding at most `capacity` nodes (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<NodeIdentity, PathLimit>> {
        // Entries are plain values; a panic elsewhere cannot leave one half written.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, node: &NodeIdentity) -> Option<PathLimit> {
        self.lock().get(node).copied()
    }

    pub fn put(&self, node: NodeIdentity, limit: PathLimit) {
        debug!(node = %node, limit = limit.chars(), "Caching node path limit");
        self.lock().put(node, limit);
    }

    /// Forget one node identity.
    pub fn invalidate(&self, node: &NodeIdentity) -> Option<PathLimit> {
        let removed = self.lock().pop(node);
        if removed.is_some() {
            debug!(node = %node, "Invalidated cached path limit");
        }
        removed
    }

    /// Forget every session of the node called `name`.
    ///
    /// Meant for reconnect handling, where the caller knows the node name but
    /// not necessarily the session that went stale.
    pub fn invalidate_node(&self, name: &str) -> usize {
        let mut entries = self.lock();
        let stale: Vec<NodeIdentity> = entries
            .iter()
            .filter(|(id, _)| id.name() == name)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            entries.pop(id);
        }
        if !stale.is_empty() {
            debug!(node = name, removed = stale.len(), "Invalidated cached path limits");
        }
        stale.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}

impl Default for LimitCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for LimitCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimitCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
