//! Cache Store Module
//!
//! Concurrent key-value storage with per-entry TTL. Expiry is enforced at
//! read time; physical removal happens lazily on access or in bulk through
//! [`ExpiringStore::cleanup_expired`], which the background reaper calls.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats};

// == Expiring Store ==
/// Key-value storage with TTL expiration, safe to share across tasks.
///
/// All operations take `&self`; entries are replaced as a whole, so a reader
/// never observes a partially written value.
#[derive(Debug)]
pub struct ExpiringStore<K, V>
where
    K: Eq + Hash,
{
    /// Key-value storage
    entries: DashMap<K, CacheEntry<V>>,
    /// Performance statistics
    stats: StatsCounters,
}

impl<K, V> Default for ExpiringStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsCounters::default(),
        }
    }
}

impl<K, V> ExpiringStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is overwritten and its expiry is
    /// reset. A `ttl` of `None` stores an entry that never expires.
    pub fn set(&self, key: K, value: V, ttl: Option<Duration>) {
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Retrieves a clone of the live value for `key`.
    ///
    /// Expired entries are never returned. They are removed on the spot unless
    /// a concurrent `set` already replaced them with a fresh entry.
    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        // The read guard above is released here; removing while holding it
        // would deadlock on the shard lock.
        if expired
            && self
                .entries
                .remove_if(key, |_, entry| entry.is_expired())
                .is_some()
        {
            self.stats.record_expirations(1);
        }

        self.stats.record_miss();
        None
    }

    // == Get Or Insert ==
    /// Returns the live value for `key`, inserting `make()` if there is none.
    ///
    /// The check and the insert happen under a single entry lock, so
    /// concurrent callers racing on the same key all receive the one value
    /// that got installed. An expired entry counts as absent and is replaced.
    ///
    /// `make` runs while the key's shard is locked and must be cheap.
    pub fn get_or_insert_with<F>(&self, key: K, ttl: Option<Duration>, make: F) -> V
    where
        F: FnOnce() -> V,
    {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_expired() {
                    self.stats.record_hit();
                    return occupied.get().value.clone();
                }

                self.stats.record_expirations(1);
                self.stats.record_miss();
                let value = make();
                occupied.insert(CacheEntry::new(value.clone(), ttl));
                value
            }
            Entry::Vacant(vacant) => {
                self.stats.record_miss();
                let value = make();
                vacant.insert(CacheEntry::new(value.clone(), ttl));
                value
            }
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });

        self.stats.record_expirations(removed);
        removed
    }

    // == Evict Where ==
    /// Removes every entry whose value matches `predicate`, regardless of TTL.
    ///
    /// Returns the number of entries removed.
    pub fn evict_where<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&V) -> bool,
    {
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            if predicate(&entry.value) {
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }
}
