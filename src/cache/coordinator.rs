//! Compute-Once Coordinator
//!
//! Memoizes the result of an asynchronous computation per key, guaranteeing
//! that concurrent callers for the same cold key trigger the computation only
//! once (single-flight). Every other caller waits on the key's lock and then
//! reads the stored result.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::cache::{CacheStats, ExpiringStore};

// == Lock Handle ==
/// Per-key mutual exclusion handle.
///
/// Handles are cheap clones of one shared mutex; the lock store keeps one
/// reference and every caller currently holding or awaiting the lock keeps
/// another.
#[derive(Debug, Clone, Default)]
pub struct LockHandle {
    mutex: Arc<Mutex<()>>,
}

impl LockHandle {
    /// Creates a handle around a fresh, unlocked mutex.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no caller holds or waits on this handle.
    pub fn is_idle(&self) -> bool {
        Arc::strong_count(&self.mutex) == 1
    }
}

// == Prune Report ==
/// Outcome of one [`ComputeCache::prune`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Values removed because their TTL elapsed
    pub expired_values: usize,
    /// Lock handles removed because nobody referenced them
    pub idle_locks: usize,
}

impl PruneReport {
    /// Total number of entries removed from both stores.
    pub fn total(&self) -> usize {
        self.expired_values + self.idle_locks
    }
}

// == Compute Cache ==
/// Compute-once cache with per-key locking and time-based expiration.
///
/// Lock handles never expire on their own. They are only dropped by
/// [`prune`](Self::prune) once idle, so a handle can never be replaced while a
/// computation for its key is still running.
#[derive(Debug)]
pub struct ComputeCache<K, V>
where
    K: Eq + Hash,
{
    /// Computed results
    values: ExpiringStore<K, V>,
    /// Per-key locks serializing the check-then-compute sequence
    locks: ExpiringStore<K, LockHandle>,
}

impl<K, V> Default for ComputeCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            values: ExpiringStore::default(),
            locks: ExpiringStore::default(),
        }
    }
}

impl<K, V> ComputeCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Compute If Absent ==
    /// Returns the cached value for `key`, running `compute` to produce it on
    /// a miss.
    ///
    /// The per-key lock is held across both the cache check and the
    /// computation, so for a given key at most one computation is in flight.
    /// A successful result is stored for `ttl`; an error is returned to the
    /// caller as-is and nothing is cached, so the next caller retries.
    ///
    /// The lock guard is scoped to this call: it is released when the call
    /// returns, when `compute` fails or panics, and when the returned future
    /// is dropped before completion. In the last case the computation is
    /// abandoned together with the future.
    pub async fn compute_if_absent<F, Fut, E>(
        &self,
        key: K,
        compute: F,
        ttl: Duration,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let handle = self.locks.get_or_insert_with(key.clone(), None, LockHandle::new);
        let _guard = handle.mutex.lock().await;

        if let Some(value) = self.values.get(&key) {
            trace!("compute cache hit");
            return Ok(value);
        }

        debug!("compute cache miss, running computation");
        let value = compute().await?;
        self.values.set(key, value.clone(), Some(ttl));

        Ok(value)
    }

    // == Get ==
    /// Returns the live cached value for `key` without computing anything.
    pub fn get(&self, key: &K) -> Option<V> {
        self.values.get(key)
    }

    // == Prune ==
    /// Removes expired values and lock handles nobody is using.
    pub fn prune(&self) -> PruneReport {
        PruneReport {
            expired_values: self.values.cleanup_expired(),
            idle_locks: self.locks.evict_where(LockHandle::is_idle),
        }
    }

    // == Length ==
    /// Number of stored values, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of lock handles currently installed.
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    // == Stats ==
    /// Hit/miss statistics of the value store.
    ///
    /// Each miss corresponds to one attempted computation.
    pub fn stats(&self) -> CacheStats {
        self.values.stats()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{oneshot, Notify};
    use tokio::task::JoinSet;
    use tokio::time::{sleep, timeout};

    const HOUR: Duration = Duration::from_secs(3600);

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[tokio::test]
    async fn test_two_simultaneous_calls_compute_once() {
        let cache = ComputeCache::new();
        let counter = &AtomicUsize::new(0);

        let compute = move || async move {
            sleep(Duration::from_millis(10)).await;
            Ok::<_, String>(counter.fetch_add(1, Ordering::SeqCst) + 1)
        };

        let (a, b) = tokio::join!(
            cache.compute_if_absent(key("acct1"), compute, HOUR),
            cache.compute_if_absent(key("acct1"), compute, HOUR),
        );

        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_concurrent_callers_compute_once() {
        let cache = Arc::new(ComputeCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for _ in 0..32 {
            let cache = cache.clone();
            let counter = counter.clone();
            tasks.spawn(async move {
                cache
                    .compute_if_absent(
                        key("acct1"),
                        || async move {
                            sleep(Duration::from_millis(20)).await;
                            Ok::<_, String>(counter.fetch_add(1, Ordering::SeqCst) + 1)
                        },
                        HOUR,
                    )
                    .await
            });
        }

        while let Some(result) = tasks.join_next().await {
            assert_eq!(result.unwrap(), Ok(1));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.lock_count(), 1);
    }

    #[tokio::test]
    async fn test_hit_never_recomputes() {
        let cache = ComputeCache::new();
        let counter = &AtomicUsize::new(0);

        for _ in 0..10 {
            let value = cache
                .compute_if_absent(
                    key("acct1"),
                    move || async move { Ok::<_, String>(counter.fetch_add(1, Ordering::SeqCst)) },
                    HOUR,
                )
                .await;
            assert_eq!(value, Ok(0));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 9);
    }

    #[tokio::test]
    async fn test_expired_value_is_recomputed() {
        let cache = ComputeCache::new();
        let counter = &AtomicUsize::new(0);
        let compute = move || async move { Ok::<_, String>(counter.fetch_add(1, Ordering::SeqCst)) };
        let ttl = Duration::from_millis(10);

        assert_eq!(cache.compute_if_absent(key("acct1"), compute, ttl).await, Ok(0));
        sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.compute_if_absent(key("acct1"), compute, ttl).await, Ok(1));

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_distinct_keys_do_not_block_each_other() {
        let cache = Arc::new(ComputeCache::new());
        let release = Arc::new(Notify::new());
        let (started_tx, started_rx) = oneshot::channel();

        // Key A stays in flight until key B has been computed.
        let slow = {
            let cache = cache.clone();
            let release = release.clone();
            tokio::spawn(async move {
                cache
                    .compute_if_absent(
                        key("A"),
                        || async move {
                            let _ = started_tx.send(());
                            release.notified().await;
                            Ok::<_, String>("a")
                        },
                        HOUR,
                    )
                    .await
            })
        };

        started_rx.await.unwrap();
        let fast = timeout(
            Duration::from_secs(1),
            cache.compute_if_absent(key("B"), || async { Ok::<_, String>("b") }, HOUR),
        )
        .await
        .expect("key B must not wait for key A");

        assert_eq!(fast, Ok("b"));
        release.notify_one();
        assert_eq!(slow.await.unwrap(), Ok("a"));
    }

    #[tokio::test]
    async fn test_failure_is_propagated_and_not_cached() {
        let cache: ComputeCache<String, u32> = ComputeCache::new();
        let counter = &AtomicUsize::new(0);

        let failed = cache
            .compute_if_absent(
                key("acct1"),
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>("login refused".to_string())
                },
                HOUR,
            )
            .await;
        assert_eq!(failed, Err("login refused".to_string()));

        let retried = timeout(
            Duration::from_secs(1),
            cache.compute_if_absent(
                key("acct1"),
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(7)
                },
                HOUR,
            ),
        )
        .await
        .expect("lock must be released after a failure");

        assert_eq!(retried, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicking_computation_releases_lock() {
        let cache: Arc<ComputeCache<String, u32>> = Arc::new(ComputeCache::new());

        let panicked = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .compute_if_absent(
                        key("acct1"),
                        || async {
                            if true {
                                panic!("computation blew up");
                            }
                            Ok::<u32, String>(0)
                        },
                        HOUR,
                    )
                    .await
            })
            .await
        };
        assert!(panicked.is_err());

        let value = timeout(
            Duration::from_secs(1),
            cache.compute_if_absent(key("acct1"), || async { Ok::<_, String>(3) }, HOUR),
        )
        .await
        .expect("lock must be released after a panic");
        assert_eq!(value, Ok(3));
    }

    #[tokio::test]
    async fn test_cancelled_caller_releases_lock() {
        let cache: ComputeCache<String, u32> = ComputeCache::new();

        let abandoned = timeout(
            Duration::from_millis(10),
            cache.compute_if_absent(
                key("acct1"),
                || async {
                    sleep(HOUR).await;
                    Ok::<_, String>(1)
                },
                HOUR,
            ),
        )
        .await;
        assert!(abandoned.is_err());

        let value = timeout(
            Duration::from_secs(1),
            cache.compute_if_absent(key("acct1"), || async { Ok::<_, String>(2) }, HOUR),
        )
        .await
        .expect("lock must be released when the caller gives up");
        assert_eq!(value, Ok(2));
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let cache: ComputeCache<String, String> = ComputeCache::new();

        let failed = cache
            .compute_if_absent(key("K"), || async { Err::<String, _>("boom") }, HOUR)
            .await;
        let other = cache
            .compute_if_absent(key("K2"), || async { Ok::<_, &str>("k2".to_string()) }, HOUR)
            .await;

        assert_eq!(failed, Err("boom"));
        assert_eq!(other.as_deref(), Ok("k2"));
        assert!(cache.get(&key("K")).is_none());
        assert_eq!(cache.get(&key("K2")).as_deref(), Some("k2"));
    }

    #[tokio::test]
    async fn test_prune_keeps_locks_in_use() {
        let cache = Arc::new(ComputeCache::new());
        let release = Arc::new(Notify::new());
        let (started_tx, started_rx) = oneshot::channel();

        let running = {
            let cache = cache.clone();
            let release = release.clone();
            tokio::spawn(async move {
                cache
                    .compute_if_absent(
                        key("busy"),
                        || async move {
                            let _ = started_tx.send(());
                            release.notified().await;
                            Ok::<_, String>(1)
                        },
                        Duration::from_millis(1),
                    )
                    .await
            })
        };

        started_rx.await.unwrap();
        assert_eq!(cache.prune().idle_locks, 0);
        assert_eq!(cache.lock_count(), 1);

        release.notify_one();
        assert_eq!(running.await.unwrap(), Ok(1));
        sleep(Duration::from_millis(5)).await;

        let report = cache.prune();
        assert_eq!(report, PruneReport { expired_values: 1, idle_locks: 1 });
        assert_eq!(report.total(), 2);
        assert_eq!(cache.lock_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lock_handle_idle_tracking() {
        let handle = LockHandle::new();
        assert!(handle.is_idle());

        let clone = handle.clone();
        assert!(!handle.is_idle());

        drop(clone);
        assert!(handle.is_idle());
    }
}
