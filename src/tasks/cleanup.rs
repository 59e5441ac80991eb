//! TTL Cleanup Task
//!
//! Background task that periodically removes expired logins and idle
//! per-account locks from a compute cache.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ComputeCache;

/// Spawns a background task that periodically prunes the given cache.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between passes. Lookups already ignore expired values; this only bounds
/// how long they stay in memory.
///
/// # Arguments
/// * `cache` - Shared cache to prune
/// * `interval` - Time between cleanup passes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let sessions = Arc::new(SessionCache::new());
/// let cleanup_handle = spawn_cleanup_task(sessions.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<K, V>(cache: Arc<ComputeCache<K, V>>, interval: Duration) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let report = cache.prune();

            // Log cleanup statistics
            if report.total() > 0 {
                info!(
                    "TTL cleanup: removed {} expired values and {} idle locks",
                    report.expired_values, report.idle_locks
                );
            } else {
                debug!("TTL cleanup: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(20);

    async fn fill(cache: &ComputeCache<String, String>, key: &str, ttl: Duration) {
        cache
            .compute_if_absent(key.to_string(), || async { Ok::<_, String>("v".to_string()) }, ttl)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = Arc::new(ComputeCache::new());
        fill(&cache, "expire_soon", Duration::from_millis(10)).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lock_count(), 1);

        let handle = spawn_cleanup_task(cache.clone(), TICK);

        // Wait for the entry to expire and cleanup to run
        tokio::time::sleep(TICK * 4).await;

        assert_eq!(cache.len(), 0, "Expired entry should have been cleaned up");
        assert_eq!(cache.lock_count(), 0, "Idle lock should have been cleaned up");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = Arc::new(ComputeCache::new());
        fill(&cache, "long_lived", Duration::from_secs(3600)).await;

        let handle = spawn_cleanup_task(cache.clone(), TICK);

        tokio::time::sleep(TICK * 3).await;

        assert_eq!(cache.get(&"long_lived".to_string()).as_deref(), Some("v"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache: Arc<ComputeCache<String, String>> = Arc::new(ComputeCache::new());

        let handle = spawn_cleanup_task(cache, TICK);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
