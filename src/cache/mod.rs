//! Cache Module
//!
//! In-memory caching with TTL expiration and compute-once coordination.

mod coordinator;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use coordinator::{ComputeCache, LockHandle, PruneReport};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ExpiringStore;
