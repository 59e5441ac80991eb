//! VOD Bridge - Emby to VOD catalog adapter
//!
//! Serves the VOD catalog API from an Emby server, memoizing one upstream
//! login per account with a compute-once cache.

pub mod api;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use bridge::Bridge;
pub use cache::ComputeCache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
