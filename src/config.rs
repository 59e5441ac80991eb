//! Configuration Module
//!
//! Handles loading and managing bridge configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Emby user whose library is browsed when a login response carries no user id.
pub const DEFAULT_USER_ID: &str = "e166b644a9e642d4ad2a1d71c38a1c76";

/// Bridge configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// How long an upstream login is reused, in seconds
    pub auth_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Number of items per catalog page
    pub page_size: u32,
    /// Fallback Emby user id
    pub user_id: String,
    /// Accept self-signed upstream certificates
    pub accept_invalid_certs: bool,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `AUTH_TTL` - Login reuse window in seconds (default: 86400)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `PAGE_SIZE` - Items per catalog page (default: 20)
    /// - `EMBY_USER_ID` - Fallback Emby user id
    /// - `ACCEPT_INVALID_CERTS` - Skip upstream TLS verification (default: true)
    /// - `REQUEST_TIMEOUT` - Upstream request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            auth_ttl: env_or("AUTH_TTL", defaults.auth_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            page_size: env_or("PAGE_SIZE", defaults.page_size).max(1),
            user_id: env::var("EMBY_USER_ID")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.user_id),
            accept_invalid_certs: env_or("ACCEPT_INVALID_CERTS", defaults.accept_invalid_certs),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
        }
    }

    /// Login reuse window as a [`Duration`].
    pub fn auth_ttl(&self) -> Duration {
        Duration::from_secs(self.auth_ttl)
    }

    /// Reaper interval as a [`Duration`], never zero.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }

    /// Upstream request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            auth_ttl: 24 * 60 * 60,
            cleanup_interval: 60,
            page_size: 20,
            user_id: DEFAULT_USER_ID.to_string(),
            accept_invalid_certs: true,
            request_timeout: 30,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
