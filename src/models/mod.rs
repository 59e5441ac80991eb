//! Request and Response models for the bridge
//!
//! This module defines the DTOs (Data Transfer Objects) exchanged with Emby
//! and with catalog clients.

pub mod emby;
pub mod requests;
pub mod responses;
pub mod vod;

// Re-export commonly used types
pub use emby::{EmbyAuthResponse, EmbyItem, EmbyItemsResponse, EmbyUserData};
pub use requests::{CatalogAction, CatalogQuery};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
pub use vod::{VodClass, VodItem, VodResponse};
