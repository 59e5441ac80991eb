//! API Module
//!
//! HTTP handlers and routing for the catalog API.
//!
//! # Endpoints
//! - `GET /:account?ac=class` - Category list
//! - `GET /:account?ac=detail&ids=..` - Item details with play URLs
//! - `GET /:account?t=..&pg=..&wd=..` - One listing page
//! - `GET /stats` - Login cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
