//! API Routes
//!
//! Configures the Axum router with all bridge endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{catalog_handler, health_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /:account` - Catalog API for the encoded Emby account
/// - `GET /stats` - Login cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static routes take precedence over the account capture
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/:account", get(catalog_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    async fn status_of(uri: &str) -> StatusCode {
        let state = AppState::from_config(&Config::default()).unwrap();
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        create_router(state).oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_static_routes_resolve() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
        assert_eq!(status_of("/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_detail_without_ids_is_bad_request() {
        assert_eq!(status_of("/eA==?ac=detail").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_account_is_reported_in_body() {
        assert_eq!(status_of("/not%20base64?ac=class").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_nested_path_is_not_found() {
        assert_eq!(status_of("/a/b").await, StatusCode::NOT_FOUND);
    }
}
