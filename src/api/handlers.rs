//! API Handlers
//!
//! HTTP request handlers for each bridge endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use crate::bridge::Bridge;
use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::models::{CatalogAction, CatalogQuery, HealthResponse, StatsResponse, VodResponse};
use crate::upstream::{Account, SessionCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog operations and the login cache they share
    pub bridge: Arc<Bridge>,
}

impl AppState {
    /// Creates a new AppState with the given bridge.
    pub fn new(bridge: Bridge) -> Self {
        Self {
            bridge: Arc::new(bridge),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Bridge::from_config(config)?))
    }

    /// The login cache, for the background reaper.
    pub fn sessions(&self) -> Arc<SessionCache> {
        self.bridge.sessions().clone()
    }
}

/// Handler for GET /:account
///
/// Dispatches on `ac`: categories, item details, or a listing page.
pub async fn catalog_handler(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<VodResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(BridgeError::InvalidRequest(error_msg));
    }

    let account = Account::decode(&account)?;
    let action = query.action();
    debug!(?action, upstream = %account.base_url, "catalog request");

    let response = match action {
        CatalogAction::Class => state.bridge.classes(&account).await?,
        CatalogAction::Detail => state.bridge.details(&account, &query.detail_ids()).await?,
        CatalogAction::List => {
            state
                .bridge
                .list(&account, query.category(), query.page(), query.search())
                .await?
        }
    };

    Ok(Json(response))
}

/// Handler for GET /stats
///
/// Returns login cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let sessions = state.bridge.sessions();
    Json(StatsResponse::new(&sessions.stats(), sessions.lock_count()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::from_config(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.lock_handles, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_catalog_rejects_bad_account() {
        let result = catalog_handler(
            State(state()),
            Path("not-base64!".to_string()),
            Query(CatalogQuery::default()),
        )
        .await;

        assert!(matches!(result, Err(BridgeError::InvalidAccount(_))));
    }

    #[tokio::test]
    async fn test_catalog_detail_requires_ids() {
        let query = CatalogQuery {
            ac: Some("detail".to_string()),
            ..CatalogQuery::default()
        };
        let result = catalog_handler(State(state()), Path("eA==".to_string()), Query(query)).await;

        assert!(matches!(result, Err(BridgeError::InvalidRequest(_))));
    }
}
