//! Error types for the bridge
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::{ErrorResponse, VodResponse};

/// Body returned for any upstream data failure; the cause only goes to the log.
pub const PROCESSING_FAILED: &str = "Failed to process data";

// == Bridge Error Enum ==
/// Unified error type for the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The account path segment could not be decoded
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// Emby rejected the login
    #[error("登录 Emby 失败：{0}")]
    AuthFailed(String),

    /// Emby answered a data call with a non-success status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Transport-level failure talking to Emby
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Emby returned a body that does not match the expected schema
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        match &self {
            // Catalog clients only render the list, so account and login
            // problems are reported as a single pseudo item.
            BridgeError::InvalidAccount(_) | BridgeError::AuthFailed(_) => {
                warn!("{}", self);
                (StatusCode::OK, Json(VodResponse::message_item(self.to_string()))).into_response()
            }
            BridgeError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg.clone()))).into_response()
            }
            BridgeError::Upstream(_) | BridgeError::Http(_) | BridgeError::Decode(_) => {
                error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(PROCESSING_FAILED)),
                )
                    .into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the bridge.
pub type Result<T> = std::result::Result<T, BridgeError>;
