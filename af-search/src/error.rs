//! HTTP error type for af-search
//!
//! Every failure leaves the service as `{ "error": "<message>" }` with the
//! status for its category.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::CatalogError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500): authentication or upstream failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::InvalidInput => ApiError::BadRequest(message),
            CatalogError::NotFound => ApiError::NotFound(message),
            CatalogError::Authentication(_) | CatalogError::Upstream { .. } => {
                ApiError::Internal(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = %status, error = %message, "Request failed");
        } else {
            warn!(status = %status, error = %message, "Request rejected");
        }

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
