//! af-search library interface
//!
//! Album search proxy: exchanges service credentials for a catalog token,
//! looks up the top album match and its tracks, and returns one normalized
//! JSON result. Exposed as a library so integration tests can drive the
//! router directly.

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use af_common::config::ServiceConfig;
use axum::http::Method;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::services::AlbumSearch;

/// Application state shared across handlers
///
/// Holds no per-request data; every search builds its own token and results.
#[derive(Clone)]
pub struct AppState {
    /// Search pipeline (credential exchanger + catalog client)
    pub album_search: Arc<AlbumSearch>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(album_search: AlbumSearch) -> Self {
        Self {
            album_search: Arc::new(album_search),
            startup_time: Utc::now(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> af_common::Result<Self> {
        Ok(Self::new(AlbumSearch::from_config(config)?))
    }
}

/// Build application router
///
/// The browser form may be served from another origin, so GET is allowed
/// cross-origin.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .merge(api::album_routes())
        .merge(api::health_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
