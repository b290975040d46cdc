//! Album search endpoint
//!
//! `GET /api/album?q=<text>` (also `/album`, the path the browser form uses)

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::services::AlbumSummary;
use crate::AppState;

/// Query parameters for album search
#[derive(Debug, Deserialize)]
pub struct AlbumQuery {
    /// Free-text album query
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/album?q=thriller
///
/// 200 with the normalized album, 400 for a missing or blank query,
/// 404 when the catalog has no match, 500 for auth or upstream failures.
pub async fn search_album(
    State(state): State<AppState>,
    query: Result<Query<AlbumQuery>, QueryRejection>,
) -> ApiResult<Json<AlbumSummary>> {
    // An unparseable query string counts as no query
    let q = match query {
        Ok(Query(params)) => params.q,
        Err(rejection) => {
            debug!(error = %rejection, "Unparseable query string");
            None
        }
    };

    let summary = state.album_search.search(q.as_deref()).await?;
    Ok(Json(summary))
}

/// Build album search routes
pub fn album_routes() -> Router<AppState> {
    Router::new()
        .route("/api/album", get(search_album))
        .route("/album", get(search_album))
}
