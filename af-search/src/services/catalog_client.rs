//! Spotify catalog API client
//!
//! Two lookups, both authorized with a bearer token:
//! - `GET {base}/search?type=album&q=..&limit=1` (top album candidate)
//! - `GET {base}/albums/{id}/tracks` (track listing for that album)
//!
//! No pagination: only the first page of tracks the catalog returns is used.

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{AccessToken, CatalogError, UpstreamStage};

/// Album entry from the catalog search
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    /// Catalog album identifier
    pub id: String,
    /// Album title
    pub name: String,
    /// Cover images, largest first
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    /// Contributing artists in credit order
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    /// "YYYY-MM-DD", "YYYY-MM" or "YYYY" depending on release_date_precision
    #[serde(default)]
    pub release_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

/// Track entry from an album's track listing
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub name: String,
}

/// Paging object wrapping catalog result lists
///
/// `items` is required: a success body without it is a malformed response,
/// not an empty result.
#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: Page<CatalogAlbum>,
}

/// Catalog API client
pub struct CatalogClient {
    http_client: reqwest::Client,
    api_base: Url,
}

impl CatalogClient {
    /// Create a client rooted at `api_base_url` (e.g. "https://api.spotify.com/v1")
    pub fn new(http_client: reqwest::Client, api_base_url: &str) -> af_common::Result<Self> {
        let api_base = Url::parse(api_base_url).map_err(|e| {
            af_common::Error::Config(format!(
                "Invalid catalog API base URL '{}': {}",
                api_base_url, e
            ))
        })?;

        if api_base.cannot_be_a_base() {
            return Err(af_common::Error::Config(format!(
                "Catalog API base URL '{}' cannot carry a path",
                api_base_url
            )));
        }

        Ok(Self {
            http_client,
            api_base,
        })
    }

    /// Append path segments to the API base; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Search for albums matching `query`, returning the top candidate if any
    pub async fn search_album(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> Result<Option<CatalogAlbum>, CatalogError> {
        let url = self.endpoint(&["search"]);

        debug!(url = %url, query = %query, "Searching catalog for album");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.secret())
            .query(&[("type", "album"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| CatalogError::upstream(UpstreamStage::Search, e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_text, "Catalog album search failed");
            return Err(CatalogError::upstream(
                UpstreamStage::Search,
                format!("HTTP {}", status),
            ));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            CatalogError::upstream(UpstreamStage::Search, format!("invalid response: {}", e))
        })?;

        Ok(body.albums.items.into_iter().next())
    }

    /// Fetch the track listing for an album, in catalog order
    pub async fn album_tracks(
        &self,
        token: &AccessToken,
        album_id: &str,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let url = self.endpoint(&["albums", album_id, "tracks"]);

        debug!(url = %url, album_id = %album_id, "Fetching album tracks");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| CatalogError::upstream(UpstreamStage::Tracks, e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_text, "Catalog track listing failed");
            return Err(CatalogError::upstream(
                UpstreamStage::Tracks,
                format!("HTTP {}", status),
            ));
        }

        let page: Page<CatalogTrack> = response.json().await.map_err(|e| {
            CatalogError::upstream(UpstreamStage::Tracks, format!("invalid response: {}", e))
        })?;

        Ok(page.items)
    }
}
