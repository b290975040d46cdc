//! Album search pipeline
//!
//! validate → authenticate → search → track lookup → normalize.
//! Each step needs the previous step's output, so the calls run strictly in
//! sequence. The first failure ends the request; there are no retries and no
//! partial results.

use af_common::config::ServiceConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    build_http_client, AccessToken, CatalogAlbum, CatalogClient, CatalogError, CatalogTrack,
    CredentialExchanger,
};

/// Normalized album result returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumSummary {
    /// Album title
    pub album: String,
    /// Artist names joined with ", "
    pub artist: String,
    /// Release year (release date up to the first '-')
    pub year: String,
    /// Largest cover image URL, or "" when the album has none
    pub cover: String,
    /// Track titles in catalog order
    pub tracks: Vec<String>,
}

impl AlbumSummary {
    pub fn from_catalog(album: CatalogAlbum, tracks: Vec<CatalogTrack>) -> Self {
        let artist = album
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let year = release_year(&album.release_date).to_string();

        let cover = album
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .unwrap_or_default();

        Self {
            album: album.name,
            artist,
            year,
            cover,
            tracks: tracks.into_iter().map(|t| t.name).collect(),
        }
    }
}

/// Year segment of a catalog release date; a bare year passes through
fn release_year(release_date: &str) -> &str {
    release_date
        .split_once('-')
        .map_or(release_date, |(year, _)| year)
}

/// Reject missing, empty and whitespace-only queries
///
/// The accepted query is returned untrimmed and forwarded verbatim.
pub fn validate_query(query: Option<&str>) -> Result<&str, CatalogError> {
    match query {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(CatalogError::InvalidInput),
    }
}

/// Search proxy: one free-text query in, one normalized album out
pub struct AlbumSearch {
    exchanger: CredentialExchanger,
    catalog: CatalogClient,
}

impl AlbumSearch {
    pub fn new(exchanger: CredentialExchanger, catalog: CatalogClient) -> Self {
        Self { exchanger, catalog }
    }

    /// Wire the exchanger and catalog client from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> af_common::Result<Self> {
        let http_client = build_http_client(config.http_timeout)?;

        let exchanger = CredentialExchanger::new(
            http_client.clone(),
            config.endpoints.token_url.clone(),
            config.credentials.clone(),
        );
        let catalog = CatalogClient::new(http_client, &config.endpoints.api_base_url)?;

        Ok(Self::new(exchanger, catalog))
    }

    /// Run the full pipeline for one query
    pub async fn search(&self, query: Option<&str>) -> Result<AlbumSummary, CatalogError> {
        let query = validate_query(query)?;

        let token: AccessToken = self.exchanger.exchange().await?;

        let album = self
            .catalog
            .search_album(&token, query)
            .await?
            .ok_or(CatalogError::NotFound)?;

        debug!(album_id = %album.id, album = %album.name, "Top album candidate");

        let tracks = self.catalog.album_tracks(&token, &album.id).await?;
        let album_id = album.id.clone();
        let summary = AlbumSummary::from_catalog(album, tracks);

        info!(
            query = %query,
            album_id = %album_id,
            album = %summary.album,
            tracks = summary.tracks.len(),
            "Album search complete"
        );

        Ok(summary)
    }
}
