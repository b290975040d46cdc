//! Catalog services: credential exchange, catalog lookups, and the album
//! search pipeline that ties them together

pub mod album_search;
pub mod catalog_client;
pub mod credential_exchanger;

pub use album_search::{validate_query, AlbumSearch, AlbumSummary};
pub use catalog_client::{CatalogAlbum, CatalogArtist, CatalogClient, CatalogImage, CatalogTrack};
pub use credential_exchanger::{AccessToken, CredentialExchanger};

use std::fmt;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("album-finder/", env!("CARGO_PKG_VERSION"));

/// Which catalog call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    Search,
    Tracks,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStage::Search => write!(f, "album search"),
            UpstreamStage::Tracks => write!(f, "tracks fetch"),
        }
    }
}

/// Album search errors
///
/// Display strings are the messages returned to the caller.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Query missing, empty or whitespace-only
    #[error("No query provided")]
    InvalidInput,

    /// Identity endpoint refused or could not be reached
    #[error("Spotify token error: {0}")]
    Authentication(String),

    /// Search or track listing call failed
    #[error("Spotify {stage} error: {detail}")]
    Upstream { stage: UpstreamStage, detail: String },

    /// Search succeeded but returned no candidates
    #[error("Album not found.")]
    NotFound,
}

impl CatalogError {
    pub(crate) fn upstream(stage: UpstreamStage, detail: impl Into<String>) -> Self {
        CatalogError::Upstream {
            stage,
            detail: detail.into(),
        }
    }
}

/// Build the HTTP client shared by the exchanger and catalog client
pub fn build_http_client(timeout: Duration) -> af_common::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| af_common::Error::Internal(format!("Failed to build HTTP client: {}", e)))
}
