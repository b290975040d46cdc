//! Fake catalog server for integration tests
//!
//! Serves the identity endpoint (`POST /api/token`), album search
//! (`GET /v1/search`) and track listing (`GET /v1/albums/:id/tracks`) on an
//! ephemeral localhost port. Every request is recorded so tests can assert
//! which upstream calls were (and were not) made.

use af_common::config::{ConfigOverrides, ServiceConfig, TomlConfig};
use af_search::{build_router, AppState};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-id";
pub const CLIENT_SECRET: &str = "test-secret";
/// base64("test-id:test-secret")
pub const EXPECTED_BASIC_AUTH: &str = "Basic dGVzdC1pZDp0ZXN0LXNlY3JldA==";
pub const ACCESS_TOKEN: &str = "fake-access-token";
pub const ALBUM_ID: &str = "2ANVost0y2y52ema1E9xAZ";

/// Which upstream endpoint a request hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Token,
    Search,
    Tracks(String),
}

/// One recorded upstream request
#[derive(Debug, Clone)]
pub struct Hit {
    pub endpoint: Endpoint,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: HashMap<String, String>,
    pub body: String,
}

/// Canned upstream behavior
#[derive(Debug, Clone)]
pub struct FakeCatalogConfig {
    pub token_status: StatusCode,
    /// Token handed out by a successful exchange
    pub access_token: String,
    pub search_status: StatusCode,
    pub search_body: Value,
    pub tracks_status: StatusCode,
    pub tracks_body: Value,
}

impl Default for FakeCatalogConfig {
    /// The Thriller example: one candidate, two tracks
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            access_token: ACCESS_TOKEN.to_string(),
            search_status: StatusCode::OK,
            search_body: search_body(vec![album_json(
                ALBUM_ID,
                "Thriller",
                &["Michael Jackson"],
                "1982-11-30",
                &["http://x/cover.jpg"],
            )]),
            tracks_status: StatusCode::OK,
            tracks_body: tracks_body(&["Wanna Be Startin' Somethin'", "Thriller"]),
        }
    }
}

/// Catalog album object as the search endpoint returns it
pub fn album_json(
    id: &str,
    name: &str,
    artists: &[&str],
    release_date: &str,
    images: &[&str],
) -> Value {
    json!({
        "album_type": "album",
        "id": id,
        "name": name,
        "release_date": release_date,
        "release_date_precision": "day",
        "total_tracks": 9,
        "artists": artists
            .iter()
            .map(|name| json!({ "id": format!("artist-{}", name), "name": name, "type": "artist" }))
            .collect::<Vec<_>>(),
        "images": images
            .iter()
            .map(|url| json!({ "url": url, "height": 640, "width": 640 }))
            .collect::<Vec<_>>(),
    })
}

/// Search response wrapping album items
pub fn search_body(items: Vec<Value>) -> Value {
    json!({
        "albums": {
            "href": "https://api.spotify.com/v1/search",
            "limit": 1,
            "offset": 0,
            "total": items.len(),
            "items": items,
        }
    })
}

/// Track listing page
pub fn tracks_body(names: &[&str]) -> Value {
    json!({
        "limit": 20,
        "offset": 0,
        "total": names.len(),
        "items": names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "name": name, "track_number": i + 1 }))
            .collect::<Vec<_>>(),
    })
}

#[derive(Clone)]
struct FakeState {
    config: FakeCatalogConfig,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl FakeState {
    fn record(
        &self,
        endpoint: Endpoint,
        headers: &HeaderMap,
        query: HashMap<String, String>,
        body: String,
    ) {
        let header_value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        self.hits.lock().unwrap().push(Hit {
            endpoint,
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
            query,
            body,
        });
    }
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", ACCESS_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
    )
        .into_response()
}

async fn token(State(state): State<FakeState>, headers: HeaderMap, body: String) -> Response {
    state.record(Endpoint::Token, &headers, HashMap::new(), body);

    if state.config.token_status != StatusCode::OK {
        return (
            state.config.token_status,
            Json(json!({ "error": "server_error" })),
        )
            .into_response();
    }

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == EXPECTED_BASIC_AUTH)
        .unwrap_or(false);

    if !authorized {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_client", "error_description": "Invalid client" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": state.config.access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn search(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(Endpoint::Search, &headers, query, String::new());

    if !bearer_ok(&headers) {
        return unauthorized();
    }

    (state.config.search_status, Json(state.config.search_body.clone())).into_response()
}

async fn tracks(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(Endpoint::Tracks(id), &headers, HashMap::new(), String::new());

    if !bearer_ok(&headers) {
        return unauthorized();
    }

    (state.config.tracks_status, Json(state.config.tracks_body.clone())).into_response()
}

/// Running fake catalog
pub struct FakeCatalog {
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl FakeCatalog {
    /// Start a fake catalog on an ephemeral port
    pub async fn start(config: FakeCatalogConfig) -> Self {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            config,
            hits: hits.clone(),
        };

        let router = Router::new()
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .route("/v1/albums/:id/tracks", get(tracks))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake catalog");
        let addr = listener.local_addr().expect("fake catalog address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("fake catalog server");
        });

        Self { addr, hits }
    }

    /// Service configuration pointing at this fake with the given credentials
    pub fn service_config_with(&self, client_id: &str, client_secret: &str) -> ServiceConfig {
        let overrides = ConfigOverrides {
            client_id: Some(client_id.to_string()),
            client_secret: Some(client_secret.to_string()),
            token_url: Some(format!("http://{}/api/token", self.addr)),
            api_base_url: Some(format!("http://{}/v1", self.addr)),
            http_timeout_secs: Some(5),
            ..Default::default()
        };

        ServiceConfig::resolve(overrides, TomlConfig::default()).expect("valid test config")
    }

    pub fn service_config(&self) -> ServiceConfig {
        self.service_config_with(CLIENT_ID, CLIENT_SECRET)
    }

    /// Router under test, wired to this fake
    pub fn app(&self) -> Router {
        self.app_with_config(&self.service_config())
    }

    pub fn app_with_config(&self, config: &ServiceConfig) -> Router {
        build_router(AppState::from_config(config).expect("app state"))
    }

    /// All recorded requests, in arrival order
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// Endpoints hit, in arrival order
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.hits().into_iter().map(|h| h.endpoint).collect()
    }
}
