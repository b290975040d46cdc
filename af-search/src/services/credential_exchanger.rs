//! Client-credentials token exchange
//!
//! One POST to the identity endpoint with HTTP Basic auth and
//! `grant_type=client_credentials`. A fresh token is fetched for every
//! search; nothing is cached or refreshed.

use af_common::config::ServiceCredentials;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

use super::CatalogError;

/// Bearer token for catalog calls
///
/// Lives for one proxy invocation. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token for the `Authorization: Bearer` header
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges service credentials for a bearer token
pub struct CredentialExchanger {
    http_client: reqwest::Client,
    token_url: String,
    credentials: ServiceCredentials,
}

impl CredentialExchanger {
    pub fn new(
        http_client: reqwest::Client,
        token_url: impl Into<String>,
        credentials: ServiceCredentials,
    ) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
            credentials,
        }
    }

    /// Request a new access token
    ///
    /// Empty credentials are sent as-is; the identity endpoint rejects them.
    /// Any failure (transport, status, body) is an authentication error.
    pub async fn exchange(&self) -> Result<AccessToken, CatalogError> {
        debug!(token_url = %self.token_url, "Requesting client-credentials token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::Authentication(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_text, "Identity endpoint rejected token request");
            return Err(CatalogError::Authentication(format!("HTTP {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Authentication(format!("invalid token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(CatalogError::Authentication(
                "empty access token in response".to_string(),
            ));
        }

        debug!("Obtained access token");
        Ok(AccessToken(token.access_token))
    }
}
