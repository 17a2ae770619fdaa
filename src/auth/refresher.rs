//! Token refresher
//!
//! Exchanges a refresh token for a new access token. One call per
//! `refresh`, no internal retry: the fetch controller owns retry policy.

use super::types::{RefreshRequest, RefreshResponse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Exchanges a refresh token for a new access token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Perform a single exchange. Any failure is `Error::AuthExpired`.
    async fn refresh(&self, refresh_token: &str) -> Result<String>;
}

/// Refresher that calls a JSON refresh endpoint
///
/// Request: `POST { "refresh_token": ... }`, response `{ "access_token": ... }`.
pub struct HttpTokenRefresher {
    refresh_url: String,
    http_client: Client,
}

impl HttpTokenRefresher {
    /// Create a refresher with its own HTTP client
    pub fn new(refresh_url: impl Into<String>) -> Self {
        Self {
            refresh_url: refresh_url.into(),
            http_client: Client::new(),
        }
    }

    /// Create a refresher sharing an existing HTTP client
    pub fn with_client(refresh_url: impl Into<String>, http_client: Client) -> Self {
        Self {
            refresh_url: refresh_url.into(),
            http_client,
        }
    }

    /// Create a refresher with a request timeout
    pub fn with_timeout(refresh_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(refresh_url, http_client))
    }

    /// The endpoint this refresher calls
    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        debug!("Refreshing access token via {}", self.refresh_url);

        let response = self
            .http_client
            .post(&self.refresh_url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| Error::auth_expired(format!("refresh request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Token refresh rejected with status {}", status);
            return Err(Error::auth_expired(format!(
                "refresh rejected with status {status}: {body}"
            )));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| Error::auth_expired(format!("invalid refresh response: {e}")))?;

        body.access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth_expired("refresh response has no access_token"))
    }
}

impl std::fmt::Debug for HttpTokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTokenRefresher")
            .field("refresh_url", &self.refresh_url)
            .finish_non_exhaustive()
    }
}
