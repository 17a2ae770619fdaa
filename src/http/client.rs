//! HTTP listing client
//!
//! Implements [`ListingTransport`] over reqwest:
//! - POSTs the page request as JSON with a bearer token
//! - throttles outgoing requests through an optional rate limiter
//! - classifies responses: 401, application message, bad status, bad body

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::pagination::{ListingResponseBody, ListingTransport, PageRequest, PageResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("solidafy-pager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    #[must_use]
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Listing endpoint client
pub struct HttpListingClient {
    client: Client,
    listing_url: String,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpListingClient {
    /// Create a client with default configuration
    pub fn new(listing_url: impl Into<String>) -> Result<Self> {
        Self::with_config(listing_url, HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(listing_url: impl Into<String>, config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            listing_url: listing_url.into(),
            config,
            rate_limiter,
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Fetch one page and decode its records as `R`
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        request: &PageRequest,
        access_token: &str,
    ) -> Result<PageResponse<R>> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self
            .client
            .post(&self.listing_url)
            .bearer_auth(access_token)
            .json(&request.to_wire());
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            debug!("Listing request rejected with 401");
            return Err(Error::Unauthorized);
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let page = decode_listing(status, &body)?;
        debug!(
            "Fetched {} records, next_cursor={:?}",
            page.items.len(),
            page.next_cursor
        );
        Ok(page)
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            #[allow(clippy::cast_possible_truncation)]
            return Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            };
        }
        Error::Http(err)
    }
}

#[async_trait]
impl<R: DeserializeOwned + Send + 'static> ListingTransport<R> for HttpListingClient {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        access_token: &str,
    ) -> Result<PageResponse<R>> {
        self.fetch(request, access_token).await
    }
}

impl std::fmt::Debug for HttpListingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpListingClient")
            .field("listing_url", &self.listing_url)
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Classify a listing response body.
///
/// A JSON object carrying a non-empty `message` is an application error
/// whatever the status; otherwise non-2xx statuses are HTTP errors and the
/// rest must decode as a page.
pub(crate) fn decode_listing<R: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<PageResponse<R>> {
    let json: Option<Value> = serde_json::from_str(body).ok();

    if let Some(message) = json
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        warn!("Listing endpoint returned message: {}", message);
        return Err(Error::application(message));
    }

    if !status.is_success() {
        return Err(Error::http_status(status.as_u16(), body));
    }

    let json = json.ok_or_else(|| Error::decode("response body is not JSON"))?;
    let page: ListingResponseBody<R> =
        serde_json::from_value(json).map_err(|e| Error::decode(e.to_string()))?;
    Ok(page.into())
}
