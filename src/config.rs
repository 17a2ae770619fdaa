//! Pager configuration
//!
//! Endpoints and session defaults, loaded from YAML or built in code.
//!
//! ```yaml
//! listing_url: https://api.example.com/users/list
//! refresh_url: https://api.example.com/auth/refresh
//! page_size: 20
//! mode: append
//! search_debounce_ms: 500
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT};
use crate::types::PaginationMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Complete pager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Listing endpoint (POST, JSON body)
    pub listing_url: String,

    /// Token refresh endpoint; without it a 401 ends the session
    #[serde(default)]
    pub refresh_url: Option<String>,

    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Replace (paged) or append (infinite scroll)
    #[serde(default)]
    pub mode: PaginationMode,

    /// Quiet interval before a search edit is committed
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Bound on each listing or refresh request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side throttle
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[allow(clippy::cast_possible_truncation)]
fn default_search_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl PagerConfig {
    /// Minimal config for a listing endpoint; other fields take defaults
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            refresh_url: None,
            page_size: default_page_size(),
            mode: PaginationMode::default(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
            rate_limit: None,
        }
    }

    /// Create a new config builder
    pub fn builder(listing_url: impl Into<String>) -> PagerConfigBuilder {
        PagerConfigBuilder {
            config: Self::new(listing_url),
        }
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check URLs and numeric bounds
    pub fn validate(&self) -> Result<()> {
        validate_url("listing_url", &self.listing_url)?;
        if let Some(ref refresh_url) = self.refresh_url {
            validate_url("refresh_url", refresh_url)?;
        }

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if let Some(ref rate_limit) = self.rate_limit {
            if rate_limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.requests_per_second",
                    "must be greater than zero",
                ));
            }
        }

        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transport settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(self.request_timeout());
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(ref rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        builder.build()
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

/// Builder for [`PagerConfig`]
#[derive(Debug, Clone)]
pub struct PagerConfigBuilder {
    config: PagerConfig,
}

impl PagerConfigBuilder {
    #[must_use]
    pub fn refresh_url(mut self, url: impl Into<String>) -> Self {
        self.config.refresh_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: PaginationMode) -> Self {
        self.config.mode = mode;
        self
    }

    #[must_use]
    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.config.search_debounce_ms = debounce.as_millis() as u64;
        }
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_secs = timeout.as_secs();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<PagerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use test_case::test_case;

    #[test]
    fn test_minimal_config_defaults() {
        let config = PagerConfig::from_yaml_str("listing_url: https://api.example.com/users")
            .unwrap();

        assert_eq!(config, PagerConfig::new("https://api.example.com/users"));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.mode, PaginationMode::Replace);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.refresh_url.is_none());
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_full_config() {
        let yaml = r"
listing_url: https://api.example.com/users/list
refresh_url: https://api.example.com/auth/refresh
page_size: 50
mode: append
search_debounce_ms: 250
request_timeout_secs: 10
user_agent: backoffice/2.1
rate_limit:
  requests_per_second: 4
  burst_size: 2
";
        let config = PagerConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(
            config.refresh_url.as_deref(),
            Some("https://api.example.com/auth/refresh")
        );
        assert_eq!(config.page_size, 50);
        assert_eq!(config.mode, PaginationMode::Append);
        assert_eq!(config.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 2)));

        let http = config.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.user_agent, "backoffice/2.1");
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::new(4, 2)));
    }

    #[test_case("listing_url: not a url" ; "unparseable listing url")]
    #[test_case("listing_url: ftp://example.com/users" ; "unsupported scheme")]
    #[test_case("listing_url: https://x.io\nrefresh_url: nope" ; "bad refresh url")]
    #[test_case("listing_url: https://x.io\npage_size: 0" ; "zero page size")]
    #[test_case("listing_url: https://x.io\nrequest_timeout_secs: 0" ; "zero timeout")]
    #[test_case("listing_url: https://x.io\nrate_limit:\n  requests_per_second: 0" ; "zero rate")]
    fn test_invalid_config(yaml: &str) {
        let err = PagerConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }), "{err}");
    }

    #[test]
    fn test_missing_listing_url_is_parse_error() {
        let err = PagerConfig::from_yaml_str("page_size: 10").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let err =
            PagerConfig::from_yaml_str("listing_url: https://x.io\nmode: sideways").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_builder() {
        let config = PagerConfig::builder("https://api.example.com/users")
            .refresh_url("https://api.example.com/refresh")
            .page_size(10)
            .mode(PaginationMode::Append)
            .search_debounce(Duration::from_millis(300))
            .request_timeout(Duration::from_secs(5))
            .user_agent("cli/1.0")
            .rate_limit(RateLimiterConfig::new(1, 1))
            .build()
            .unwrap();

        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.request_timeout_secs, 5);

        assert!(PagerConfig::builder("https://x.io").page_size(0).build().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listing_url: http://localhost:8080/users").unwrap();
        writeln!(file, "page_size: 5").unwrap();

        let config = PagerConfig::load(file.path()).unwrap();
        assert_eq!(config.listing_url, "http://localhost:8080/users");
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PagerConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
