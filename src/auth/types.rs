//! Credential and token exchange types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Access/refresh token pair plus the user the login exchange returned
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token attached to listing requests
    pub access_token: String,
    /// Token exchanged for a new access token on 401
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Opaque user record, stored but never interpreted
    #[serde(default)]
    pub user: Option<Value>,
    /// Last write time (last writer wins)
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Credentials {
    /// Create credentials with only an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            user: None,
            updated_at: Utc::now(),
        }
    }

    /// Attach a refresh token
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Attach a user record
    #[must_use]
    pub fn with_user(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }
}

// Tokens stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("has_user", &self.user.is_some())
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Body of the refresh endpoint request
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Body of a successful refresh response
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_credentials_builder() {
        let creds = Credentials::new("access")
            .with_refresh_token("refresh")
            .with_user(serde_json::json!({"first_name": "Ana"}));

        assert_eq!(creds.access_token, "access");
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(creds.user.unwrap()["first_name"], "Ana");
    }

    #[test]
    fn test_credentials_debug_redacts_tokens() {
        let creds = Credentials::new("super-secret").with_refresh_token("also-secret");
        let printed = format!("{creds:?}");
        assert!(!printed.contains("super-secret"));
        assert!(!printed.contains("also-secret"));
    }

    #[test]
    fn test_refresh_response_missing_token() {
        let resp: RefreshResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.access_token.is_none());
    }
}
