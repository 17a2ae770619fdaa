//! Credential store
//!
//! Shared holder for the current token pair. Pure storage: every session
//! reads the same store, writes are last-writer-wins, and only the fetch
//! controller's refresh path rewrites the access token.

use super::types::Credentials;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared, cloneable credential holder
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with credentials
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(credentials))),
        }
    }

    /// Replace the stored credentials
    pub async fn set(&self, mut credentials: Credentials) {
        credentials.updated_at = Utc::now();
        *self.inner.write().await = Some(credentials);
    }

    /// Current credentials, if any
    pub async fn get(&self) -> Option<Credentials> {
        self.inner.read().await.clone()
    }

    /// Drop all stored credentials
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Current access token
    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|c| c.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    /// Current refresh token
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .and_then(|c| c.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    /// Store a freshly refreshed access token.
    ///
    /// Returns `false` when the store was cleared while the refresh was
    /// running; the new token is discarded in that case.
    pub(crate) async fn update_access_token(&self, access_token: String) -> bool {
        let mut guard = self.inner.write().await;
        match guard.as_mut() {
            Some(creds) => {
                creds.access_token = access_token;
                creds.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Whether an access token is present
    pub async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }
}
