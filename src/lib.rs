// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Pager
//!
//! Cursor-based pagination for remote listing endpoints, with debounced
//! search and bearer token renewal.
//!
//! ## Features
//!
//! - **Cursor Navigation**: Next, previous and reload over opaque cursors,
//!   with a cursor history for stepping back
//! - **Single Flight**: At most one listing request in flight per session;
//!   responses that arrive after a reset are dropped
//! - **Debounced Search**: Search edits are committed after a quiet interval
//!   and restart pagination from the first page
//! - **Token Renewal**: A 401 triggers one token refresh and one retry
//! - **Paged or Infinite**: Replace the displayed page or append to it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::auth::{CredentialStore, Credentials, HttpTokenRefresher};
//! use solidafy_pager::http::HttpListingClient;
//! use solidafy_pager::pagination::{FetchController, PaginatedList};
//! use solidafy_pager::{Result, User};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credentials = CredentialStore::with_credentials(
//!         Credentials::new("access").with_refresh_token("refresh"),
//!     );
//!     let transport = HttpListingClient::new("https://api.example.com/users/list")?;
//!
//!     let controller = FetchController::<User>::builder(Arc::new(transport), credentials)
//!         .refresher(Arc::new(HttpTokenRefresher::new("https://api.example.com/refresh")))
//!         .on_auth_error(|kind| eprintln!("signed out: {kind:?}"))
//!         .build();
//!
//!     let list = PaginatedList::mount(controller, solidafy_pager::pagination::DEFAULT_DEBOUNCE);
//!     list.start().await;
//!     list.set_search_term("ada");
//!     list.go_next().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PaginatedList                          │
//! │   set_search_term ─▶ SearchDebouncer ─▶ commit_search        │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                      FetchController                         │
//! │  Session (items, cursors, CursorHistory, in-flight slot)     │
//! └───────────────┬─────────────────────────────┬────────────────┘
//!                 │                             │
//! ┌───────────────┴──────────────┐ ┌────────────┴───────────────┐
//! │  ListingTransport (HTTP)     │ │  CredentialStore           │
//! │  bearer auth, rate limit     │ │  TokenRefresher (HTTP)     │
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and the consumer-facing error taxonomy
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credential storage and token refresh
pub mod auth;

/// HTTP listing transport with rate limiting
pub mod http;

/// Fetch controller, cursor history and search debouncing
pub mod pagination;

/// Pager configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PagerConfig;
pub use error::{Error, ErrorKind, Result};
pub use pagination::{FetchController, LoadOutcome, PageView, PaginatedList};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
