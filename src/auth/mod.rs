//! Authentication module
//!
//! Holds the session's bearer credentials and renews the access token
//! when the listing endpoint rejects it.
//!
//! The initial login exchange is not handled here: callers seed the
//! [`CredentialStore`] with whatever their login flow produced.

mod refresher;
mod store;
mod types;

pub use refresher::{HttpTokenRefresher, TokenRefresher};
pub use store::CredentialStore;
pub use types::Credentials;
