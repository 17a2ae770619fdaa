//! Pagination types and traits
//!
//! Defines the request/response model, the transport seam the controller
//! sends requests through, and the outcomes and read model it reports.

use crate::error::{Error, ErrorKind, Result};
use crate::types::CursorId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Cursor to continue from; `None` means the first page
    pub cursor: Option<CursorId>,
    /// Page size
    pub limit: u32,
    /// Committed search term (may be empty)
    pub search_term: String,
}

impl PageRequest {
    /// Create a first-page request
    pub fn first(limit: u32, search_term: impl Into<String>) -> Self {
        Self {
            cursor: None,
            limit,
            search_term: search_term.into(),
        }
    }

    /// Wire form of this request
    pub fn to_wire(&self) -> ListingRequestBody<'_> {
        ListingRequestBody {
            limit: self.limit,
            last_seen_id: self.cursor.unwrap_or(0),
            search: &self.search_term,
        }
    }
}

/// JSON body sent to the listing endpoint
#[derive(Debug, Serialize)]
pub struct ListingRequestBody<'a> {
    pub limit: u32,
    pub last_seen_id: CursorId,
    pub search: &'a str,
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<R> {
    /// Records in server order
    pub items: Vec<R>,
    /// Cursor for the next page; `None` when the listing is exhausted
    pub next_cursor: Option<CursorId>,
}

impl<R> PageResponse<R> {
    /// Create a response, normalizing the `0` first-page sentinel to `None`
    pub fn new(items: Vec<R>, next_cursor: Option<CursorId>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|c| *c != 0),
        }
    }

    /// Whether another page follows
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// JSON body of a successful listing response
#[derive(Debug, Deserialize)]
pub struct ListingResponseBody<R> {
    pub users: Vec<R>,
    #[serde(default)]
    pub next_cursor: Option<CursorId>,
}

impl<R> From<ListingResponseBody<R>> for PageResponse<R> {
    fn from(body: ListingResponseBody<R>) -> Self {
        PageResponse::new(body.users, body.next_cursor)
    }
}

/// Sends page requests to a listing endpoint
///
/// Implementations report a rejected token as [`Error::Unauthorized`] so
/// the controller can run its refresh path; every other failure is returned
/// as-is and classified with [`Error::kind`].
#[async_trait]
pub trait ListingTransport<R>: Send + Sync {
    /// Fetch one page with the given bearer token
    async fn fetch_page(&self, request: &PageRequest, access_token: &str)
        -> Result<PageResponse<R>>;
}

/// Callback invoked when credentials are cleared after an auth failure
pub type AuthErrorHook = std::sync::Arc<dyn Fn(ErrorKind) + Send + Sync>;

/// Why a load call did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `Next` with no next cursor
    NoNextPage,
    /// `Previous` with an empty history
    NoPreviousPage,
    /// Another request is still in flight
    InFlight,
    /// The session was torn down
    Closed,
}

impl SkipReason {
    /// Short label for logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoNextPage => "no next page",
            SkipReason::NoPreviousPage => "no previous page",
            SkipReason::InFlight => "request in flight",
            SkipReason::Closed => "session closed",
        }
    }
}

/// Result of a single `load` call
#[derive(Debug)]
pub enum LoadOutcome {
    /// The response was applied to the session
    Loaded {
        /// Records in the response
        fetched: usize,
        /// Whether another page follows
        has_more: bool,
    },
    /// No request was sent
    Skipped(SkipReason),
    /// The response arrived after a reset or teardown and was dropped
    Cancelled,
    /// The request failed; recoverable failures are stored as `last_error`
    Failed(Error),
}

impl LoadOutcome {
    /// Whether the session was updated
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Whether no request was sent
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// The error, if the load failed
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Convert into a `Result`, treating skips and cancellations as success
    pub fn into_result(self) -> Result<Self> {
        match self {
            Self::Failed(e) => Err(e),
            other => Ok(other),
        }
    }
}

/// Error stored on the session for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for LoadError {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Read model handed to consumers
#[derive(Debug, Clone, Serialize)]
pub struct PageView<R> {
    pub items: Vec<R>,
    pub is_loading: bool,
    pub has_more: bool,
    pub has_previous: bool,
    pub page_number: u32,
    pub search_term: String,
    pub committed_search_term: String,
    pub page_size: u32,
    pub last_error: Option<LoadError>,
}

impl<R> PageView<R> {
    /// "Page N" label for paged UIs
    pub fn page_indicator(&self) -> String {
        format!("Page {}", self.page_number)
    }
}
