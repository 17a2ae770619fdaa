//! Pagination module
//!
//! Cursor-based paging against a remote listing endpoint.
//!
//! # Overview
//!
//! A [`FetchController`] owns one pagination session: the displayed items,
//! the current and next cursors, a [`CursorHistory`] for stepping back, and
//! a single in-flight slot. Pages are either replaced (paged UI) or appended
//! (infinite scroll) depending on [`PaginationMode`](crate::PaginationMode).
//!
//! [`PaginatedList`] wraps a controller with a [`SearchDebouncer`] and is
//! the handle consumers hold for as long as the listing is on screen.

mod controller;
mod debounce;
mod history;
mod list;
mod session;
mod types;

pub use controller::{
    FetchController, FetchControllerBuilder, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT,
};
pub use debounce::{GenerationWatch, SearchDebouncer, SettledSearch, DEFAULT_DEBOUNCE};
pub use history::CursorHistory;
pub use list::{CommitObserver, PaginatedList};
pub use types::{
    AuthErrorHook, ListingRequestBody, ListingResponseBody, ListingTransport, LoadError,
    LoadOutcome, PageRequest, PageResponse, PageView, SkipReason,
};
