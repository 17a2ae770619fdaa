//! Fetch controller
//!
//! Drives one pagination session against a listing transport:
//!
//! - resolves the cursor for each navigation
//! - keeps at most one request in flight
//! - attaches the bearer token and, on a 401, refreshes it once and retries
//!   the same request once
//! - applies results in dispatch order and drops responses that arrive after
//!   a reset or teardown

use super::session::{Session, Ticket};
use super::types::{
    AuthErrorHook, ListingTransport, LoadError, LoadOutcome, PageRequest, PageResponse, PageView,
};
use crate::auth::{CredentialStore, TokenRefresher};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{CursorId, Direction, PaginationMode};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default bound on a single transport call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cursor-based pagination controller
pub struct FetchController<R> {
    transport: Arc<dyn ListingTransport<R>>,
    credentials: CredentialStore,
    refresher: Option<Arc<dyn TokenRefresher>>,
    on_auth_error: Option<AuthErrorHook>,
    mode: PaginationMode,
    request_timeout: Duration,
    session: Mutex<Session<R>>,
}

/// Builder for [`FetchController`]
pub struct FetchControllerBuilder<R> {
    transport: Arc<dyn ListingTransport<R>>,
    credentials: CredentialStore,
    refresher: Option<Arc<dyn TokenRefresher>>,
    on_auth_error: Option<AuthErrorHook>,
    mode: PaginationMode,
    page_size: u32,
    search_term: String,
    request_timeout: Duration,
}

impl<R> FetchControllerBuilder<R> {
    /// Set the token refresher used on 401 responses
    #[must_use]
    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Set the callback invoked after credentials are cleared
    #[must_use]
    pub fn on_auth_error(mut self, hook: impl Fn(ErrorKind) + Send + Sync + 'static) -> Self {
        self.on_auth_error = Some(Arc::new(hook));
        self
    }

    /// Set replace (paged) or append (infinite scroll) mode
    #[must_use]
    pub fn mode(mut self, mode: PaginationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the page size; zero falls back to the default
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self
    }

    /// Start with an already committed search term
    #[must_use]
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Bound each transport call
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the controller
    pub fn build(self) -> FetchController<R> {
        FetchController {
            transport: self.transport,
            credentials: self.credentials,
            refresher: self.refresher,
            on_auth_error: self.on_auth_error,
            mode: self.mode,
            request_timeout: self.request_timeout,
            session: Mutex::new(Session::new(self.page_size, self.search_term)),
        }
    }
}

/// Releases the in-flight slot on every exit from `load`, including a
/// dropped future or a panicking transport.
struct InFlightGuard<'a, R> {
    session: &'a Mutex<Session<R>>,
    sequence: u64,
}

impl<R> Drop for InFlightGuard<'_, R> {
    fn drop(&mut self) {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .release(self.sequence);
    }
}

impl<R: Send + 'static> FetchController<R> {
    /// Start building a controller around a transport and a credential store
    pub fn builder(
        transport: Arc<dyn ListingTransport<R>>,
        credentials: CredentialStore,
    ) -> FetchControllerBuilder<R> {
        FetchControllerBuilder {
            transport,
            credentials,
            refresher: None,
            on_auth_error: None,
            mode: PaginationMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            search_term: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load a page in the given direction
    pub async fn load(&self, direction: Direction) -> LoadOutcome {
        let ticket = match self.lock().begin(direction) {
            Ok(ticket) => ticket,
            Err(reason) => {
                debug!("Skipping {:?} load: {:?}", direction, reason);
                return LoadOutcome::Skipped(reason);
            }
        };

        let _guard = InFlightGuard {
            session: &self.session,
            sequence: ticket.sequence,
        };

        debug!(
            "Dispatching #{} {:?} cursor={:?} limit={} search={:?}",
            ticket.sequence,
            direction,
            ticket.request.cursor,
            ticket.request.limit,
            ticket.request.search_term
        );

        let result = self.fetch_authorized(&ticket).await;
        self.settle(&ticket, result)
    }

    /// First page for the committed search term
    pub async fn load_initial(&self) -> LoadOutcome {
        self.load(Direction::Initial).await
    }

    /// Follow the next cursor
    pub async fn go_next(&self) -> LoadOutcome {
        self.load(Direction::Next).await
    }

    /// Step back one page
    pub async fn go_previous(&self) -> LoadOutcome {
        self.load(Direction::Previous).await
    }

    /// Re-fetch the first page
    pub async fn reload(&self) -> LoadOutcome {
        self.load(Direction::Reload).await
    }

    fn settle(&self, ticket: &Ticket, result: Result<PageResponse<R>>) -> LoadOutcome {
        let mut session = self.lock();
        match result {
            Ok(page) => {
                let fetched = page.items.len();
                let has_more = page.has_more();
                if session.apply(ticket, page, self.mode) {
                    debug!(
                        "Applied #{}: {} records, has_more={}",
                        ticket.sequence, fetched, has_more
                    );
                    LoadOutcome::Loaded { fetched, has_more }
                } else {
                    debug!("Dropped stale response #{}", ticket.sequence);
                    LoadOutcome::Cancelled
                }
            }
            Err(Error::Cancelled) => LoadOutcome::Cancelled,
            Err(err) => {
                if session.fail(ticket, LoadError::from(&err)) {
                    if err.kind().is_recoverable() {
                        warn!("Load #{} failed: {}", ticket.sequence, err);
                    }
                    LoadOutcome::Failed(err)
                } else {
                    debug!("Dropped stale failure #{}: {}", ticket.sequence, err);
                    LoadOutcome::Cancelled
                }
            }
        }
    }

    /// Send with the stored token; refresh and retry once on 401
    async fn fetch_authorized(&self, ticket: &Ticket) -> Result<PageResponse<R>> {
        let request = &ticket.request;
        let Some(token) = self.credentials.access_token().await else {
            return Err(self.fail_auth(ticket, Error::Unauthenticated).await);
        };

        match self.send(request, &token).await {
            Err(Error::Unauthorized) => {}
            other => return other,
        }

        info!("Access token rejected, attempting refresh");
        let fresh = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(err) => return Err(self.fail_auth(ticket, err).await),
        };

        match self.send(request, &fresh).await {
            Err(Error::Unauthorized) => Err(self
                .fail_auth(ticket, Error::auth_expired("refreshed token was rejected"))
                .await),
            other => other,
        }
    }

    async fn send(&self, request: &PageRequest, token: &str) -> Result<PageResponse<R>> {
        match tokio::time::timeout(
            self.request_timeout,
            self.transport.fetch_page(request, token),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                timeout_ms: self.request_timeout.as_millis() as u64,
            }),
        }
    }

    async fn refresh_access_token(&self) -> Result<String> {
        let refresher = self
            .refresher
            .as_ref()
            .ok_or_else(|| Error::auth_expired("no token refresher configured"))?;
        let refresh_token = self
            .credentials
            .refresh_token()
            .await
            .ok_or_else(|| Error::auth_expired("no refresh token stored"))?;

        let token = refresher
            .refresh(&refresh_token)
            .await
            .map_err(|e| match e {
                Error::AuthExpired { .. } => e,
                other => Error::auth_expired(other.to_string()),
            })?;

        if !self.credentials.update_access_token(token.clone()).await {
            return Err(Error::auth_expired("credentials cleared during refresh"));
        }
        info!("Access token refreshed");
        Ok(token)
    }

    /// Clear credentials and notify the consumer; returns the error for propagation.
    ///
    /// A request superseded by a reset or teardown settles as
    /// [`Error::Cancelled`] without touching credentials or the hook.
    async fn fail_auth(&self, ticket: &Ticket, err: Error) -> Error {
        if !self.lock().is_current(ticket.sequence) {
            debug!(
                "Ignoring auth failure of superseded request #{}: {}",
                ticket.sequence, err
            );
            return Error::Cancelled;
        }

        warn!("Authentication failed: {}", err);
        self.credentials.clear().await;

        if let Some(hook) = &self.on_auth_error {
            hook(err.kind());
        }
        err
    }

    /// Update the raw (uncommitted) search input
    pub fn set_search_term(&self, text: impl Into<String>) {
        self.lock().set_search_term(text.into());
    }

    /// Commit a settled search term: reset and load the first page.
    ///
    /// Returns `None` when `term` is already the committed term.
    pub async fn commit_search(&self, term: impl Into<String>) -> Option<LoadOutcome> {
        self.commit_search_if(term.into(), || true).await
    }

    /// Commit `term` only if `still_wanted` holds, checked under the session
    /// lock so a concurrent commit cannot slip in between check and reset.
    pub(crate) async fn commit_search_if(
        &self,
        term: String,
        still_wanted: impl FnOnce() -> bool,
    ) -> Option<LoadOutcome> {
        {
            let mut session = self.lock();
            if session.is_torn_down() || session.committed_search_term() == term {
                return None;
            }
            if !still_wanted() {
                debug!("Dropping superseded search term {:?}", term);
                return None;
            }
            debug!("Committing search term {:?}", term);
            session.reset();
            session.commit_search_term(term);
        }
        Some(self.load(Direction::Initial).await)
    }

    /// Change the page size: reset and load the first page.
    ///
    /// Returns `Ok(None)` when the size is unchanged.
    pub async fn set_page_size(&self, page_size: u32) -> Result<Option<LoadOutcome>> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than zero"));
        }
        {
            let mut session = self.lock();
            if session.is_torn_down() || session.page_size() == page_size {
                return Ok(None);
            }
            session.reset();
            session.set_page_size(page_size);
        }
        Ok(Some(self.load(Direction::Initial).await))
    }

    /// Back to an empty first page; any in-flight response will be dropped
    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn has_previous(&self) -> bool {
        self.lock().has_previous()
    }

    pub fn page_number(&self) -> u32 {
        self.lock().page_number()
    }

    pub fn page_size(&self) -> u32 {
        self.lock().page_size()
    }

    pub fn current_cursor(&self) -> Option<CursorId> {
        self.lock().current_cursor()
    }

    pub fn next_cursor(&self) -> Option<CursorId> {
        self.lock().next_cursor()
    }

    /// Cursor history, oldest first; `None` entries are the first page
    pub fn cursor_history(&self) -> Vec<Option<CursorId>> {
        self.lock().history().iter().copied().collect()
    }

    pub fn search_term(&self) -> String {
        self.lock().search_term().to_string()
    }

    pub fn committed_search_term(&self) -> String {
        self.lock().committed_search_term().to_string()
    }

    pub fn last_error(&self) -> Option<LoadError> {
        self.lock().last_error().cloned()
    }

    pub fn is_torn_down(&self) -> bool {
        self.lock().is_torn_down()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.lock().items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items().is_empty()
    }
}

impl<R: Clone + Send + 'static> FetchController<R> {
    /// Records currently held
    pub fn items(&self) -> Vec<R> {
        self.lock().items().to_vec()
    }

    /// Consistent copy of everything a consumer renders
    pub fn snapshot(&self) -> PageView<R> {
        self.lock().view()
    }
}

impl<R> FetchController<R> {
    fn lock(&self) -> MutexGuard<'_, Session<R>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// End the session. Later responses are ignored and loads are skipped.
    pub fn teardown(&self) {
        debug!("Tearing down pagination session");
        self.lock().tear_down();
    }
}

impl<R> std::fmt::Debug for FetchController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchController")
            .field("mode", &self.mode)
            .field("request_timeout", &self.request_timeout)
            .field("has_refresher", &self.refresher.is_some())
            .field("has_auth_hook", &self.on_auth_error.is_some())
            .finish_non_exhaustive()
    }
}
