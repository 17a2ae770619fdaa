//! Paginated list
//!
//! Consumer-facing handle for one mounted listing: a [`FetchController`]
//! plus the search debouncer feeding it. Dropping the handle tears the
//! session down, cancels the pending debounce timer and stops the commit
//! task.

use super::controller::FetchController;
use super::debounce::{SearchDebouncer, SettledSearch};
use super::types::{LoadError, LoadOutcome, PageView};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Called with the outcome of every search committed by the background task
pub type CommitObserver<R> = Box<dyn Fn(&FetchController<R>, &LoadOutcome) + Send + Sync>;

/// A mounted, searchable, paginated listing
pub struct PaginatedList<R> {
    controller: Arc<FetchController<R>>,
    debouncer: SearchDebouncer,
    shutdown: CancellationToken,
}

impl<R: Clone + Send + Sync + 'static> PaginatedList<R> {
    /// Mount a session. Settled search terms are committed on a background task.
    ///
    /// Must be called from within a tokio runtime. No request is sent until
    /// [`PaginatedList::start`] or a search commit.
    pub fn mount(controller: FetchController<R>, debounce: Duration) -> Self {
        Self::spawn(controller, debounce, None)
    }

    /// Like [`PaginatedList::mount`], reporting each background commit to `observer`
    pub fn mount_with_observer(
        controller: FetchController<R>,
        debounce: Duration,
        observer: impl Fn(&FetchController<R>, &LoadOutcome) + Send + Sync + 'static,
    ) -> Self {
        Self::spawn(controller, debounce, Some(Box::new(observer)))
    }

    fn spawn(
        controller: FetchController<R>,
        debounce: Duration,
        observer: Option<CommitObserver<R>>,
    ) -> Self {
        let controller = Arc::new(controller);
        let (debouncer, mut settled) = SearchDebouncer::new(debounce);
        let watch = debouncer.watch();
        let shutdown = CancellationToken::new();

        let worker = Arc::clone(&controller);
        let stop = shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = stop.cancelled() => break,
                    next = settled.recv() => match next {
                        Some(SettledSearch { generation, text }) => {
                            // Queued values are stale once a newer edit or search_now happened
                            let outcome = worker
                                .commit_search_if(text, || watch.is_current(generation))
                                .await;
                            if let (Some(outcome), Some(observer)) = (outcome, &observer) {
                                observer(&worker, &outcome);
                            }
                        }
                        None => break,
                    },
                }
            }
            debug!("Search commit task stopped");
        });

        Self {
            controller,
            debouncer,
            shutdown,
        }
    }

    /// Load the first page
    pub async fn start(&self) -> LoadOutcome {
        self.controller.load_initial().await
    }

    /// Record a search edit; the committed term follows after the quiet interval
    pub fn set_search_term(&self, text: impl Into<String>) {
        let text = text.into();
        self.controller.set_search_term(text.clone());
        self.debouncer.push(text);
    }

    /// Commit the current search input immediately, skipping the quiet interval.
    ///
    /// Settled terms still queued for the background task are discarded.
    pub async fn search_now(&self) -> Option<LoadOutcome> {
        self.debouncer.cancel();
        let term = self.controller.search_term();
        self.controller.commit_search(term).await
    }

    pub async fn go_next(&self) -> LoadOutcome {
        self.controller.go_next().await
    }

    pub async fn go_previous(&self) -> LoadOutcome {
        self.controller.go_previous().await
    }

    pub async fn reload(&self) -> LoadOutcome {
        self.controller.reload().await
    }

    /// Change the page size and start over from the first page
    pub async fn set_page_size(&self, page_size: u32) -> Result<Option<LoadOutcome>> {
        self.controller.set_page_size(page_size).await
    }

    pub fn items(&self) -> Vec<R> {
        self.controller.items()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.controller.has_more()
    }

    pub fn page_number(&self) -> u32 {
        self.controller.page_number()
    }

    /// Raw search input
    pub fn search_term(&self) -> String {
        self.controller.search_term()
    }

    pub fn last_error(&self) -> Option<LoadError> {
        self.controller.last_error()
    }

    pub fn snapshot(&self) -> PageView<R> {
        self.controller.snapshot()
    }

    /// Whether a search edit is waiting to settle
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.has_pending()
    }

    pub fn controller(&self) -> &Arc<FetchController<R>> {
        &self.controller
    }
}

impl<R> Drop for PaginatedList<R> {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.debouncer.cancel();
        self.controller.teardown();
    }
}
