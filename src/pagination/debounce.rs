//! Search debouncer
//!
//! Turns a burst of search edits into one settled value once the input has
//! been quiet for the configured interval. Each edit restarts the timer.
//! Settled values are delivered on the channel returned by
//! [`SearchDebouncer::new`], tagged with the generation they settled in.
//! A value may sit in the channel while its consumer is busy; any later
//! edit or [`SearchDebouncer::cancel`] makes it stale, which consumers
//! check through a [`GenerationWatch`].
//!
//! The pending timer is owned by the debouncer and cancelled when it is
//! dropped, so a torn-down session never receives a late commit.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Reference quiet interval
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct TimerState {
    /// Bumped on every edit and on cancel; a timer only fires for its own generation
    generation: u64,
    pending: Option<CancellationToken>,
}

/// A search term that stayed unchanged for the quiet interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledSearch {
    pub generation: u64,
    pub text: String,
}

/// Cloneable view of the debouncer's current generation
#[derive(Debug, Clone)]
pub struct GenerationWatch {
    state: Arc<Mutex<TimerState>>,
}

impl GenerationWatch {
    /// Whether no edit or cancel happened since `generation` settled
    pub fn is_current(&self, generation: u64) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
            == generation
    }
}

/// Debounces search input
///
/// Must be used from within a tokio runtime: every edit spawns a timer task.
#[derive(Debug)]
pub struct SearchDebouncer {
    quiet: Duration,
    settled_tx: mpsc::UnboundedSender<SettledSearch>,
    state: Arc<Mutex<TimerState>>,
}

impl SearchDebouncer {
    /// Create a debouncer and the receiver its settled values arrive on
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<SettledSearch>) {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet,
            settled_tx,
            state: Arc::new(Mutex::new(TimerState::default())),
        };
        (debouncer, settled_rx)
    }

    /// Quiet interval
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Record an edit, restarting the quiet timer
    pub fn push(&self, text: impl Into<String>) {
        let text = text.into();
        let token = CancellationToken::new();

        let generation = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.generation += 1;
            if let Some(previous) = state.pending.replace(token.clone()) {
                previous.cancel();
            }
            state.generation
        };

        let quiet = self.quiet;
        let tx = self.settled_tx.clone();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(quiet) => {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    // An edit may have landed between the timer firing and the lock
                    if state.generation == generation {
                        state.pending = None;
                        trace!("Search input settled");
                        let _ = tx.send(SettledSearch { generation, text });
                    }
                }
            }
        });
    }

    /// Handle for checking whether a settled value is still the latest input
    pub fn watch(&self) -> GenerationWatch {
        GenerationWatch {
            state: Arc::clone(&self.state),
        }
    }

    /// Drop the pending edit, if any, without committing it. Values that
    /// already settled become stale.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            pending.cancel();
        }
    }

    /// Whether an edit is waiting for its quiet interval
    pub fn has_pending(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .is_some()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_single_edit_settles_after_quiet_interval() {
        let (debouncer, mut settled) = SearchDebouncer::new(Duration::from_millis(500));
        debouncer.push("ana");
        assert!(debouncer.has_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(settled.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(settled.recv().await.map(|s| s.text).as_deref(), Some("ana"));
        assert!(!debouncer.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_last_value() {
        let (debouncer, mut settled) = SearchDebouncer::new(Duration::from_millis(500));

        debouncer.push("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("ab");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("abc");

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(settled.recv().await.map(|s| s.text).as_deref(), Some("abc"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_separated_by_quiet_interval_both_settle() {
        let (debouncer, mut settled) = SearchDebouncer::new(Duration::from_millis(500));

        debouncer.push("first");
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.push("second");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(settled.recv().await.map(|s| s.text).as_deref(), Some("first"));
        assert_eq!(settled.recv().await.map(|s| s.text).as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_value_goes_stale_after_edit_or_cancel() {
        let (debouncer, mut settled) = SearchDebouncer::new(Duration::from_millis(500));
        let watch = debouncer.watch();

        debouncer.push("first");
        tokio::time::sleep(Duration::from_millis(600)).await;
        let first = settled.recv().await.unwrap();
        assert_eq!(first.text, "first");
        assert!(watch.is_current(first.generation));

        debouncer.push("second");
        assert!(!watch.is_current(first.generation));

        tokio::time::sleep(Duration::from_millis(600)).await;
        let second = settled.recv().await.unwrap();
        assert!(watch.is_current(second.generation));

        debouncer.cancel();
        assert!(!watch.is_current(second.generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_edit() {
        let (debouncer, mut settled) = SearchDebouncer::new(Duration::from_millis(500));
        debouncer.push("never");
        debouncer.cancel();
        assert!(!debouncer.has_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (debouncer, mut settled) = SearchDebouncer::new(Duration::from_millis(500));
        debouncer.push("late");
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(1)).await;
        // Sender side is gone and nothing was delivered
        assert_eq!(settled.recv().await, None);
    }
}
