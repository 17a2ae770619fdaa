//! Pagination session state
//!
//! The state one controller owns. All transitions happen here, synchronously,
//! under the controller's lock; nothing in this module awaits.

use super::history::CursorHistory;
use super::types::{LoadError, PageRequest, PageResponse, PageView, SkipReason};
use crate::types::{CursorId, Direction, PaginationMode};

/// A dispatched request, tagged with its sequence number
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    pub sequence: u64,
    pub direction: Direction,
    pub request: PageRequest,
}

#[derive(Debug)]
pub(crate) struct Session<R> {
    items: Vec<R>,
    current_cursor: Option<CursorId>,
    next_cursor: Option<CursorId>,
    /// Ancestors of `current_cursor`; `None` entries are the first page
    history: CursorHistory<Option<CursorId>>,
    page_number: u32,
    page_size: u32,
    search_term: String,
    committed_search_term: String,
    /// Sequence of the request allowed to settle, if any
    in_flight: Option<u64>,
    last_sequence: u64,
    last_error: Option<LoadError>,
    torn_down: bool,
}

impl<R> Session<R> {
    pub fn new(page_size: u32, search_term: String) -> Self {
        Self {
            items: Vec::new(),
            current_cursor: None,
            next_cursor: None,
            history: CursorHistory::new(),
            page_number: 1,
            page_size,
            committed_search_term: search_term.clone(),
            search_term,
            in_flight: None,
            last_sequence: 0,
            last_error: None,
            torn_down: false,
        }
    }

    /// Resolve the cursor for `direction` and mark a request in flight
    pub fn begin(&mut self, direction: Direction) -> Result<Ticket, SkipReason> {
        if self.torn_down {
            return Err(SkipReason::Closed);
        }
        if self.in_flight.is_some() {
            return Err(SkipReason::InFlight);
        }

        let cursor = match direction {
            Direction::Initial | Direction::Reload => None,
            Direction::Next => Some(self.next_cursor.ok_or(SkipReason::NoNextPage)?),
            // Popped only once the response is applied
            Direction::Previous => *self.history.peek().ok_or(SkipReason::NoPreviousPage)?,
        };

        self.last_sequence += 1;
        self.in_flight = Some(self.last_sequence);

        Ok(Ticket {
            sequence: self.last_sequence,
            direction,
            request: PageRequest {
                cursor,
                limit: self.page_size,
                search_term: self.committed_search_term.clone(),
            },
        })
    }

    /// Whether a response for `sequence` may still be applied
    pub fn is_current(&self, sequence: u64) -> bool {
        !self.torn_down && self.in_flight == Some(sequence)
    }

    /// Release the in-flight slot if it still belongs to `sequence`
    pub fn release(&mut self, sequence: u64) {
        if self.in_flight == Some(sequence) {
            self.in_flight = None;
        }
    }

    /// Apply a successful response. Returns `false` if the ticket is stale.
    pub fn apply(&mut self, ticket: &Ticket, page: PageResponse<R>, mode: PaginationMode) -> bool {
        if !self.is_current(ticket.sequence) {
            return false;
        }
        self.in_flight = None;

        match ticket.direction {
            Direction::Initial | Direction::Reload => {
                self.history.clear();
                self.page_number = 1;
                self.items = page.items;
            }
            Direction::Next => {
                if ticket.request.cursor.is_some() {
                    self.history.push(self.current_cursor);
                }
                self.page_number += 1;
                match mode {
                    PaginationMode::Append => self.items.extend(page.items),
                    PaginationMode::Replace => self.items = page.items,
                }
            }
            Direction::Previous => {
                self.history.pop();
                self.page_number = self.page_number.saturating_sub(1).max(1);
                self.items = page.items;
            }
        }

        self.current_cursor = ticket.request.cursor;
        self.next_cursor = page.next_cursor;
        self.last_error = None;
        true
    }

    /// Record a failure. Returns `false` if the ticket is stale.
    pub fn fail(&mut self, ticket: &Ticket, error: LoadError) -> bool {
        if !self.is_current(ticket.sequence) {
            return false;
        }
        self.in_flight = None;
        self.last_error = Some(error);
        true
    }

    /// Back to the first page with nothing loaded; supersedes any in-flight request
    pub fn reset(&mut self) {
        self.items.clear();
        self.current_cursor = None;
        self.next_cursor = None;
        self.history.clear();
        self.page_number = 1;
        self.in_flight = None;
        self.last_error = None;
    }

    pub fn tear_down(&mut self) {
        self.torn_down = true;
        self.in_flight = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn has_previous(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn current_cursor(&self) -> Option<CursorId> {
        self.current_cursor
    }

    pub fn next_cursor(&self) -> Option<CursorId> {
        self.next_cursor
    }

    pub fn history(&self) -> &CursorHistory<Option<CursorId>> {
        &self.history
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, text: String) {
        self.search_term = text;
    }

    pub fn committed_search_term(&self) -> &str {
        &self.committed_search_term
    }

    pub fn commit_search_term(&mut self, term: String) {
        self.committed_search_term = term;
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }
}

impl<R: Clone> Session<R> {
    pub fn view(&self) -> PageView<R> {
        PageView {
            items: self.items.clone(),
            is_loading: self.is_loading(),
            has_more: self.has_more(),
            has_previous: self.has_previous(),
            page_number: self.page_number,
            search_term: self.search_term.clone(),
            committed_search_term: self.committed_search_term.clone(),
            page_size: self.page_size,
            last_error: self.last_error.clone(),
        }
    }
}
