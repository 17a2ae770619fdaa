//! Cursor history
//!
//! Stack of cursors visited before the current one. Backward navigation
//! pops from here instead of re-deriving cursors from the data.

/// Last-in-first-out cursor stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorHistory<C> {
    stack: Vec<C>,
}

impl<C> Default for CursorHistory<C> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<C> CursorHistory<C> {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a cursor we are leaving
    pub fn push(&mut self, cursor: C) {
        self.stack.push(cursor);
    }

    /// Remove and return the most recent cursor; `None` when empty
    pub fn pop(&mut self) -> Option<C> {
        self.stack.pop()
    }

    /// Most recent cursor without removing it
    pub fn peek(&self) -> Option<&C> {
        self.stack.last()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Forget every ancestor (session reset)
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.stack.iter()
    }
}

impl<C: PartialEq> CursorHistory<C> {
    pub fn contains(&self, cursor: &C) -> bool {
        self.stack.contains(cursor)
    }
}
