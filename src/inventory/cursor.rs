//! Per-category pagination cursor
//!
//! Each category has its own read position: the number of its tokens
//! already handed out. Positions only move forward, and only when a page
//! is committed after its fetch succeeded.

use super::catalogue::Catalogue;
use super::category::Category;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, MutexGuard};

/// Five independent read positions, one per category.
pub struct CategoryCursor {
    positions: [Mutex<usize>; Category::COUNT],
    /// Last committed position per category, readable while a page is in
    /// flight
    committed: [AtomicUsize; Category::COUNT],
}

impl CategoryCursor {
    pub fn new() -> Self {
        Self {
            positions: std::array::from_fn(|_| Mutex::new(0)),
            committed: std::array::from_fn(|_| AtomicUsize::new(0)),
        }
    }

    /// Committed position; does not wait for an in-flight page.
    pub fn position(&self, category: Category) -> usize {
        self.committed[category.index()].load(Ordering::Acquire)
    }

    /// Reserve the next `n` unread tokens of `category`.
    ///
    /// The category stays locked until the returned slice is committed or
    /// dropped, so concurrent pages of one category are handed out one at a
    /// time. Dropping without `commit` leaves the position unchanged.
    pub async fn tokens_to_load<'a>(
        &'a self,
        catalogue: &Catalogue,
        category: Category,
        n: usize,
    ) -> PendingTokens<'a> {
        let position = self.positions[category.index()].lock().await;
        let all = catalogue.tokens(category);

        let start = *position;
        debug_assert!(start <= all.len());
        let end = start.saturating_add(n).min(all.len());

        PendingTokens {
            tokens: all[start..end].to_vec(),
            exhausted: start == all.len(),
            end,
            position,
            committed: &self.committed[category.index()],
        }
    }
}

impl Default for CategoryCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// A reserved, not yet committed token slice.
pub struct PendingTokens<'a> {
    tokens: Vec<String>,
    exhausted: bool,
    end: usize,
    position: MutexGuard<'a, usize>,
    committed: &'a AtomicUsize,
}

impl PendingTokens<'_> {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Nothing was left to read in this category.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Advance the category past these tokens; returns the new position.
    pub fn commit(mut self) -> usize {
        *self.position = self.end;
        self.committed.store(self.end, Ordering::Release);
        self.end
    }
}
