//! Undo/redo history over full-document snapshots.
//!
//! DESIGN
//! ======
//! `History` holds `past`, `present`, and `future`. Recording pushes the old
//! present onto `past` and drops `future`; undo and redo shuttle snapshots
//! between the two stacks through `present`. `past` is bounded: once it holds
//! `limit` entries the oldest snapshot is evicted on the next record.
//!
//! Recording a snapshot equal to `present` is skipped, so a gesture that
//! ends where it started never produces an empty undo step.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_LIMIT;
use crate::element::Element;

/// Immutable copy of the element sequence at one point in time.
pub type Snapshot = Vec<Element>;

#[derive(Debug, Clone)]
pub struct History<T = Snapshot> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
}

impl<T: Clone + PartialEq> History<T> {
    /// Start a history whose present is `initial`, with the default limit.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, HISTORY_LIMIT)
    }

    #[must_use]
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self { past: VecDeque::new(), present: initial, future: VecDeque::new(), limit }
    }

    /// Make `present` the new current state. Returns `false` (and changes
    /// nothing) when it equals the current present.
    pub fn record(&mut self, present: T) -> bool {
        if present == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, present);
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        true
    }

    /// Step back one snapshot. Returns the restored present, or `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop_back()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        Some(&self.present)
    }

    /// Step forward one snapshot. Returns the restored present, or `None`
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop_front()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(&self.present)
    }

    /// Drop both stacks and start over from `present`.
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
