// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bounded undo history.

use crate::ledger::QuotaLedger;
use duty_roster_domain::Slot;
use std::collections::VecDeque;

/// The state restored by one undo step.
///
/// Absence flags, preferences, the roster and the selection order are not
/// part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Every slot with its owner.
    pub slots: Vec<Slot>,
    /// Every member's remaining quota.
    pub quotas: QuotaLedger,
    /// The sequencer pointer, if an order existed.
    pub current_index: Option<usize>,
    /// The last redistribution summary shown to operators.
    pub last_action_log: Option<String>,
}

/// A stack of snapshots that evicts its oldest entry when full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl History {
    /// Creates an empty history holding at most `capacity` snapshots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a snapshot, evicting the oldest one if over capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Removes and returns the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    /// The most recent snapshot, if any.
    #[must_use]
    pub fn peek(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there is nothing to undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored snapshots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tag: usize) -> Snapshot {
        Snapshot {
            slots: Vec::new(),
            quotas: QuotaLedger::new(),
            current_index: Some(tag),
            last_action_log: None,
        }
    }

    #[test]
    fn test_pop_returns_most_recent() {
        let mut history: History = History::new(5);
        history.push(snapshot(1));
        history.push(snapshot(2));

        assert_eq!(history.pop().map(|s| s.current_index), Some(Some(2)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_oldest_evicted_over_capacity() {
        let mut history: History = History::new(3);
        for tag in 0..5 {
            history.push(snapshot(tag));
        }

        assert_eq!(history.len(), 3);
        let popped: Vec<Option<usize>> = std::iter::from_fn(|| history.pop())
            .map(|s| s.current_index)
            .collect();
        assert_eq!(popped, vec![Some(4), Some(3), Some(2)]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history: History = History::new(0);
        history.push(snapshot(1));

        assert!(history.is_empty());
        assert!(history.pop().is_none());
    }
}
