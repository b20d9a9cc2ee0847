// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turn rotation over a fixed selection order.
//!
//! ## States
//!
//! - `Idle`: no order has been drawn
//! - `Active`: some member in the order still holds quota
//! - `Exhausted`: nobody in the order holds quota
//!
//! The pointer only ever moves forward, wrapping at the end of the order.
//! When no member has quota the pointer stays where it was.

use crate::ledger::QuotaLedger;
use duty_roster_domain::MemberId;
use serde::{Deserialize, Serialize};

/// Where the rotation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerState {
    /// No order has been drawn.
    Idle,
    /// A member still holds quota.
    Active,
    /// Every member's quota is used up.
    Exhausted,
}

impl SequencerState {
    /// Converts this state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active => "Active",
            Self::Exhausted => "Exhausted",
        }
    }
}

impl std::fmt::Display for SequencerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selection order plus the pointer to the member whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSequencer {
    order: Vec<MemberId>,
    current_index: usize,
}

impl TurnSequencer {
    /// Creates a sequencer at the head of `order`.
    #[must_use]
    pub const fn new(order: Vec<MemberId>) -> Self {
        Self {
            order,
            current_index: 0,
        }
    }

    /// The selection order.
    #[must_use]
    pub fn order(&self) -> &[MemberId] {
        &self.order
    }

    /// Position of the current picker within the order.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The member whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&MemberId> {
        self.order.get(self.current_index)
    }

    /// Reports `Active` if anyone in the order still holds quota.
    #[must_use]
    pub fn state(&self, ledger: &QuotaLedger) -> SequencerState {
        if self.order.iter().any(|m| ledger.has_quota(m)) {
            SequencerState::Active
        } else {
            SequencerState::Exhausted
        }
    }

    /// Restores a pointer saved in a snapshot. Out-of-range values are ignored.
    pub(crate) const fn restore_index(&mut self, index: usize) {
        if index < self.order.len() {
            self.current_index = index;
        }
    }

    /// Moves to the next member with quota, starting after the current one.
    ///
    /// Scans at most one full cycle, so the current member is reconsidered
    /// last.
    pub(crate) fn advance(&mut self, ledger: &QuotaLedger) -> SequencerState {
        self.scan(ledger, 1)
    }

    /// Moves to the first member with quota, starting at the current one.
    pub(crate) fn settle(&mut self, ledger: &QuotaLedger) -> SequencerState {
        self.scan(ledger, 0)
    }

    fn scan(&mut self, ledger: &QuotaLedger, first_step: usize) -> SequencerState {
        let len: usize = self.order.len();
        for step in first_step..first_step + len {
            let index: usize = (self.current_index + step) % len;
            if ledger.has_quota(&self.order[index]) {
                self.current_index = index;
                return SequencerState::Active;
            }
        }
        SequencerState::Exhausted
    }
}
