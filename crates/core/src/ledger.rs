// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Remaining assignment counts per member.
//!
//! Values are signed: an operator override may bind a slot to a member whose
//! quota is already zero, and the ledger records the overdraft rather than
//! hiding it.

use duty_roster_domain::{MemberId, QuotaDraw};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Remaining quota per member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLedger {
    quotas: BTreeMap<MemberId, i64>,
}

impl QuotaLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quotas: BTreeMap::new(),
        }
    }

    /// Builds a ledger from the result of a quota draw.
    #[must_use]
    pub fn from_draw(draw: &QuotaDraw) -> Self {
        Self {
            quotas: draw
                .assignments()
                .map(|(member, quota)| (member.clone(), quota))
                .collect(),
        }
    }

    /// Returns a member's remaining quota, zero if unknown.
    #[must_use]
    pub fn get(&self, member: &MemberId) -> i64 {
        self.quotas.get(member).copied().unwrap_or(0)
    }

    /// Returns true if the member holds at least one unit.
    #[must_use]
    pub fn has_quota(&self, member: &MemberId) -> bool {
        self.get(member) > 0
    }

    /// Returns true if the member has an entry.
    #[must_use]
    pub fn contains(&self, member: &MemberId) -> bool {
        self.quotas.contains_key(member)
    }

    /// Sum over all entries.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.quotas.values().sum()
    }

    /// Iterates entries in member name order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, i64)> {
        self.quotas.iter().map(|(m, q)| (m, *q))
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotas.is_empty()
    }

    /// Takes one unit from a member and returns the new balance.
    pub(crate) fn debit(&mut self, member: &MemberId) -> i64 {
        let entry: &mut i64 = self.quotas.entry(member.clone()).or_insert(0);
        *entry -= 1;
        *entry
    }

    /// Adds `amount` units to a member and returns the new balance.
    pub(crate) fn credit(&mut self, member: &MemberId, amount: i64) -> i64 {
        let entry: &mut i64 = self.quotas.entry(member.clone()).or_insert(0);
        *entry += amount;
        *entry
    }

    /// Zeroes a member's balance and returns what it held.
    pub(crate) fn take_all(&mut self, member: &MemberId) -> i64 {
        self.quotas
            .get_mut(member)
            .map_or(0, |entry| std::mem::take(entry))
    }
}
