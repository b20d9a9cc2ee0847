// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Quota split for the per-period lottery.
//!
//! With `T` slots and `M` members, every member receives `T div M` slots and
//! `T mod M` of them receive one more. Which members land in the larger
//! group is decided by the caller's shuffle: the first `T mod M` members of
//! the shuffled list are the winners. This module only does the arithmetic,
//! so the result is deterministic for a given shuffle.
//!
//! ## Invariants
//!
//! - The quotas always sum to exactly `T`
//! - Every member appears in exactly one group

use crate::error::DomainError;
use crate::types::MemberId;
use serde::{Deserialize, Serialize};

/// The outcome of a quota draw.
///
/// Both groups are sorted by member name for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDraw {
    /// Quota held by the larger group (`base + 1`).
    pub high_value: i64,
    /// Members receiving `high_value`.
    pub high_group: Vec<MemberId>,
    /// Quota held by everyone else (`base`).
    pub low_value: i64,
    /// Members receiving `low_value`.
    pub low_group: Vec<MemberId>,
}

impl QuotaDraw {
    /// Returns the quota a member received, if they took part in the draw.
    #[must_use]
    pub fn quota_for(&self, member: &MemberId) -> Option<i64> {
        if self.high_group.contains(member) {
            Some(self.high_value)
        } else if self.low_group.contains(member) {
            Some(self.low_value)
        } else {
            None
        }
    }

    /// Iterates every `(member, quota)` pair of the draw.
    pub fn assignments(&self) -> impl Iterator<Item = (&MemberId, i64)> {
        self.high_group
            .iter()
            .map(|m| (m, self.high_value))
            .chain(self.low_group.iter().map(|m| (m, self.low_value)))
    }

    /// Returns the sum of all quotas in the draw.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.assignments().map(|(_, quota)| quota).sum()
    }
}

/// Splits `total_slots` across an already shuffled member list.
///
/// # Arguments
///
/// * `total_slots` - Size of the slot catalog
/// * `shuffled` - All members in lottery order; the first `total_slots mod len`
///   members receive the extra slot
///
/// # Errors
///
/// Returns an error if:
/// - `total_slots` is zero (`NoSlots`)
/// - `shuffled` is empty (`NoMembers`)
pub fn split_quotas(total_slots: usize, shuffled: &[MemberId]) -> Result<QuotaDraw, DomainError> {
    if total_slots == 0 {
        return Err(DomainError::NoSlots);
    }
    if shuffled.is_empty() {
        return Err(DomainError::NoMembers);
    }

    let base: usize = total_slots / shuffled.len();
    let extra: usize = total_slots % shuffled.len();

    let mut high_group: Vec<MemberId> = shuffled[..extra].to_vec();
    let mut low_group: Vec<MemberId> = shuffled[extra..].to_vec();
    high_group.sort();
    low_group.sort();

    Ok(QuotaDraw {
        high_value: to_quota(base + 1),
        high_group,
        low_value: to_quota(base),
        low_group,
    })
}

/// Converts a slot count into a ledger quota.
///
/// Counts derive from in-memory collection lengths, which never exceed
/// `i64::MAX`.
#[must_use]
pub fn to_quota(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
