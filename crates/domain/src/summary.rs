// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only tallies for export and progress display.

use crate::types::{MemberId, Slot, SlotKind};
use serde::{Deserialize, Serialize};

/// Slot counts for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTally {
    /// The member.
    pub member: MemberId,
    /// Day slots held.
    pub day_count: usize,
    /// Night slots held.
    pub night_count: usize,
    /// All slots held.
    pub total: usize,
}

/// Overall assignment progress of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationProgress {
    /// Size of the catalog.
    pub total_slots: usize,
    /// Slots with an owner.
    pub assigned: usize,
    /// `assigned / total_slots`, rounded to the nearest whole percent.
    pub percent: usize,
}

/// Tallies day and night slots per member.
///
/// Members are listed in roster order. Owners missing from the roster are
/// appended in name order so no bound slot goes uncounted.
#[must_use]
pub fn summarize(roster: &[MemberId], slots: &[Slot]) -> Vec<MemberTally> {
    let mut members: Vec<MemberId> = roster.to_vec();
    let mut strays: Vec<MemberId> = slots
        .iter()
        .filter_map(|s| s.owner.clone())
        .filter(|owner| !roster.contains(owner))
        .collect();
    strays.sort();
    strays.dedup();
    members.extend(strays);

    members
        .into_iter()
        .map(|member| {
            let owned = || slots.iter().filter(|s| s.owner.as_ref() == Some(&member));
            let day_count: usize = owned().filter(|s| s.kind == SlotKind::DaySlot).count();
            let night_count: usize = owned().filter(|s| s.kind == SlotKind::NightSlot).count();
            MemberTally {
                member: member.clone(),
                day_count,
                night_count,
                total: day_count + night_count,
            }
        })
        .collect()
}

/// Computes assignment progress.
#[must_use]
pub fn progress(slots: &[Slot]) -> AllocationProgress {
    let total_slots: usize = slots.len();
    let assigned: usize = slots.iter().filter(|s| !s.is_free()).count();
    let percent: usize = if total_slots == 0 {
        0
    } else {
        (assigned * 100 + total_slots / 2) / total_slots
    };

    AllocationProgress {
        total_slots,
        assigned,
        percent,
    }
}
