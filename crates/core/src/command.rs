// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_domain::{HolidayTable, MemberId, Period, SlotId};

/// Who receives a slot being assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignMode {
    /// The current picker, subject to turn order and quota.
    Turn,
    /// An explicitly chosen member. Bypasses turn order and the quota check
    /// and never advances the sequencer.
    Manual {
        /// The member to bind.
        target: MemberId,
    },
}

/// A command represents operator intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new period: generate its catalog and clear quotas, order,
    /// history and the action log.
    InitPeriod {
        /// The month to allocate.
        period: Period,
        /// Holidays marking additional heavy days.
        holidays: HolidayTable,
    },
    /// Fix the roster and split the catalog into quotas.
    DrawQuotas {
        /// All participating members.
        members: Vec<MemberId>,
    },
    /// Draw a random selection order over the roster.
    DrawOrder,
    /// Set an explicit selection order.
    SetOrder {
        /// A permutation of the roster.
        order: Vec<MemberId>,
    },
    /// Bind a free slot.
    AssignSlot {
        /// The slot to bind.
        slot_id: SlotId,
        /// Turn or manual assignment.
        mode: AssignMode,
    },
    /// Give up a member's remaining quota.
    PassTurn {
        /// The member passing.
        member: MemberId,
    },
    /// Clear a slot's owner and refund their quota.
    ReleaseSlot {
        /// The slot to release.
        slot_id: SlotId,
    },
    /// Restore the most recent snapshot.
    Undo,
    /// Mark a member absent or present.
    SetAbsent {
        /// The member.
        member: MemberId,
        /// The new flag.
        absent: bool,
    },
    /// Replace a member's preference list.
    SetPreferences {
        /// The member.
        member: MemberId,
        /// Slot ids in priority order.
        preferences: Vec<SlotId>,
    },
    /// Let auto-fill run again after an undo.
    ResumeAutoFill,
}

impl Command {
    /// The command's name as recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InitPeriod { .. } => "InitPeriod",
            Self::DrawQuotas { .. } => "DrawQuotas",
            Self::DrawOrder => "DrawOrder",
            Self::SetOrder { .. } => "SetOrder",
            Self::AssignSlot { .. } => "AssignSlot",
            Self::PassTurn { .. } => "PassTurn",
            Self::ReleaseSlot { .. } => "ReleaseSlot",
            Self::Undo => "Undo",
            Self::SetAbsent { .. } => "SetAbsent",
            Self::SetPreferences { .. } => "SetPreferences",
            Self::ResumeAutoFill => "ResumeAutoFill",
        }
    }
}
