// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{MemberId, SlotId};

/// Errors that can occur while validating or applying allocation rules.
///
/// Every variant describes a precondition that is checked before any state
/// is touched, so receiving one of these means nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The operation needs at least one member.
    NoMembers,
    /// The operation needs a non-empty slot catalog.
    NoSlots,
    /// No slot with this id exists in the current catalog.
    SlotNotFound {
        /// The requested slot id.
        slot_id: SlotId,
    },
    /// The slot already has an owner.
    SlotAlreadyAssigned {
        /// The requested slot id.
        slot_id: SlotId,
        /// The member currently holding the slot.
        owner: MemberId,
    },
    /// The member has no remaining quota.
    QuotaExhausted {
        /// The member whose quota is zero.
        member: MemberId,
    },
    /// No selection order has been drawn or set.
    NoActiveOrder,
    /// A selection order is not a permutation of the roster.
    InvalidOrder {
        /// Why the order was rejected.
        reason: String,
    },
    /// There is no snapshot to restore.
    HistoryEmpty,
    /// A preference entry is not a slot id.
    InvalidPreferenceId(String),
    /// The member is not part of the roster.
    MemberNotFound(MemberId),
    /// The same member appears more than once.
    DuplicateMember(MemberId),
    /// A member name is empty or otherwise unusable.
    InvalidMemberName(String),
    /// The year/month pair does not name a calendar month.
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (1-12).
        month: u8,
    },
    /// The slot has no owner to release.
    SlotNotAssigned {
        /// The requested slot id.
        slot_id: SlotId,
    },
    /// Quotas cannot be redrawn once slots have been bound.
    AllocationInProgress {
        /// Number of slots already bound.
        assigned: usize,
    },
    /// A forfeiture has nobody to hand the quota to.
    NoRedistributionRecipients {
        /// The member trying to pass.
        member: MemberId,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMembers => write!(f, "No members are available for this operation"),
            Self::NoSlots => write!(f, "No slots have been generated for this period"),
            Self::SlotNotFound { slot_id } => write!(f, "Slot {slot_id} not found"),
            Self::SlotAlreadyAssigned { slot_id, owner } => {
                write!(f, "Slot {slot_id} is already assigned to '{owner}'")
            }
            Self::QuotaExhausted { member } => {
                write!(f, "Member '{member}' has no remaining quota")
            }
            Self::NoActiveOrder => write!(f, "No selection order has been drawn"),
            Self::InvalidOrder { reason } => write!(f, "Invalid selection order: {reason}"),
            Self::HistoryEmpty => write!(f, "There is nothing to undo"),
            Self::InvalidPreferenceId(token) => {
                write!(f, "Invalid preference entry '{token}': not a slot id")
            }
            Self::MemberNotFound(member) => write!(f, "Member '{member}' not found in roster"),
            Self::DuplicateMember(member) => {
                write!(f, "Member '{member}' appears more than once")
            }
            Self::InvalidMemberName(msg) => write!(f, "Invalid member name: {msg}"),
            Self::InvalidPeriod { year, month } => {
                write!(f, "Invalid period: {year}-{month:02} is not a calendar month")
            }
            Self::SlotNotAssigned { slot_id } => {
                write!(f, "Slot {slot_id} has no owner to release")
            }
            Self::AllocationInProgress { assigned } => {
                write!(
                    f,
                    "Cannot redraw quotas: {assigned} slot(s) are already assigned"
                )
            }
            Self::NoRedistributionRecipients { member } => {
                write!(
                    f,
                    "Member '{member}' cannot pass: no other member can receive the quota"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
