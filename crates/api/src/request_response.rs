// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Members travel as plain names and slots as plain ids; the conversion to
//! domain types happens in the handlers.

use duty_roster::{AutoStep, QuotaLedger};
use duty_roster_domain::{MemberId, MemberTally, Slot};
use serde::{Deserialize, Serialize};

/// API request to initialise a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitPeriodRequest {
    /// The calendar year.
    pub year: i32,
    /// The month number (1-12).
    pub month: u8,
    /// Holiday days for this month. When absent, the built-in table is used.
    #[serde(default)]
    pub holidays: Option<Vec<u8>>,
}

/// One slot as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// The slot id.
    pub id: usize,
    /// Day of the month.
    pub day: u8,
    /// `"Day"` or `"Night"`.
    pub kind: String,
    /// Whether the day is a weekend or holiday.
    pub is_heavy: bool,
    /// The owner, if bound.
    pub owner: Option<String>,
}

impl From<&Slot> for SlotView {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id.index(),
            day: slot.day,
            kind: slot.kind.to_string(),
            is_heavy: slot.is_heavy,
            owner: slot.owner.as_ref().map(ToString::to_string),
        }
    }
}

/// API response for a period initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitPeriodResponse {
    /// The period, as `YYYY-MM`.
    pub period: String,
    /// Size of the generated catalog.
    pub total_slots: usize,
    /// The holiday days applied.
    pub holidays: Vec<u8>,
    /// A success message.
    pub message: String,
}

/// API request to run the quota lottery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawQuotasRequest {
    /// Current member names.
    pub members: Vec<String>,
}

/// A member's remaining quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaEntry {
    /// The member.
    pub member: String,
    /// Remaining quota. Negative after a manual overdraw.
    pub quota: i64,
}

/// Lists a ledger's entries in member order.
#[must_use]
pub fn quota_entries(ledger: &QuotaLedger) -> Vec<QuotaEntry> {
    ledger
        .iter()
        .map(|(member, quota)| QuotaEntry {
            member: member.to_string(),
            quota,
        })
        .collect()
}

/// API response for a quota draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawQuotasResponse {
    /// Quota per member.
    pub quotas: Vec<QuotaEntry>,
    /// Quota held by the larger group.
    pub high_value: i64,
    /// Members holding `high_value`, sorted by name.
    pub high_group: Vec<String>,
    /// Quota held by everyone else.
    pub low_value: i64,
    /// Members holding `low_value`, sorted by name.
    pub low_group: Vec<String>,
    /// True if the previous order no longer matched the roster and was dropped.
    pub order_cleared: bool,
    /// A success message.
    pub message: String,
}

/// API request to set the selection order by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOrderRequest {
    /// Every member exactly once.
    pub order: Vec<String>,
}

/// API response for a drawn or explicit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// The selection order.
    pub order: Vec<String>,
    /// Whose turn it is.
    pub next_picker: Option<String>,
    /// A success message.
    pub message: String,
}

/// An automatic step taken for an absent member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoStepView {
    /// The absent member.
    pub member: String,
    /// `"assigned"` or `"passed"`.
    pub action: String,
    /// The slot bound, for assignments.
    pub slot_id: Option<usize>,
    /// The redistribution summary, for passes.
    pub summary: Option<String>,
}

impl From<&AutoStep> for AutoStepView {
    fn from(step: &AutoStep) -> Self {
        match step {
            AutoStep::Assigned { member, slot_id } => Self {
                member: member.to_string(),
                action: String::from("assigned"),
                slot_id: Some(slot_id.index()),
                summary: None,
            },
            AutoStep::Passed { redistribution } => Self {
                member: redistribution.member.to_string(),
                action: String::from("passed"),
                slot_id: None,
                summary: Some(redistribution.summary()),
            },
        }
    }
}

/// API request to assign a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSlotRequest {
    /// The slot to bind.
    pub slot_id: usize,
    /// When set, assign in manual mode to this member.
    #[serde(default)]
    pub manual_target: Option<String>,
}

/// API response for an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSlotResponse {
    /// The slot after binding.
    pub slot: SlotView,
    /// The member who received it.
    pub member: String,
    /// That member's quota after the debit.
    pub remaining_quota: i64,
    /// True if the quota went below zero.
    pub overdrawn: bool,
    /// Whose turn it is after any auto-fill.
    pub next_picker: Option<String>,
    /// Automatic steps that followed.
    pub auto_steps: Vec<AutoStepView>,
    /// A success message.
    pub message: String,
}

/// API request to pass a member's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassTurnRequest {
    /// The member giving up their remaining quota.
    pub member: String,
}

/// API response for a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassTurnResponse {
    /// The member who passed.
    pub member: String,
    /// Who received what, or `None` if there was nothing to pass.
    pub summary: Option<String>,
    /// Whose turn it is after any auto-fill.
    pub next_picker: Option<String>,
    /// Automatic steps that followed.
    pub auto_steps: Vec<AutoStepView>,
    /// A success message.
    pub message: String,
}

/// API request to release a bound slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSlotRequest {
    /// The slot to clear.
    pub slot_id: usize,
}

/// API response for a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSlotResponse {
    /// The slot after release.
    pub slot: SlotView,
    /// Who held it.
    pub former_owner: String,
    /// Their quota after the refund.
    pub refunded_quota: i64,
    /// Whose turn it is after any auto-fill.
    pub next_picker: Option<String>,
    /// Automatic steps that followed.
    pub auto_steps: Vec<AutoStepView>,
    /// A success message.
    pub message: String,
}

/// API response for an undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoResponse {
    /// Snapshots left.
    pub remaining_history: usize,
    /// Whose turn it is.
    pub next_picker: Option<String>,
    /// A success message.
    pub message: String,
}

/// API request to mark a member absent or present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAbsentRequest {
    /// The member.
    pub member: String,
    /// True for absent.
    pub absent: bool,
}

/// API request to replace a member's preference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPreferencesRequest {
    /// The member.
    pub member: String,
    /// Comma-separated slot ids, as typed.
    pub preferences: String,
}

/// API response for a profile change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The member.
    pub member: String,
    /// Whether the member is absent.
    pub absent: bool,
    /// The stored preference list.
    pub preferences: Vec<usize>,
    /// Preferences still in range and free, in list order.
    pub remaining: Vec<usize>,
    /// Tokens dropped while parsing the preference text.
    pub rejected_tokens: Vec<String>,
    /// Whose turn it is after any auto-fill.
    pub next_picker: Option<String>,
    /// Automatic steps that followed.
    pub auto_steps: Vec<AutoStepView>,
    /// A success message.
    pub message: String,
}

/// API response for resuming auto-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAutoFillResponse {
    /// Whose turn it is after any auto-fill.
    pub next_picker: Option<String>,
    /// Automatic steps taken.
    pub auto_steps: Vec<AutoStepView>,
    /// A success message.
    pub message: String,
}

/// A member's absence and preferences as seen by the queue display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    /// The member.
    pub member: String,
    /// Remaining quota, if the member is in the roster.
    pub quota: Option<i64>,
    /// Whether the member is absent.
    pub absent: bool,
    /// The stored preference list.
    pub preferences: Vec<usize>,
    /// Preferences still in range and free, in list order.
    pub remaining: Vec<usize>,
}

/// Read-only view of a roster's full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    /// The period, once initialised.
    pub period: Option<String>,
    /// The slot catalog.
    pub slots: Vec<SlotView>,
    /// Members in roster order with their profiles.
    pub members: Vec<MemberView>,
    /// The selection order.
    pub order: Vec<String>,
    /// Whose turn it is.
    pub next_picker: Option<String>,
    /// `Idle`, `Active` or `Exhausted`.
    pub sequencer_state: String,
    /// Snapshots available to undo.
    pub history_len: usize,
    /// Maximum snapshots kept.
    pub history_capacity: usize,
    /// The last forfeiture summary.
    pub last_action_log: Option<String>,
    /// True while auto-fill is paused after an undo.
    pub undo_pending: bool,
    /// The forfeiture recipient policy in force.
    pub redistribution_policy: String,
}

/// One member's slot counts for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    /// The member.
    pub member: String,
    /// Day slots held.
    pub day_count: usize,
    /// Night slots held.
    pub night_count: usize,
    /// All slots held.
    pub total: usize,
}

impl From<MemberTally> for TallyEntry {
    fn from(tally: MemberTally) -> Self {
        Self {
            member: tally.member.to_string(),
            day_count: tally.day_count,
            night_count: tally.night_count,
            total: tally.total,
        }
    }
}

/// Per-member counts for the export collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The period, once initialised.
    pub period: Option<String>,
    /// One entry per member, roster order.
    pub members: Vec<TallyEntry>,
}

/// Overall progress of the allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Size of the catalog.
    pub total_slots: usize,
    /// Slots with an owner.
    pub assigned: usize,
    /// Rounded percentage assigned.
    pub percent: usize,
    /// `Idle`, `Active` or `Exhausted`.
    pub sequencer_state: String,
    /// Whose turn it is.
    pub next_picker: Option<String>,
}

/// Converts an optional member to its name.
#[must_use]
pub fn member_name(member: Option<&MemberId>) -> Option<String> {
    member.map(ToString::to_string)
}
