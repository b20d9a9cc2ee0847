// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Auto-fill for absent members.
//!
//! Whenever the turn lands on an absent member who still holds quota, the
//! resolver acts for them: it binds the first preference that is in range
//! and free, in the order the preferences were written, or passes if none
//! is usable. It keeps going while the next picker is also absent, so one
//! operator action may trigger a cascade of automatic steps.
//!
//! ## Termination
//!
//! Each assignment consumes a free slot. Each member passes at most once
//! per cascade; a second pass ends the cascade and leaves the turn with
//! that member for an operator to handle.

use crate::history::Snapshot;
use crate::ledger::QuotaLedger;
use crate::lottery::Lottery;
use crate::redistribution::redistribute;
use crate::state::{AllocationState, AutoStep};
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateDigest};
use duty_roster_domain::{MemberId, SlotId};
use std::collections::BTreeSet;

/// What the resolver would do for the current picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Bind this slot.
    Assign(SlotId),
    /// No preference is usable.
    Pass,
}

/// Decides the next automatic step, if the current picker needs one.
///
/// Returns `None` while auto-fill is paused by an undo, when the rotation
/// is idle or exhausted, or when the current picker is present.
#[must_use]
pub fn decide(state: &AllocationState) -> Option<(MemberId, Decision)> {
    if state.undo_pending {
        return None;
    }

    let member: MemberId = state.next_picker()?;
    if !state.is_absent(&member) || !state.ledger.has_quota(&member) {
        return None;
    }

    let decision: Decision = state
        .remaining_preferences(&member)
        .first()
        .copied()
        .map_or(Decision::Pass, Decision::Assign);
    Some((member, decision))
}

/// Runs automatic steps until the current picker needs an operator.
///
/// Every step pushes its own snapshot, so each can be undone separately.
pub(crate) fn run_auto_fill(
    state: &mut AllocationState,
    lottery: &mut Lottery,
    cause: &Cause,
) -> (Vec<AutoStep>, Vec<AuditEvent>) {
    let mut steps: Vec<AutoStep> = Vec::new();
    let mut events: Vec<AuditEvent> = Vec::new();
    let mut passed: BTreeSet<MemberId> = BTreeSet::new();

    while let Some((member, decision)) = decide(state) {
        let before: StateDigest = state.digest();

        let (step, action): (AutoStep, Action) = match decision {
            Decision::Assign(slot_id) => {
                let snapshot: Snapshot = state.snapshot();
                if state.bind(slot_id, &member).is_err() {
                    break;
                }
                state.history.push(snapshot);
                state.advance_turn();
                (
                    AutoStep::Assigned {
                        member: member.clone(),
                        slot_id,
                    },
                    Action::new(
                        String::from("AutoAssign"),
                        Some(format!("{member} took slot {slot_id} from preferences")),
                    ),
                )
            }
            Decision::Pass => {
                if !passed.insert(member.clone()) {
                    break;
                }

                let mut ledger: QuotaLedger = state.ledger.clone();
                let Ok(Some(redistribution)) = redistribute(
                    &mut ledger,
                    &state.roster,
                    &member,
                    state.config.redistribution,
                    lottery,
                ) else {
                    break;
                };

                state.save_snapshot();
                state.ledger = ledger;
                let summary: String = redistribution.summary();
                state.last_action_log = Some(summary.clone());
                state.advance_turn();
                (
                    AutoStep::Passed { redistribution },
                    Action::new(String::from("AutoPass"), Some(summary)),
                )
            }
        };

        events.push(state.audit_event(before, Actor::auto_fill(), cause.clone(), action));
        steps.push(step);
    }

    (steps, events)
}
