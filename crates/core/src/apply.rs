// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{AssignMode, Command};
use crate::error::CoreError;
use crate::history::{History, Snapshot};
use crate::ledger::QuotaLedger;
use crate::lottery::Lottery;
use crate::redistribution::{Redistribution, redistribute};
use crate::resolver::run_auto_fill;
use crate::sequencer::TurnSequencer;
use crate::state::{AllocationState, AutoStep, Outcome, TransitionResult};
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateDigest};
use duty_roster_domain::{
    DomainError, HolidayTable, MemberId, MemberProfile, Period, QuotaDraw, Slot, SlotId,
    catalog_for_period, split_quotas, validate_member_id, validate_order, validate_roster,
};

/// What a command handler produced, before auditing.
struct Executed {
    outcome: Outcome,
    details: Option<String>,
}

/// Applies a command to the state, producing a new state and audit events.
///
/// This function is pure with respect to `state`: the input is never
/// modified. Preconditions are checked before anything changes, so an
/// error means nothing happened. After every successful command except
/// `Undo`, the preference resolver runs for absent members.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `lottery` - The random source for draws and redistribution
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `CoreError::Rejected` if a precondition of the command fails.
pub fn apply(
    state: &AllocationState,
    command: Command,
    lottery: &mut Lottery,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let is_undo: bool = matches!(command, Command::Undo);
    let before: StateDigest = state.digest();
    let mut new_state: AllocationState = state.clone();

    let executed: Executed = execute(&mut new_state, command, lottery)
        .map_err(|error| CoreError::Rejected {
            command: name,
            error,
        })?;

    if !is_undo {
        new_state.undo_pending = false;
    }

    let action: Action = Action::new(String::from(name), executed.details);
    let mut audit_events: Vec<AuditEvent> =
        vec![new_state.audit_event(before, actor, cause.clone(), action)];

    let auto_steps: Vec<AutoStep> = if is_undo {
        Vec::new()
    } else {
        let (steps, events) = run_auto_fill(&mut new_state, lottery, &cause);
        audit_events.extend(events);
        steps
    };

    Ok(TransitionResult {
        new_state,
        outcome: executed.outcome,
        auto_steps,
        audit_events,
    })
}

fn execute(
    state: &mut AllocationState,
    command: Command,
    lottery: &mut Lottery,
) -> Result<Executed, DomainError> {
    match command {
        Command::InitPeriod { period, holidays } => init_period(state, period, &holidays),
        Command::DrawQuotas { members } => draw_quotas(state, members, lottery),
        Command::DrawOrder => {
            if state.roster.is_empty() {
                return Err(DomainError::NoMembers);
            }
            let mut order: Vec<MemberId> = state.roster.clone();
            lottery.shuffle(&mut order);
            Ok(install_order(state, order))
        }
        Command::SetOrder { order } => {
            if state.roster.is_empty() {
                return Err(DomainError::NoMembers);
            }
            validate_order(&order, &state.roster)?;
            Ok(install_order(state, order))
        }
        Command::AssignSlot { slot_id, mode } => assign_slot(state, slot_id, &mode),
        Command::PassTurn { member } => pass_turn(state, &member, lottery),
        Command::ReleaseSlot { slot_id } => release_slot(state, slot_id),
        Command::Undo => {
            let snapshot: Snapshot = state.history.pop().ok_or(DomainError::HistoryEmpty)?;
            state.restore(snapshot);
            state.undo_pending = true;
            Ok(Executed {
                outcome: Outcome::Undone {
                    remaining_history: state.history.len(),
                    next_picker: state.next_picker(),
                },
                details: None,
            })
        }
        Command::SetAbsent { member, absent } => {
            validate_member_id(&member)?;
            let entry: &mut MemberProfile = state.profiles.entry(member.clone()).or_default();
            entry.absent = absent;
            let profile: MemberProfile = entry.clone();
            Ok(Executed {
                details: Some(format!("{member} absent={absent}")),
                outcome: Outcome::ProfileUpdated { member, profile },
            })
        }
        Command::SetPreferences {
            member,
            preferences,
        } => {
            validate_member_id(&member)?;
            let entry: &mut MemberProfile = state.profiles.entry(member.clone()).or_default();
            entry.preferences = preferences;
            let profile: MemberProfile = entry.clone();
            let listed: Vec<String> =
                profile.preferences.iter().map(ToString::to_string).collect();
            Ok(Executed {
                details: Some(format!("{member} prefers [{}]", listed.join(", "))),
                outcome: Outcome::ProfileUpdated { member, profile },
            })
        }
        Command::ResumeAutoFill => Ok(Executed {
            outcome: Outcome::AutoFillResumed,
            details: None,
        }),
    }
}

fn init_period(
    state: &mut AllocationState,
    period: Period,
    holidays: &HolidayTable,
) -> Result<Executed, DomainError> {
    let slots: Vec<Slot> = catalog_for_period(&period, holidays)?;
    let total_slots: usize = slots.len();

    state.period = Some(period);
    state.slots = slots;
    state.roster = Vec::new();
    state.ledger = QuotaLedger::new();
    state.quota_draw = None;
    state.sequencer = None;
    state.history = History::new(state.config.history_capacity);
    state.last_action_log = None;
    state.undo_pending = false;

    Ok(Executed {
        outcome: Outcome::PeriodInitialized {
            period,
            total_slots,
        },
        details: Some(format!("{period}: {total_slots} slots")),
    })
}

fn draw_quotas(
    state: &mut AllocationState,
    members: Vec<MemberId>,
    lottery: &mut Lottery,
) -> Result<Executed, DomainError> {
    validate_roster(&members)?;
    if state.slots.is_empty() {
        return Err(DomainError::NoSlots);
    }
    let assigned: usize = state.assigned_count();
    if assigned > 0 {
        return Err(DomainError::AllocationInProgress { assigned });
    }

    let mut shuffled: Vec<MemberId> = members.clone();
    lottery.shuffle(&mut shuffled);
    let draw: QuotaDraw = split_quotas(state.slots.len(), &shuffled)?;

    state.ledger = QuotaLedger::from_draw(&draw);
    state.roster = members;
    state.quota_draw = Some(draw.clone());
    state.history = History::new(state.config.history_capacity);
    state.last_action_log = None;

    let previous: Option<Vec<MemberId>> =
        state.sequencer.take().map(|seq| seq.order().to_vec());
    let order_cleared: bool = match previous {
        Some(order) if validate_order(&order, &state.roster).is_ok() => {
            install_order(state, order);
            false
        }
        Some(_) => true,
        None => false,
    };

    let details: String = format!(
        "{} x{}, {} x{}",
        draw.high_value,
        draw.high_group.len(),
        draw.low_value,
        draw.low_group.len()
    );

    Ok(Executed {
        outcome: Outcome::QuotasDrawn {
            draw,
            order_cleared,
        },
        details: Some(details),
    })
}

/// Replaces the selection order and points at the first member with quota.
fn install_order(state: &mut AllocationState, order: Vec<MemberId>) -> Executed {
    let mut sequencer: TurnSequencer = TurnSequencer::new(order);
    sequencer.settle(&state.ledger);
    let order: Vec<MemberId> = sequencer.order().to_vec();
    state.sequencer = Some(sequencer);

    let listed: Vec<&str> = order.iter().map(MemberId::value).collect();
    Executed {
        details: Some(listed.join(" > ")),
        outcome: Outcome::OrderSet {
            order,
            next_picker: state.next_picker(),
        },
    }
}

fn assign_slot(
    state: &mut AllocationState,
    slot_id: SlotId,
    mode: &AssignMode,
) -> Result<Executed, DomainError> {
    let target: MemberId = match mode {
        AssignMode::Turn => state
            .sequencer
            .as_ref()
            .and_then(TurnSequencer::current)
            .cloned()
            .ok_or(DomainError::NoActiveOrder)?,
        AssignMode::Manual { target } => {
            if !state.has_member(target) {
                return Err(DomainError::MemberNotFound(target.clone()));
            }
            target.clone()
        }
    };

    let slot: &Slot = state.slot(slot_id)?;
    if let Some(owner) = &slot.owner {
        return Err(DomainError::SlotAlreadyAssigned {
            slot_id,
            owner: owner.clone(),
        });
    }
    if matches!(mode, AssignMode::Turn) && !state.ledger.has_quota(&target) {
        return Err(DomainError::QuotaExhausted { member: target });
    }

    state.save_snapshot();
    let (slot, remaining_quota) = state.bind(slot_id, &target)?;
    match mode {
        AssignMode::Turn => state.advance_turn(),
        AssignMode::Manual { .. } => state.settle_turn(),
    }

    let overdrawn: bool = remaining_quota < 0;
    let manual: &str = if matches!(mode, AssignMode::Manual { .. }) {
        " (manual)"
    } else {
        ""
    };
    Ok(Executed {
        details: Some(format!(
            "slot {slot_id} (day {} {}) to {target}{manual}, quota left {remaining_quota}",
            slot.day, slot.kind
        )),
        outcome: Outcome::SlotAssigned {
            slot,
            remaining_quota,
            overdrawn,
            next_picker: state.next_picker(),
        },
    })
}

fn pass_turn(
    state: &mut AllocationState,
    member: &MemberId,
    lottery: &mut Lottery,
) -> Result<Executed, DomainError> {
    if !state.has_member(member) {
        return Err(DomainError::MemberNotFound(member.clone()));
    }

    let mut ledger: QuotaLedger = state.ledger.clone();
    let redistribution: Option<Redistribution> = redistribute(
        &mut ledger,
        &state.roster,
        member,
        state.config.redistribution,
        lottery,
    )?;

    let details: String = if let Some(redistribution) = &redistribution {
        state.save_snapshot();
        state.ledger = ledger;
        let summary: String = redistribution.summary();
        state.last_action_log = Some(summary.clone());
        if state.current_picker() == Some(member) {
            state.advance_turn();
        } else {
            state.settle_turn();
        }
        summary
    } else {
        format!("{member} has nothing to pass")
    };

    Ok(Executed {
        outcome: Outcome::TurnPassed {
            member: member.clone(),
            redistribution,
            next_picker: state.next_picker(),
        },
        details: Some(details),
    })
}

fn release_slot(state: &mut AllocationState, slot_id: SlotId) -> Result<Executed, DomainError> {
    let former_owner: MemberId = state
        .slot(slot_id)?
        .owner
        .clone()
        .ok_or(DomainError::SlotNotAssigned { slot_id })?;

    state.save_snapshot();
    let entry: &mut Slot = &mut state.slots[slot_id.index()];
    entry.owner = None;
    let slot: Slot = entry.clone();
    let refunded_quota: i64 = state.ledger.credit(&former_owner, 1);
    state.settle_turn();

    Ok(Executed {
        details: Some(format!("slot {slot_id} released from {former_owner}")),
        outcome: Outcome::SlotReleased {
            slot,
            former_owner,
            refunded_quota,
        },
    })
}
