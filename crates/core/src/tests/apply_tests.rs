// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    conservation_holds, create_ready_state, create_test_members, create_test_state, run,
    try_run,
};
use crate::{
    AllocationState, AssignMode, Command, CoreError, EngineConfig, Lottery, Outcome,
    QuotaLedger, SequencerState, TransitionResult,
};
use duty_roster_audit::ActorKind;
use duty_roster_domain::{
    DomainError, HolidayTable, MemberId, MemberProfile, Period, SlotId, SlotKind,
};

fn turn(slot: usize) -> Command {
    Command::AssignSlot {
        slot_id: SlotId::new(slot),
        mode: AssignMode::Turn,
    }
}

fn manual(slot: usize, target: &MemberId) -> Command {
    Command::AssignSlot {
        slot_id: SlotId::new(slot),
        mode: AssignMode::Manual {
            target: target.clone(),
        },
    }
}

fn rejection(result: Result<TransitionResult, CoreError>) -> DomainError {
    result.expect_err("command should be rejected").domain_error().clone()
}

#[test]
fn test_init_period_generates_catalog() {
    let mut lottery: Lottery = Lottery::seeded(1);
    let state: AllocationState = AllocationState::default();

    let result: TransitionResult = try_run(
        &state,
        Command::InitPeriod {
            period: Period::new(2026, 2).unwrap(),
            holidays: HolidayTable::korea_2026(),
        },
        &mut lottery,
    )
    .unwrap();

    assert_eq!(result.new_state.slots.len(), 39);
    assert_eq!(
        result.outcome,
        Outcome::PeriodInitialized {
            period: Period::new(2026, 2).unwrap(),
            total_slots: 39
        }
    );
    let first_heavy = &result.new_state.slots[0];
    assert_eq!(first_heavy.kind, SlotKind::DaySlot);
    assert!(first_heavy.is_heavy);
}

#[test]
fn test_init_period_resets_allocation_but_keeps_profiles() {
    let mut lottery: Lottery = Lottery::seeded(2);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    let state: AllocationState = run(&state, turn(0), &mut lottery);
    let state: AllocationState = run(
        &state,
        Command::SetPreferences {
            member: members[1].clone(),
            preferences: vec![SlotId::new(4)],
        },
        &mut lottery,
    );

    let state: AllocationState = run(
        &state,
        Command::InitPeriod {
            period: Period::new(2026, 3).unwrap(),
            holidays: HolidayTable::korea_2026(),
        },
        &mut lottery,
    );

    assert!(state.ledger.is_empty());
    assert!(state.sequencer.is_none());
    assert!(state.quota_draw.is_none());
    assert!(state.history.is_empty());
    assert!(state.last_action_log.is_none());
    assert!(state.roster.is_empty());
    assert_eq!(state.assigned_count(), 0);
    assert_eq!(state.profile(&members[1]).preferences, vec![SlotId::new(4)]);
}

#[test]
fn test_manual_assign_after_reinit_needs_new_draw() {
    let mut lottery: Lottery = Lottery::seeded(2);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    let state: AllocationState = run(
        &state,
        Command::InitPeriod {
            period: Period::new(2026, 2).unwrap(),
            holidays: HolidayTable::korea_2026(),
        },
        &mut lottery,
    );

    let err: DomainError = rejection(try_run(&state, manual(0, &members[0]), &mut lottery));
    assert_eq!(err, DomainError::MemberNotFound(members[0].clone()));
    assert_eq!(state.assigned_count(), 0);

    let state: AllocationState = run(
        &state,
        Command::DrawQuotas {
            members: members.clone(),
        },
        &mut lottery,
    );
    assert_eq!(state.ledger.total(), 39);
    assert!(conservation_holds(&state));

    let state: AllocationState = run(&state, manual(0, &members[0]), &mut lottery);
    assert!(conservation_holds(&state));
}

#[test]
fn test_draw_quotas_thirty_slots_eleven_members() {
    let mut lottery: Lottery = Lottery::seeded(3);
    let members: Vec<MemberId> = create_test_members(11);
    let state: AllocationState = create_test_state(30, EngineConfig::default());

    let state: AllocationState = run(
        &state,
        Command::DrawQuotas {
            members: members.clone(),
        },
        &mut lottery,
    );

    let threes: usize = members.iter().filter(|m| state.ledger.get(m) == 3).count();
    let twos: usize = members.iter().filter(|m| state.ledger.get(m) == 2).count();
    assert_eq!(threes, 8);
    assert_eq!(twos, 3);
    assert_eq!(state.ledger.total(), 30);
    assert_eq!(state.roster, members);
    assert_eq!(state.sequencer_state(), SequencerState::Idle);
}

#[test]
fn test_draw_quotas_preconditions() {
    let mut lottery: Lottery = Lottery::seeded(4);

    let empty_catalog: AllocationState = AllocationState::default();
    assert_eq!(
        rejection(try_run(
            &empty_catalog,
            Command::DrawQuotas {
                members: create_test_members(3)
            },
            &mut lottery
        )),
        DomainError::NoSlots
    );

    let state: AllocationState = create_test_state(10, EngineConfig::default());
    assert_eq!(
        rejection(try_run(
            &state,
            Command::DrawQuotas {
                members: Vec::new()
            },
            &mut lottery
        )),
        DomainError::NoMembers
    );
    assert_eq!(
        rejection(try_run(
            &state,
            Command::DrawQuotas {
                members: vec![MemberId::new("Kim"), MemberId::new("Kim")]
            },
            &mut lottery
        )),
        DomainError::DuplicateMember(MemberId::new("Kim"))
    );
}

#[test]
fn test_draw_quotas_rejected_once_slots_are_bound() {
    let mut lottery: Lottery = Lottery::seeded(5);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    let state: AllocationState = run(&state, turn(0), &mut lottery);

    assert_eq!(
        rejection(try_run(
            &state,
            Command::DrawQuotas { members },
            &mut lottery
        )),
        DomainError::AllocationInProgress { assigned: 1 }
    );
}

#[test]
fn test_draw_quotas_drops_order_when_roster_changes() {
    let mut lottery: Lottery = Lottery::seeded(6);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let same: TransitionResult = try_run(
        &state,
        Command::DrawQuotas {
            members: members.clone(),
        },
        &mut lottery,
    )
    .unwrap();
    assert!(matches!(
        same.outcome,
        Outcome::QuotasDrawn {
            order_cleared: false,
            ..
        }
    ));
    assert!(same.new_state.sequencer.is_some());

    let changed: TransitionResult = try_run(
        &state,
        Command::DrawQuotas {
            members: create_test_members(4),
        },
        &mut lottery,
    )
    .unwrap();
    assert!(matches!(
        changed.outcome,
        Outcome::QuotasDrawn {
            order_cleared: true,
            ..
        }
    ));
    assert_eq!(changed.new_state.sequencer_state(), SequencerState::Idle);
}

#[test]
fn test_draw_order_is_permutation_of_roster() {
    let mut lottery: Lottery = Lottery::seeded(7);
    let members: Vec<MemberId> = create_test_members(11);
    let state: AllocationState = run(
        &create_test_state(30, EngineConfig::default()),
        Command::DrawQuotas {
            members: members.clone(),
        },
        &mut lottery,
    );

    let state: AllocationState = run(&state, Command::DrawOrder, &mut lottery);

    let mut order: Vec<MemberId> = state.sequencer.as_ref().unwrap().order().to_vec();
    order.sort();
    assert_eq!(order, members);
    assert_eq!(state.sequencer_state(), SequencerState::Active);
    assert_eq!(state.sequencer.as_ref().unwrap().current_index(), 0);
}

#[test]
fn test_draw_order_requires_roster() {
    let mut lottery: Lottery = Lottery::seeded(8);
    let state: AllocationState = create_test_state(5, EngineConfig::default());

    assert_eq!(
        rejection(try_run(&state, Command::DrawOrder, &mut lottery)),
        DomainError::NoMembers
    );
}

#[test]
fn test_set_order_rejects_non_permutation() {
    let mut lottery: Lottery = Lottery::seeded(9);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let err: DomainError = rejection(try_run(
        &state,
        Command::SetOrder {
            order: vec![members[0].clone(), members[0].clone(), members[1].clone()],
        },
        &mut lottery,
    ));
    assert!(matches!(err, DomainError::InvalidOrder { .. }));
}

#[test]
fn test_turn_assignment_binds_and_advances() {
    let mut lottery: Lottery = Lottery::seeded(10);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let result: TransitionResult = try_run(&state, turn(5), &mut lottery).unwrap();

    assert_eq!(result.new_state.slots[5].owner, Some(members[0].clone()));
    assert_eq!(result.new_state.ledger.get(&members[0]), 2);
    assert_eq!(result.new_state.current_picker(), Some(&members[1]));
    assert_eq!(result.new_state.history.len(), 1);
    match result.outcome {
        Outcome::SlotAssigned {
            slot,
            remaining_quota,
            overdrawn,
            next_picker,
        } => {
            assert_eq!(slot.id, SlotId::new(5));
            assert_eq!(remaining_quota, 2);
            assert!(!overdrawn);
            assert_eq!(next_picker, Some(members[1].clone()));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_turn_assignment_preconditions() {
    let mut lottery: Lottery = Lottery::seeded(11);
    let members: Vec<MemberId> = create_test_members(3);

    let no_order: AllocationState = run(
        &create_test_state(9, EngineConfig::default()),
        Command::DrawQuotas {
            members: members.clone(),
        },
        &mut lottery,
    );
    assert_eq!(
        rejection(try_run(&no_order, turn(0), &mut lottery)),
        DomainError::NoActiveOrder
    );

    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    assert_eq!(
        rejection(try_run(&state, turn(99), &mut lottery)),
        DomainError::SlotNotFound {
            slot_id: SlotId::new(99)
        }
    );

    let state: AllocationState = run(&state, turn(0), &mut lottery);
    assert_eq!(
        rejection(try_run(&state, turn(0), &mut lottery)),
        DomainError::SlotAlreadyAssigned {
            slot_id: SlotId::new(0),
            owner: members[0].clone()
        }
    );
}

#[test]
fn test_turn_assignment_rejects_exhausted_picker() {
    let mut lottery: Lottery = Lottery::seeded(12);
    let members: Vec<MemberId> = create_test_members(2);
    let mut state: AllocationState =
        create_ready_state(4, &members, EngineConfig::default(), &mut lottery);
    state.ledger = QuotaLedger::new();

    assert_eq!(
        rejection(try_run(&state, turn(1), &mut lottery)),
        DomainError::QuotaExhausted {
            member: members[0].clone()
        }
    );
}

#[test]
fn test_manual_assignment_does_not_advance() {
    let mut lottery: Lottery = Lottery::seeded(13);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let state: AllocationState = run(&state, manual(3, &members[2]), &mut lottery);

    assert_eq!(state.slots[3].owner, Some(members[2].clone()));
    assert_eq!(state.ledger.get(&members[2]), 2);
    assert_eq!(state.current_picker(), Some(&members[0]));
}

#[test]
fn test_manual_assignment_flags_overdraw() {
    let mut lottery: Lottery = Lottery::seeded(14);
    let members: Vec<MemberId> = create_test_members(3);
    let mut state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    for slot in 0..3 {
        state = run(&state, manual(slot, &members[1]), &mut lottery);
    }
    assert_eq!(state.ledger.get(&members[1]), 0);

    let result: TransitionResult = try_run(&state, manual(3, &members[1]), &mut lottery).unwrap();

    assert!(matches!(
        result.outcome,
        Outcome::SlotAssigned {
            remaining_quota: -1,
            overdrawn: true,
            ..
        }
    ));
    assert_eq!(result.new_state.ledger.get(&members[1]), -1);
}

#[test]
fn test_manual_assignment_requires_roster_member() {
    let mut lottery: Lottery = Lottery::seeded(15);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    assert_eq!(
        rejection(try_run(
            &state,
            manual(0, &MemberId::new("Nobody")),
            &mut lottery
        )),
        DomainError::MemberNotFound(MemberId::new("Nobody"))
    );
}

#[test]
fn test_manual_drain_of_current_picker_moves_turn() {
    let mut lottery: Lottery = Lottery::seeded(16);
    let members: Vec<MemberId> = create_test_members(3);
    let mut state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    for slot in 0..3 {
        state = run(&state, manual(slot, &members[0]), &mut lottery);
    }

    assert_eq!(state.current_picker(), Some(&members[1]));
}

#[test]
fn test_pass_turn_with_no_quota_is_noop() {
    let mut lottery: Lottery = Lottery::seeded(17);
    let members: Vec<MemberId> = create_test_members(3);
    let mut state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    for slot in 0..3 {
        state = run(&state, manual(slot, &members[2]), &mut lottery);
    }

    let result: TransitionResult = try_run(
        &state,
        Command::PassTurn {
            member: members[2].clone(),
        },
        &mut lottery,
    )
    .unwrap();

    assert!(matches!(
        result.outcome,
        Outcome::TurnPassed {
            redistribution: None,
            ..
        }
    ));
    assert_eq!(result.new_state.ledger, state.ledger);
    assert_eq!(result.new_state.history.len(), state.history.len());
}

#[test]
fn test_pass_turn_unknown_member() {
    let mut lottery: Lottery = Lottery::seeded(18);
    let state: AllocationState = create_ready_state(
        9,
        &create_test_members(3),
        EngineConfig::default(),
        &mut lottery,
    );

    assert_eq!(
        rejection(try_run(
            &state,
            Command::PassTurn {
                member: MemberId::new("Nobody")
            },
            &mut lottery
        )),
        DomainError::MemberNotFound(MemberId::new("Nobody"))
    );
}

#[test]
fn test_pass_turn_by_current_picker_advances() {
    let mut lottery: Lottery = Lottery::seeded(19);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let state: AllocationState = run(
        &state,
        Command::PassTurn {
            member: members[0].clone(),
        },
        &mut lottery,
    );

    assert_eq!(state.ledger.get(&members[0]), 0);
    assert_eq!(state.ledger.total(), 9);
    assert_eq!(state.current_picker(), Some(&members[1]));
    assert!(
        state
            .last_action_log
            .as_ref()
            .unwrap()
            .starts_with("M00 passed → ")
    );
}

#[test]
fn test_pass_turn_by_other_member_keeps_picker() {
    let mut lottery: Lottery = Lottery::seeded(20);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let state: AllocationState = run(
        &state,
        Command::PassTurn {
            member: members[2].clone(),
        },
        &mut lottery,
    );

    assert_eq!(state.ledger.get(&members[2]), 0);
    assert_eq!(state.current_picker(), Some(&members[0]));
}

#[test]
fn test_release_refunds_former_owner() {
    let mut lottery: Lottery = Lottery::seeded(21);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);
    let state: AllocationState = run(&state, turn(4), &mut lottery);

    let result: TransitionResult = try_run(
        &state,
        Command::ReleaseSlot {
            slot_id: SlotId::new(4),
        },
        &mut lottery,
    )
    .unwrap();

    assert!(result.new_state.slots[4].is_free());
    assert_eq!(result.new_state.ledger.get(&members[0]), 3);
    assert_eq!(result.new_state.history.len(), 2);
    assert!(matches!(
        result.outcome,
        Outcome::SlotReleased {
            refunded_quota: 3,
            ..
        }
    ));
}

#[test]
fn test_release_of_free_slot_rejected() {
    let mut lottery: Lottery = Lottery::seeded(22);
    let state: AllocationState = create_ready_state(
        9,
        &create_test_members(3),
        EngineConfig::default(),
        &mut lottery,
    );

    assert_eq!(
        rejection(try_run(
            &state,
            Command::ReleaseSlot {
                slot_id: SlotId::new(2)
            },
            &mut lottery
        )),
        DomainError::SlotNotAssigned {
            slot_id: SlotId::new(2)
        }
    );
}

#[test]
fn test_profiles_are_recorded() {
    let mut lottery: Lottery = Lottery::seeded(23);
    let state: AllocationState = AllocationState::default();
    let kim: MemberId = MemberId::new("Kim");

    let state: AllocationState = run(
        &state,
        Command::SetAbsent {
            member: kim.clone(),
            absent: true,
        },
        &mut lottery,
    );
    let result: TransitionResult = try_run(
        &state,
        Command::SetPreferences {
            member: kim.clone(),
            preferences: vec![SlotId::new(12), SlotId::new(5)],
        },
        &mut lottery,
    )
    .unwrap();

    let expected: MemberProfile = MemberProfile {
        absent: true,
        preferences: vec![SlotId::new(12), SlotId::new(5)],
    };
    assert_eq!(result.new_state.profile(&kim), expected);
    assert_eq!(
        result.outcome,
        Outcome::ProfileUpdated {
            member: kim,
            profile: expected
        }
    );

    assert!(matches!(
        rejection(try_run(
            &state,
            Command::SetAbsent {
                member: MemberId::new(" "),
                absent: true
            },
            &mut lottery
        )),
        DomainError::InvalidMemberName(_)
    ));
}

#[test]
fn test_rejected_command_reports_name() {
    let mut lottery: Lottery = Lottery::seeded(24);
    let state: AllocationState = AllocationState::default();

    let err: CoreError = try_run(&state, Command::Undo, &mut lottery).unwrap_err();
    assert_eq!(err.command(), "Undo");
    assert_eq!(err.to_string(), "Undo rejected: There is nothing to undo");
}

#[test]
fn test_command_emits_audit_event() {
    let mut lottery: Lottery = Lottery::seeded(25);
    let members: Vec<MemberId> = create_test_members(3);
    let state: AllocationState =
        create_ready_state(9, &members, EngineConfig::default(), &mut lottery);

    let result: TransitionResult = try_run(&state, turn(0), &mut lottery).unwrap();

    assert_eq!(result.audit_events.len(), 1);
    let event = &result.audit_events[0];
    assert_eq!(event.action.name, "AssignSlot");
    assert_eq!(event.actor.kind, ActorKind::Operator);
    assert_eq!(event.cause.id, "req-456");
    assert_eq!(event.before.assigned, 0);
    assert_eq!(event.after.assigned, 1);
    assert_eq!(event.after.remaining_quota, 8);
    assert_eq!(event.after.current_picker, Some(members[1].clone()));
}
