// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AllocationState, Command, CoreError, EngineConfig, Lottery, TransitionResult, apply};
use duty_roster_audit::{Actor, ActorKind, Cause};
use duty_roster_domain::{MemberId, Slot, SlotId, SlotKind};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("desk-1"), ActorKind::Operator)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Operator request"))
}

pub fn create_test_members(count: usize) -> Vec<MemberId> {
    (0..count)
        .map(|i| MemberId::new(&format!("M{i:02}")))
        .collect()
}

/// A state with `count` plain night slots and no period.
pub fn create_test_state(count: usize, config: EngineConfig) -> AllocationState {
    let mut state: AllocationState = AllocationState::new(config);
    state.slots = (0..count)
        .map(|i| {
            let day: u8 = u8::try_from(i % 28 + 1).unwrap();
            Slot::new(SlotId::new(i), day, SlotKind::NightSlot, false)
        })
        .collect();
    state
}

pub fn try_run(
    state: &AllocationState,
    command: Command,
    lottery: &mut Lottery,
) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        command,
        lottery,
        create_test_actor(),
        create_test_cause(),
    )
}

pub fn run(state: &AllocationState, command: Command, lottery: &mut Lottery) -> AllocationState {
    try_run(state, command, lottery)
        .expect("command should succeed")
        .new_state
}

/// Draws quotas and sets the order to roster order.
pub fn create_ready_state(
    slots: usize,
    members: &[MemberId],
    config: EngineConfig,
    lottery: &mut Lottery,
) -> AllocationState {
    let state: AllocationState = create_test_state(slots, config);
    let state: AllocationState = run(
        &state,
        Command::DrawQuotas {
            members: members.to_vec(),
        },
        lottery,
    );
    run(
        &state,
        Command::SetOrder {
            order: members.to_vec(),
        },
        lottery,
    )
}

pub fn conservation_holds(state: &AllocationState) -> bool {
    let assigned: i64 = i64::try_from(state.assigned_count()).unwrap();
    let total: i64 = i64::try_from(state.slots.len()).unwrap();
    state.ledger.total() + assigned == total
}
